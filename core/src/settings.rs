/// What `decrement` does besides lowering the counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecrementMode {
    /// Take one unit off the newest record and persist.
    #[default]
    Corrective,
    /// Lower the in-memory counter only. The next load recomputes the
    /// counter from the records and the decrement is lost.
    LegacyInMemory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerSettings {
    pub records_key: String,
    pub count_key: String,
    pub decrement: DecrementMode,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            records_key: "fishRecords".to_string(),
            count_key: "fishCount".to_string(),
            decrement: DecrementMode::default(),
        }
    }
}
