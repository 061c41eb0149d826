use thiserror::Error;

/// Error type for the key-value store backing the ledger.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read `{key}`: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write `{key}`: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value for `{key}` is not an integer: {value:?}")]
    NotAnInteger { key: String, value: String },
}

/// Error type for ledger persistence.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("could not encode catch records: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("could not decode catch records: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("catch record `{id}` has an out-of-range timestamp: {seconds}")]
    InvalidTimestamp { id: String, seconds: f64 },

    #[error("catch record counts overflow the total")]
    CountOverflow,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure reported by the platform location service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LocationError {
    pub message: String,
}

impl LocationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
