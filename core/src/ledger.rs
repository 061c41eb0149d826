//! The catch ledger: the running total and the record list behind it.
//!
//! Every mutation is written through to the store before returning. Store
//! and location problems never escape as errors; they become a [`Status`]
//! for the UI and the ledger carries on with defaults.

use std::fmt;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::codec::{decode_records, encode_records};
use crate::error::LedgerError;
use crate::location::LocationProvider;
use crate::models::CatchRecord;
use crate::settings::{DecrementMode, LedgerSettings};
use crate::storage::{KeyValueStore, LedgerStore};

/// Fish per button press.
const CATCH_UNIT: i64 = 1;

/// User-facing message about the last operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    LocationFailed(String),
    WaitingForFix,
    SaveFailed(String),
    LoadFailed(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::LocationFailed(reason) => write!(
                f,
                "Failed to get location: {reason}\nCheck location permission in Settings."
            ),
            Status::WaitingForFix => {
                write!(f, "Could not get location.\nWaiting for a location fix...")
            }
            Status::SaveFailed(reason) => write!(f, "Failed to save data: {reason}"),
            Status::LoadFailed(reason) => write!(f, "Failed to load data: {reason}"),
        }
    }
}

pub struct CatchLedger<S, L> {
    store: LedgerStore<S>,
    location: L,
    settings: LedgerSettings,
    total_count: i64,
    records: Vec<CatchRecord>,
    location_status: Option<Status>,
    storage_status: Option<Status>,
}

impl<S: KeyValueStore, L: LocationProvider> CatchLedger<S, L> {
    /// Empty ledger; call [`load`](Self::load) to pick up stored state.
    pub fn new(store: S, location: L) -> Self {
        Self::with_settings(store, location, LedgerSettings::default())
    }

    pub fn with_settings(store: S, location: L, settings: LedgerSettings) -> Self {
        Self {
            store: LedgerStore::new(store, &settings),
            location,
            settings,
            total_count: 0,
            records: Vec::new(),
            location_status: None,
            storage_status: None,
        }
    }

    pub fn total_count(&self) -> i64 {
        self.total_count
    }

    pub fn records(&self) -> &[CatchRecord] {
        &self.records
    }

    /// Storage problems take precedence over location ones.
    pub fn status(&self) -> Option<&Status> {
        self.storage_status.as_ref().or(self.location_status.as_ref())
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    pub fn store(&self) -> &LedgerStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LedgerStore<S> {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store.into_inner()
    }

    /// Replace in-memory state with what the store holds.
    ///
    /// The total is always recomputed from the records; the stored counter
    /// is only compared against it.
    pub fn load(&mut self) {
        let mut failure = None;

        let stored_count = match self.store.read_counter() {
            Ok(count) => Some(count),
            Err(e) => {
                warn!("failed to read stored count: {e}");
                failure = Some(e.to_string());
                None
            }
        };

        (self.records, self.total_count) = match self.read_records() {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("failed to load catch records, starting empty: {e}");
                failure = Some(e.to_string());
                (Vec::new(), 0)
            }
        };

        if let Some(stored) = stored_count.filter(|&c| c != self.total_count) {
            warn!(
                "stored count {stored} disagrees with {} from records, using records",
                self.total_count
            );
        }
        debug!(
            "loaded {} records, total {}",
            self.records.len(),
            self.total_count
        );

        self.storage_status = failure.map(Status::LoadFailed);
    }

    /// Record one fish caught now.
    pub fn record_catch(&mut self) -> &CatchRecord {
        self.record_catch_at(Utc::now())
    }

    /// Record one fish caught at `timestamp`, tagged with the current fix.
    pub fn record_catch_at(&mut self, timestamp: DateTime<Utc>) -> &CatchRecord {
        self.total_count = self.total_count.saturating_add(CATCH_UNIT);

        let reading = self.location.snapshot();
        let record = CatchRecord::new(timestamp, CATCH_UNIT, reading.coordinate);
        debug!(
            "new record at {} ({}, {})",
            record.timestamp(),
            record.latitude(),
            record.longitude()
        );
        self.records.push(record);

        self.location_status = match (reading.error, reading.coordinate) {
            (Some(error), _) => Some(Status::LocationFailed(error.to_string())),
            (None, None) => Some(Status::WaitingForFix),
            (None, Some(_)) => None,
        };

        self.save();
        &self.records[self.records.len() - 1]
    }

    /// Take one fish back. Returns false when there is nothing to take.
    pub fn decrement(&mut self) -> bool {
        if self.total_count <= 0 {
            return false;
        }
        self.total_count -= CATCH_UNIT;

        match self.settings.decrement {
            DecrementMode::Corrective => {
                self.remove_latest_unit();
                self.save();
            }
            DecrementMode::LegacyInMemory => {
                debug!(
                    "count lowered to {} in memory only, records unchanged",
                    self.total_count
                );
            }
        }
        true
    }

    /// Forget every catch.
    pub fn reset(&mut self) {
        self.total_count = 0;
        self.records.clear();
        self.location_status = None;
        self.save();
    }

    fn remove_latest_unit(&mut self) {
        let Some(index) = self.records.iter().rposition(|r| r.count() > 0) else {
            warn!("count was positive but no record has a positive count");
            return;
        };
        let remaining = self.records[index].count() - CATCH_UNIT;
        if remaining > 0 {
            self.records[index] = self.records[index].recounted(remaining);
        } else {
            self.records.remove(index);
        }
    }

    /// Stored records with the sum of their counts.
    fn read_records(&self) -> Result<(Vec<CatchRecord>, i64), LedgerError> {
        let Some(bytes) = self.store.read_records()? else {
            debug!("no stored records");
            return Ok((Vec::new(), 0));
        };
        let records = decode_records(&bytes)?;
        let total = records
            .iter()
            .try_fold(0i64, |sum, r| sum.checked_add(r.count()))
            .ok_or(LedgerError::CountOverflow)?;
        Ok((records, total))
    }

    /// Write-through. A failure is reported, the in-memory state stays.
    fn save(&mut self) {
        match self.persist() {
            Ok(()) => {
                debug!(
                    "saved {} records, total {}",
                    self.records.len(),
                    self.total_count
                );
                self.storage_status = None;
            }
            Err(e) => {
                warn!("failed to save catch records: {e}");
                self.storage_status = Some(Status::SaveFailed(e.to_string()));
            }
        }
    }

    fn persist(&mut self) -> Result<(), LedgerError> {
        let bytes = encode_records(&self.records)?;
        self.store.write_records(&bytes)?;
        self.store.write_counter(self.total_count)?;
        Ok(())
    }
}
