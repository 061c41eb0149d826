//! Objects handed to the Swift phone and watch apps.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::LocationError;
use crate::ledger::CatchLedger;
use crate::location::LocationCache;
use crate::models::{CatchRecord, Coordinate};
use crate::storage::FileStore;

#[derive(Clone, Debug, PartialEq)]
pub struct CatchRecordView {
    pub id: String,
    pub timestamp_unix_ms: i64,
    pub count: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub map_url: String,
}

impl From<&CatchRecord> for CatchRecordView {
    fn from(record: &CatchRecord) -> Self {
        let coordinate = record.coordinate();
        CatchRecordView {
            id: record.id().0.clone(),
            timestamp_unix_ms: record.timestamp().timestamp_millis(),
            count: record.count(),
            latitude: coordinate.map(|c| c.latitude),
            longitude: coordinate.map(|c| c.longitude),
            map_url: record.map_url(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterSnapshot {
    pub total_count: i64,
    pub records: Vec<CatchRecordView>,
    pub status: Option<String>,
}

/// Receives updates from the app's location manager delegate.
#[derive(Debug, Default)]
pub struct LocationFeed {
    cache: LocationCache,
}

impl LocationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_fix(&self, latitude: f64, longitude: f64) {
        self.cache.update_fix(Coordinate::new(latitude, longitude));
    }

    pub fn report_error(&self, message: String) {
        self.cache.report_failure(LocationError::new(message));
    }
}

/// Ledger stored under `store_dir`, shared with the UI.
pub struct FishCounter {
    ledger: Mutex<CatchLedger<FileStore, LocationCache>>,
}

impl FishCounter {
    pub fn new(store_dir: String, location: Arc<LocationFeed>) -> Self {
        let ledger = CatchLedger::new(FileStore::new(store_dir), location.cache.clone());
        Self {
            ledger: Mutex::new(ledger),
        }
    }

    pub fn load(&self) -> CounterSnapshot {
        self.update(|ledger| ledger.load())
    }

    pub fn record_catch(&self) -> CounterSnapshot {
        self.update(|ledger| {
            ledger.record_catch();
        })
    }

    pub fn decrement(&self) -> CounterSnapshot {
        self.update(|ledger| {
            ledger.decrement();
        })
    }

    pub fn reset(&self) -> CounterSnapshot {
        self.update(|ledger| ledger.reset())
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        self.update(|_| {})
    }

    fn update<F>(&self, f: F) -> CounterSnapshot
    where
        F: FnOnce(&mut CatchLedger<FileStore, LocationCache>),
    {
        let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *ledger);
        CounterSnapshot {
            total_count: ledger.total_count(),
            records: ledger.records().iter().map(CatchRecordView::from).collect(),
            status: ledger.status().map(ToString::to_string),
        }
    }
}
