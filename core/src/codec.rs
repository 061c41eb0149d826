//! JSON encoding of the persisted record list.
//!
//! The layout matches what the Swift apps write with `JSONEncoder` defaults:
//! dates are float seconds since 2001-01-01T00:00:00Z, ids are upper-case
//! UUID strings, and a catch without a fix is stored as `(0.0, 0.0)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{CatchRecord, Coordinate, RecordId};

/// Unix time of the Apple reference date (2001-01-01T00:00:00Z).
const REFERENCE_DATE_UNIX: i64 = 978_307_200;

#[derive(Serialize, Deserialize)]
struct StoredRecord {
    id: String,
    timestamp: f64,
    count: i64,
    latitude: f64,
    longitude: f64,
    #[serde(rename = "mapURL", default)]
    map_url: String,
}

impl From<&CatchRecord> for StoredRecord {
    fn from(record: &CatchRecord) -> Self {
        StoredRecord {
            id: record.id().0.clone(),
            timestamp: to_reference_seconds(record.timestamp()),
            count: record.count(),
            latitude: record.latitude(),
            longitude: record.longitude(),
            map_url: record.map_url(),
        }
    }
}

impl TryFrom<StoredRecord> for CatchRecord {
    type Error = LedgerError;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        let Some(timestamp) = from_reference_seconds(stored.timestamp) else {
            return Err(LedgerError::InvalidTimestamp {
                id: stored.id,
                seconds: stored.timestamp,
            });
        };
        let coordinate = if stored.latitude == 0.0 && stored.longitude == 0.0 {
            None
        } else {
            Some(Coordinate::new(stored.latitude, stored.longitude))
        };
        Ok(CatchRecord::with_id(
            RecordId(stored.id),
            timestamp,
            stored.count,
            coordinate,
        ))
    }
}

pub fn encode_records(records: &[CatchRecord]) -> Result<Vec<u8>, LedgerError> {
    let stored: Vec<StoredRecord> = records.iter().map(StoredRecord::from).collect();
    serde_json::to_vec(&stored).map_err(LedgerError::Encode)
}

pub fn decode_records(bytes: &[u8]) -> Result<Vec<CatchRecord>, LedgerError> {
    let stored: Vec<StoredRecord> = serde_json::from_slice(bytes).map_err(LedgerError::Decode)?;
    stored.into_iter().map(CatchRecord::try_from).collect()
}

fn to_reference_seconds(timestamp: DateTime<Utc>) -> f64 {
    let millis = timestamp.timestamp_millis() - REFERENCE_DATE_UNIX * 1000;
    millis as f64 / 1000.0
}

/// `None` when the value is not finite or falls outside what `DateTime` holds.
fn from_reference_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    let millis = (seconds * 1000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    let millis = (millis as i64).checked_add(REFERENCE_DATE_UNIX * 1000)?;
    DateTime::from_timestamp_millis(millis)
}
