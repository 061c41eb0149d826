use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use uuid::Uuid;

const MAP_URL_BASE: &str = "https://www.google.com/maps?q=";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordId(pub String);

impl RecordId {
    /// Fresh upper-case hyphenated UUID, the form the Swift apps persist.
    pub fn generate() -> Self {
        RecordId(Uuid::new_v4().to_string().to_uppercase())
    }
}

/// A location fix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One catch event.
#[derive(Clone, Debug, PartialEq)]
pub struct CatchRecord {
    id: RecordId,
    timestamp: DateTime<Utc>,
    count: i64,
    coordinate: Option<Coordinate>,
}

impl CatchRecord {
    pub fn new(timestamp: DateTime<Utc>, count: i64, coordinate: Option<Coordinate>) -> Self {
        Self::with_id(RecordId::generate(), timestamp, count, coordinate)
    }

    /// Rebuild a record that already has an identity (decoded or re-counted).
    pub(crate) fn with_id(
        id: RecordId,
        timestamp: DateTime<Utc>,
        count: i64,
        coordinate: Option<Coordinate>,
    ) -> Self {
        Self {
            id,
            timestamp: truncate_to_millis(timestamp),
            count,
            coordinate,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    /// Latitude, 0.0 when the catch has no fix.
    pub fn latitude(&self) -> f64 {
        self.coordinate.map_or(0.0, |c| c.latitude)
    }

    /// Longitude, 0.0 when the catch has no fix.
    pub fn longitude(&self) -> f64 {
        self.coordinate.map_or(0.0, |c| c.longitude)
    }

    pub fn map_url(&self) -> String {
        map_url(self.latitude(), self.longitude())
    }

    /// Same record carrying a different count.
    pub(crate) fn recounted(&self, count: i64) -> Self {
        Self {
            count,
            ..self.clone()
        }
    }
}

/// Google Maps link for a coordinate pair.
///
/// Numbers are plain decimals that always keep a fractional part (`35.0`,
/// not `35`), as the apps write them for ordinary coordinates. Values the
/// apps would print in exponent form (below 1e-4 in magnitude) are written
/// out in full here instead, since Maps reads neither form as a coordinate.
pub fn map_url(latitude: f64, longitude: f64) -> String {
    format!("{MAP_URL_BASE}{},{}", decimal(latitude), decimal(longitude))
}

fn decimal(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

fn truncate_to_millis(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp
        .duration_trunc(TimeDelta::milliseconds(1))
        .unwrap_or(timestamp)
}
