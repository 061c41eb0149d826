use std::sync::{Arc, Mutex, PoisonError};

use crate::error::LocationError;
use crate::models::Coordinate;

/// Source of the last known fix for tagging catches.
pub trait LocationProvider {
    fn current_coordinate(&self) -> Option<Coordinate>;
    fn last_error(&self) -> Option<LocationError>;

    /// Both fields as one consistent reading.
    fn snapshot(&self) -> LocationState {
        LocationState {
            coordinate: self.current_coordinate(),
            error: self.last_error(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationState {
    pub coordinate: Option<Coordinate>,
    pub error: Option<LocationError>,
}

/// Last-known-value cache fed by platform location callbacks.
///
/// Callbacks may run on any thread; the ledger reads on its own. Every
/// update replaces the whole state under one lock.
#[derive(Clone, Debug, Default)]
pub struct LocationCache {
    state: Arc<Mutex<LocationState>>,
}

impl LocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new fix arrived; any pending error is cleared.
    pub fn update_fix(&self, coordinate: Coordinate) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = LocationState {
            coordinate: Some(coordinate),
            error: None,
        };
    }

    /// The location service failed. The last fix is kept.
    pub fn report_failure(&self, error: LocationError) {
        log::warn!("location update failed: {error}");
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.error = Some(error);
    }
}

impl LocationProvider for LocationCache {
    fn current_coordinate(&self) -> Option<Coordinate> {
        self.snapshot().coordinate
    }

    fn last_error(&self) -> Option<LocationError> {
        self.snapshot().error
    }

    fn snapshot(&self) -> LocationState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
