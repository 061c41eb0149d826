use crate::error::LocationError;
use crate::location::LocationProvider;
use crate::models::Coordinate;

/// Provider that always reports the same reading.
#[derive(Clone, Debug, Default)]
pub struct FixedLocation {
    pub coordinate: Option<Coordinate>,
    pub error: Option<LocationError>,
}

impl FixedLocation {
    /// No fix yet, no error.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinate: Some(Coordinate::new(latitude, longitude)),
            error: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            coordinate: None,
            error: Some(LocationError::new(message)),
        }
    }

    pub fn with_sample_data() -> Self {
        // Tokyo Bay
        Self::at(35.6, 139.8)
    }
}

impl LocationProvider for FixedLocation {
    fn current_coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    fn last_error(&self) -> Option<LocationError> {
        self.error.clone()
    }
}
