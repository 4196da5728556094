//! Geographic point value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// A WGS84 point
///
/// Stored longitude-first, following the GeoJSON coordinate convention.
/// Accessors are provided for both components so callers never have to
/// remember the internal ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
}

impl Point {
    /// Create a new point with validation
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCoordinates`] if latitude is not in [-90, 90],
    /// longitude is not in [-180, 180], or either value is not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let point = Self::new_unchecked(latitude, longitude);
        if !point.is_valid() {
            return Err(DomainError::invalid_coordinates(latitude, longitude));
        }
        Ok(point)
    }

    /// Create a point without validation (for values decoded from the API)
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Coordinates in GeoJSON order: `[longitude, latitude]`
    #[must_use]
    pub const fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Whether both components are finite and inside the WGS84 range
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
