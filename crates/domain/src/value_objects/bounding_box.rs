//! Bounding box value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Point;

/// A rectangular region in `(min_lon, min_lat, max_lon, max_lat)` order
///
/// This is the GeoJSON `bbox` convention and the order the geocoding API
/// expects for its `bounds` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western edge
    pub min_lon: f64,
    /// Southern edge
    pub min_lat: f64,
    /// Eastern edge
    pub max_lon: f64,
    /// Northern edge
    pub max_lat: f64,
}

impl BoundingBox {
    /// Build a box from two opposite corners
    ///
    /// The corners may be given in any order; the result always holds the
    /// component-wise minimum and maximum.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min_lon: a.longitude().min(b.longitude()),
            min_lat: a.latitude().min(b.latitude()),
            max_lon: a.longitude().max(b.longitude()),
            max_lat: a.latitude().max(b.latitude()),
        }
    }

    /// Components as an array in `(min_lon, min_lat, max_lon, max_lat)` order
    #[must_use]
    pub const fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}
