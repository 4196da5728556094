//! Point decoding

use domain::Point;
use serde_json::{Map, Value};

use crate::access::JsonAccess;
use crate::error::JsonAccessError;

/// Read a `{"lat": .., "lng": ..}` object as a [`Point`]
///
/// `lng` is checked first: without it the object is not a point and
/// `Ok(None)` is returned. An object with `lng` but no usable `lat` is
/// malformed. Coordinates are taken as-is, without range validation, since
/// they come from the API rather than from the caller.
///
/// # Errors
///
/// Returns [`JsonAccessError::MissingField`] for `lat` when `lng` is present
/// but `lat` is not.
pub fn as_point(object: &Map<String, Value>) -> Result<Option<Point>, JsonAccessError> {
    let Some(longitude) = object.get_double(["lng"]) else {
        return Ok(None);
    };
    let latitude = object
        .get_double(["lat"])
        .ok_or_else(|| JsonAccessError::missing("lat"))?;

    Ok(Some(Point::new_unchecked(latitude, longitude)))
}
