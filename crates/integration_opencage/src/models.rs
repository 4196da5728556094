//! Geocoding response models
//!
//! [`GeocodeResponse`] keeps the decoded JSON document untouched. Every view
//! (`results`, `licenses`, `rate`, ...) is decoded from it on each call, so
//! fields this crate does not model are never lost.

use chrono::{DateTime, Utc};
use domain::{BoundingBox, Point};
use json_access::{JsonAccess, JsonAccessError, as_point};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root document of a geocoding response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeocodeResponse {
    document: Map<String, Value>,
}

impl GeocodeResponse {
    /// Wrap a decoded JSON object
    #[must_use]
    pub const fn from_document(document: Map<String, Value>) -> Self {
        Self { document }
    }

    /// The raw document, in the order the API sent it
    #[must_use]
    pub const fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// Consume the response and return the raw document
    #[must_use]
    pub fn into_document(self) -> Map<String, Value> {
        self.document
    }

    /// Results, best match first
    ///
    /// # Errors
    ///
    /// Returns [`JsonAccessError::MissingField`] if `results` is absent and
    /// [`JsonAccessError::Decode`] if any result is malformed.
    pub fn results(&self) -> Result<Vec<GeocodeResult>, JsonAccessError> {
        self.deserialize_list(["results"])?
            .ok_or_else(|| JsonAccessError::missing("results"))
    }

    /// Data licenses that apply to the results
    pub fn licenses(&self) -> Result<Vec<License>, JsonAccessError> {
        self.deserialize_list(["licenses"])?
            .ok_or_else(|| JsonAccessError::missing("licenses"))
    }

    /// When the response was created
    pub fn timestamp(&self) -> Result<Timestamp, JsonAccessError> {
        self.deserialize(["timestamp"])?
            .ok_or_else(|| JsonAccessError::missing("timestamp"))
    }

    /// Rate limit information for the key used
    pub fn rate(&self) -> Result<Rate, JsonAccessError> {
        self.deserialize(["rate"])?
            .ok_or_else(|| JsonAccessError::missing("rate"))
    }

    /// Number of results
    pub fn total_results(&self) -> Result<i64, JsonAccessError> {
        self.get_long(["total_results"])
            .ok_or_else(|| JsonAccessError::missing("total_results"))
    }

    /// Status block (`code` and `message`), if present
    pub fn status(&self) -> Result<Option<ResponseStatus>, JsonAccessError> {
        self.deserialize(["status"])
    }

    /// Echo of the request parameters, sent when `add_request` was set
    pub fn request(&self) -> Option<&Map<String, Value>> {
        self.get_object(["request"])
    }

    /// Thank-you note from the API
    pub fn thanks(&self) -> Option<String> {
        self.get_string(["thanks"])
    }

    /// Link to the API documentation
    pub fn documentation(&self) -> Option<String> {
        self.get_string(["documentation"])
    }
}

impl JsonAccess for GeocodeResponse {
    fn as_json_object(&self) -> Option<&Map<String, Value>> {
        Some(&self.document)
    }
}

impl From<Map<String, Value>> for GeocodeResponse {
    fn from(document: Map<String, Value>) -> Self {
        Self::from_document(document)
    }
}

/// A single geocoding match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Match quality from 0 (unknown) to 10 (best)
    pub confidence: f64,
    /// Distance from the query point, for queries that have one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_q: Option<Distance>,
    /// Human readable address or place name
    pub formatted: String,
    /// Raw `geometry` object; see [`GeocodeResult::point`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Map<String, Value>>,
    /// Raw `bounds` object; see [`GeocodeResult::bounds`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Map<String, Value>>,
    /// Structured address components
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    /// Extra information (timezone, currency, ...) unless suppressed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl GeocodeResult {
    /// Location of the match
    ///
    /// # Errors
    ///
    /// Returns [`JsonAccessError::MissingField`] if the geometry has a
    /// longitude but no latitude.
    pub fn point(&self) -> Result<Option<Point>, JsonAccessError> {
        match &self.geometry {
            Some(geometry) => as_point(geometry).map_err(|e| e.within("geometry")),
            None => Ok(None),
        }
    }

    /// Extent of the match as `(min_lon, min_lat, max_lon, max_lat)`
    ///
    /// Read from the result-level `bounds`, falling back to
    /// `geometry.bounds`. `None` unless both corners are present.
    pub fn bounds(&self) -> Result<Option<BoundingBox>, JsonAccessError> {
        let nested = self
            .geometry
            .as_ref()
            .and_then(|geometry| geometry.get_object(["bounds"]));

        let (object, location) = match (&self.bounds, nested) {
            (Some(bounds), _) => (bounds, "bounds"),
            (None, Some(bounds)) => (bounds, "geometry.bounds"),
            (None, None) => return Ok(None),
        };

        let north_east = object
            .get_point(["northeast"])
            .map_err(|e| e.within(location))?;
        let south_west = object
            .get_point(["southwest"])
            .map_err(|e| e.within(location))?;

        Ok(north_east
            .zip(south_west)
            .map(|(a, b)| BoundingBox::from_corners(a, b)))
    }
}

/// Distance between the query point and a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distance {
    /// Distance in meters
    pub meters: u64,
}

/// Structured address components of a result
///
/// Keys without a dedicated field (`county`, `town`, `village`, ...) are
/// kept in [`Components::other`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(rename = "ISO_3166-1_alpha-2", skip_serializing_if = "Option::is_none")]
    pub iso_3166_1_alpha_2: Option<String>,
    #[serde(rename = "ISO_3166-1_alpha-3", skip_serializing_if = "Option::is_none")]
    pub iso_3166_1_alpha_3: Option<String>,
    /// Country subdivision codes
    #[serde(rename = "ISO_3166-2", skip_serializing_if = "Option::is_none")]
    pub iso_3166_2: Option<Vec<String>>,
    #[serde(rename = "_category", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "_normalized_city", skip_serializing_if = "Option::is_none")]
    pub normalized_city: Option<String>,
    /// Kind of place matched (`building`, `city`, `road`, ...)
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub place_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbourhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub political_union: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suburb: Option<String>,
    /// Every other component key
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Components {
    /// Any component by its API key, as text
    ///
    /// Covers both the dedicated fields and [`Components::other`].
    pub fn get(&self, key: &str) -> Option<String> {
        serde_json::to_value(self)
            .ok()
            .and_then(|value| value.get_string([key]))
    }

    /// Best available settlement name: city, town, village or hamlet
    pub fn locality(&self) -> Option<String> {
        self.city.clone().or_else(|| {
            ["town", "village", "hamlet"]
                .into_iter()
                .find_map(|key| self.other.get_string([key]))
        })
    }
}

/// Open-ended annotations attached to a result
///
/// Content varies by result and by API plan; the accessors below cover the
/// common keys and everything else stays reachable through [`JsonAccess`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotations(Map<String, Value>);

impl Annotations {
    /// The raw annotation object
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// IANA timezone name, e.g. `Europe/Berlin`
    pub fn timezone_name(&self) -> Option<String> {
        self.get_string(["timezone", "name"])
    }

    /// ISO 4217 currency code, e.g. `EUR`
    pub fn currency_iso_code(&self) -> Option<String> {
        self.get_string(["currency", "iso_code"])
    }

    /// Country flag emoji
    pub fn flag(&self) -> Option<String> {
        self.get_string(["flag"])
    }

    /// what3words address
    pub fn what3words(&self) -> Option<String> {
        self.get_string(["what3words", "words"])
    }

    /// International calling code
    pub fn calling_code(&self) -> Option<i64> {
        self.get_long(["callingcode"])
    }

    /// Geohash of the result point
    pub fn geohash(&self) -> Option<String> {
        self.get_string(["geohash"])
    }

    /// Latitude and longitude in degrees/minutes/seconds notation
    pub fn dms(&self) -> Option<(String, String)> {
        self.get_string(["DMS", "lat"])
            .zip(self.get_string(["DMS", "lng"]))
    }
}

impl JsonAccess for Annotations {
    fn as_json_object(&self) -> Option<&Map<String, Value>> {
        Some(&self.0)
    }
}

impl From<Map<String, Value>> for Annotations {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Data license of a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    pub url: String,
}

/// Response creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    /// Seconds since the Unix epoch
    pub created_unix: i64,
    /// Same instant as an HTTP date string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_http: Option<String>,
}

impl Timestamp {
    /// Creation time as a UTC date-time
    ///
    /// `None` if the value is outside the range chrono can represent.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_unix, 0)
    }
}

/// Rate limit state of the API key
///
/// Keys on unlimited plans get no rate block at all; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// Requests allowed per period
    #[serde(default)]
    pub limit: Option<u32>,
    /// Requests left in the current period
    #[serde(default)]
    pub remaining: Option<u32>,
    /// When the period resets, in seconds since the Unix epoch
    #[serde(default)]
    pub reset: Option<i64>,
}

impl Rate {
    /// Reset time as a UTC date-time
    pub fn reset_time(&self) -> Option<DateTime<Utc>> {
        self.reset.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// `status` block of a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// Mirrors the HTTP status code
    pub code: u16,
    /// Short description, e.g. `OK`
    pub message: String,
}
