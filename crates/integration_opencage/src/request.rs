//! Geocode request parameters and their query-string encoding

use std::fmt;

use domain::{BoundingBox, Point};
use serde::{Deserialize, Serialize};

use crate::error::GeocodeError;

/// Smallest accepted `limit`
pub const MIN_LIMIT: u32 = 1;

/// Largest accepted `limit`
pub const MAX_LIMIT: u32 = 100;

/// Value of a pass-through request parameter
///
/// `Bool(true)` is sent as the flag value `"1"`; every other value is sent
/// as its textual representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Free text
    Text(String),
}

impl ParamValue {
    /// Value as it appears in the query string
    #[must_use]
    pub fn to_query_value(&self) -> String {
        match self {
            Self::Bool(true) => "1".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A single forward or reverse geocoding request
///
/// Built with chained setters; nothing is validated until
/// [`GeocodeRequest::to_query_pairs`] runs, which happens before the client
/// sends anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeRequest {
    /// Free text for forward geocoding, or `"lat,lon"` for reverse geocoding
    pub query: String,
    /// Restrict results to `(min_lon, min_lat, max_lon, max_lat)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Vec<f64>>,
    /// Restrict results to one or more comma-separated country codes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// IETF language tag, or `native`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Maximum number of results (1-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Bias results towards this point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity: Option<Point>,
    /// Abbreviate the formatted string (`abbrv`)
    #[serde(default)]
    pub abbreviate: Option<bool>,
    /// Exclude POI names from the formatted string (`address_only`)
    #[serde(default)]
    pub address_only: Option<bool>,
    /// Echo request parameters in the response (`add_request`)
    #[serde(default)]
    pub add_request_echo: Option<bool>,
    /// Omit annotations from results (`no_annotations`)
    #[serde(default)]
    pub suppress_annotations: Option<bool>,
    /// Do not deduplicate results (`no_dedupe`)
    #[serde(default)]
    pub suppress_dedupe: Option<bool>,
    /// Ask the API not to log the query (`no_record`)
    #[serde(default)]
    pub suppress_logging: Option<bool>,
    /// Match the nearest road instead of the nearest address (`roadinfo`)
    #[serde(default)]
    pub road_info_mode: Option<bool>,
    /// Parameters this client has no typed setter for, in insertion order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_params: Vec<(String, ParamValue)>,
}

impl GeocodeRequest {
    /// Create a request for `query`
    ///
    /// The query is passed through verbatim; the API decides whether it is
    /// free text or coordinates.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Create a reverse geocoding request for a coordinate pair
    #[must_use]
    pub fn reverse(latitude: f64, longitude: f64) -> Self {
        Self::new(format!("{latitude},{longitude}"))
    }

    /// Restrict results to a bounding box given as raw components
    #[must_use]
    pub fn bounds(mut self, bounds: impl Into<Vec<f64>>) -> Self {
        self.bounds = Some(bounds.into());
        self
    }

    /// Restrict results to a bounding box
    #[must_use]
    pub fn bounding_box(self, bbox: BoundingBox) -> Self {
        self.bounds(bbox.to_array())
    }

    /// Restrict results to the given country code(s)
    #[must_use]
    pub fn country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    /// Preferred response language
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Maximum number of results
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Bias results towards a point
    #[must_use]
    pub const fn proximity(mut self, point: Point) -> Self {
        self.proximity = Some(point);
        self
    }

    /// Set the `abbrv` flag
    #[must_use]
    pub const fn abbreviate(mut self, enabled: bool) -> Self {
        self.abbreviate = Some(enabled);
        self
    }

    /// Set the `address_only` flag
    #[must_use]
    pub const fn address_only(mut self, enabled: bool) -> Self {
        self.address_only = Some(enabled);
        self
    }

    /// Set the `add_request` flag
    #[must_use]
    pub const fn add_request_echo(mut self, enabled: bool) -> Self {
        self.add_request_echo = Some(enabled);
        self
    }

    /// Set the `no_annotations` flag
    #[must_use]
    pub const fn suppress_annotations(mut self, enabled: bool) -> Self {
        self.suppress_annotations = Some(enabled);
        self
    }

    /// Set the `no_dedupe` flag
    #[must_use]
    pub const fn suppress_dedupe(mut self, enabled: bool) -> Self {
        self.suppress_dedupe = Some(enabled);
        self
    }

    /// Set the `no_record` flag
    #[must_use]
    pub const fn suppress_logging(mut self, enabled: bool) -> Self {
        self.suppress_logging = Some(enabled);
        self
    }

    /// Set the `roadinfo` flag
    #[must_use]
    pub const fn road_info_mode(mut self, enabled: bool) -> Self {
        self.road_info_mode = Some(enabled);
        self
    }

    /// Add a parameter the client has no typed setter for
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.additional_params.push((key.into(), value.into()));
        self
    }

    /// Validate the request and encode it as query pairs
    ///
    /// The API key is not included; the client attaches it.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::InvalidBounds`], [`GeocodeError::InvalidLimit`]
    /// or [`GeocodeError::InvalidProximity`] for invalid caller input.
    pub fn to_query_pairs(&self) -> Result<Vec<(String, String)>, GeocodeError> {
        let mut pairs = vec![("q".to_string(), self.query.clone())];

        for (enabled, name) in self.flags() {
            if enabled == Some(true) {
                pairs.push((name.to_string(), "1".to_string()));
            }
        }

        if let Some(bounds) = &self.bounds {
            pairs.push(("bounds".to_string(), encode_bounds(bounds)?));
        }

        if let Some(country_code) = &self.country_code {
            pairs.push(("countrycode".to_string(), country_code.clone()));
        }

        if let Some(language) = &self.language {
            pairs.push(("language".to_string(), language.clone()));
        }

        if let Some(limit) = self.limit {
            if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
                return Err(GeocodeError::InvalidLimit(limit));
            }
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        if let Some(point) = &self.proximity {
            pairs.push(("proximity".to_string(), encode_proximity(point)?));
        }

        for (key, value) in &self.additional_params {
            pairs.push((key.clone(), value.to_query_value()));
        }

        Ok(pairs)
    }

    const fn flags(&self) -> [(Option<bool>, &'static str); 7] {
        [
            (self.abbreviate, "abbrv"),
            (self.add_request_echo, "add_request"),
            (self.address_only, "address_only"),
            (self.suppress_annotations, "no_annotations"),
            (self.suppress_dedupe, "no_dedupe"),
            (self.suppress_logging, "no_record"),
            (self.road_info_mode, "roadinfo"),
        ]
    }
}

/// Comma-join the four bounds components in input order
fn encode_bounds(bounds: &[f64]) -> Result<String, GeocodeError> {
    if bounds.len() != 4 {
        return Err(GeocodeError::InvalidBounds(bounds.len()));
    }
    Ok(bounds
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(","))
}

/// Proximity is sent latitude first, unlike the internal lon-first order
fn encode_proximity(point: &Point) -> Result<String, GeocodeError> {
    if !point.is_valid() {
        return Err(GeocodeError::InvalidProximity(format!(
            "latitude {} / longitude {} out of range",
            point.latitude(),
            point.longitude()
        )));
    }
    Ok(format!("{},{}", point.latitude(), point.longitude()))
}
