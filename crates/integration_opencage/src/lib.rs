#![forbid(unsafe_code)]
//! OpenCage geocoding integration
//!
//! Typed client for the [OpenCage geocoding API](https://opencagedata.com/api),
//! covering forward geocoding (free text to coordinates) and reverse
//! geocoding (coordinates to an address).
//!
//! # Architecture
//!
//! [`GeocodeRequest`] encodes typed, optional parameters into query pairs and
//! rejects invalid input before any network I/O. [`OpenCageClient`] sends
//! exactly one `GET {base_url}/v1/json` per call and maps the HTTP status to
//! either a [`GeocodeResponse`] or a [`GeocodeError`]. The response keeps the
//! raw JSON document; typed views such as [`GeocodeResponse::results`] are
//! computed from it on every access.
//!
//! The client never caches, retries or rate-limits.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_opencage::{GeocodeRequest, GeocodingClient, OpenCageClient, OpenCageConfig};
//!
//! let client = OpenCageClient::new(OpenCageConfig::with_api_key("my-key"))?;
//!
//! let request = GeocodeRequest::new("Wattstraße 11, Berlin")
//!     .country_code("de")
//!     .limit(3);
//! let response = client.geocode(&request).await?;
//! for result in response.results()? {
//!     println!("{} ({:?})", result.formatted, result.point()?);
//! }
//! ```

mod client;
mod config;
mod error;
mod models;
mod request;

pub use client::{GeocodingClient, OpenCageClient};
pub use config::{API_KEY_ENV, DEFAULT_CONFIG_FILE, OpenCageConfig};
pub use error::GeocodeError;
pub use models::{
    Annotations, Components, Distance, GeocodeResponse, GeocodeResult, License, Rate,
    ResponseStatus, Timestamp,
};
pub use request::{GeocodeRequest, ParamValue};

pub use domain::{BoundingBox, Point};
pub use json_access::{JsonAccess, JsonAccessError};
