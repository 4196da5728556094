//! Domain layer for the OpenCage geocoding client
//!
//! Contains the geographic value objects (points and bounding boxes) that the
//! JSON accessor layer produces and the geocode client consumes, plus the
//! errors raised when they are built from invalid input.
//! This layer performs no I/O.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
