#![forbid(unsafe_code)]
//! JSON accessor layer
//!
//! Safe, path-based navigation of semi-structured JSON documents and
//! on-demand typed decoding of sub-trees, without requiring the whole
//! document to match a fixed schema.
//!
//! # Failure policy
//!
//! Every accessor is a pure function of its input tree and path. A value
//! that is simply not there is reported as `None`; only a value that is
//! present but malformed produces a [`JsonAccessError`], and that error
//! always names the dotted path it was found at.
//!
//! # Example
//!
//! ```rust
//! use json_access::{JsonAccess, path};
//! use serde_json::json;
//!
//! let doc = json!({"results": {"0": {"confidence": 9}}});
//! assert_eq!(doc.get_long(path!["results", 0, "confidence"]), Some(9));
//! assert_eq!(doc.get_long(["results", "missing"]), None);
//! assert!(!doc.get_boolean(["results", "flag"]));
//! ```

mod access;
mod error;
mod path;
mod point;

pub use access::JsonAccess;
pub use error::JsonAccessError;
pub use path::{PathSegment, render_path};
pub use point::as_point;
