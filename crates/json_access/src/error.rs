//! JSON accessor error types

use thiserror::Error;

/// Errors raised when a value is present but cannot be decoded
///
/// Absence is never an error in this layer; callers that require a field
/// turn `None` into [`JsonAccessError::MissingField`] explicitly.
#[derive(Debug, Error)]
pub enum JsonAccessError {
    /// A field guaranteed by the document contract is absent
    #[error("Missing field: {path}")]
    MissingField {
        /// Dotted path of the missing field
        path: String,
    },

    /// A value is present but has the wrong shape
    #[error("Malformed value at {path}: {reason}")]
    Malformed {
        /// Dotted path of the offending value
        path: String,
        /// What was expected
        reason: String,
    },

    /// Typed decoding of a sub-tree failed
    #[error("Failed to decode {path}: {source}")]
    Decode {
        /// Dotted path of the sub-tree
        path: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

impl JsonAccessError {
    /// Create a missing field error
    pub fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    /// Create a malformed value error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Dotted path the error refers to
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MissingField { path } | Self::Malformed { path, .. } | Self::Decode { path, .. } => {
                path
            },
        }
    }

    /// Re-anchor the error below `prefix`
    ///
    /// Used when an accessor runs on a sub-object whose own location is
    /// known to the caller.
    #[must_use]
    pub fn within(self, prefix: &str) -> Self {
        if prefix.is_empty() || prefix == "$" {
            return self;
        }
        let join = |path: String| format!("{prefix}.{path}");
        match self {
            Self::MissingField { path } => Self::MissingField { path: join(path) },
            Self::Malformed { path, reason } => Self::Malformed {
                path: join(path),
                reason,
            },
            Self::Decode { path, source } => Self::Decode {
                path: join(path),
                source,
            },
        }
    }
}
