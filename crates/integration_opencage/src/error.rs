//! Geocoding error types

use json_access::JsonAccessError;
use thiserror::Error;

/// Errors that can occur during geocoding operations
///
/// Variants fall into five groups: caller input validation (raised before
/// any request is sent), named upstream API errors, generic integration or
/// server faults, decoding errors, and transport/configuration failures.
/// Every HTTP-derived variant carries the raw response body.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// `bounds` did not have exactly four components
    #[error(
        "Invalid bounds: expected 4 components (min_lon, min_lat, max_lon, max_lat), got {0}"
    )]
    InvalidBounds(usize),

    /// `limit` outside of 1..=100
    #[error("Invalid limit {0}: must be between 1 and 100")]
    InvalidLimit(u32),

    /// `proximity` is not a valid WGS84 point
    #[error("Invalid proximity point: {0}")]
    InvalidProximity(String),

    /// HTTP 400: the API rejected the request parameters
    #[error("Validation failed (HTTP 400): {body}")]
    BadRequest {
        /// Raw response body
        body: String,
    },

    /// HTTP 401: API key missing or not accepted
    #[error("API key not accepted (HTTP 401)")]
    InvalidKey {
        /// Raw response body
        body: String,
    },

    /// HTTP 402: quota exceeded
    #[error("Quota exceeded (HTTP 402)")]
    QuotaExceeded {
        /// Raw response body
        body: String,
    },

    /// HTTP 403: key disabled or IP address blocked
    #[error("Not authorized for API or IP address blocked (HTTP 403)")]
    Forbidden {
        /// Raw response body
        body: String,
    },

    /// HTTP 408: the API timed out while handling the request
    #[error("Request timed out upstream (HTTP 408)")]
    UpstreamTimeout {
        /// Raw response body
        body: String,
    },

    /// HTTP 429: too many requests
    #[error("Too many requests, slow down (HTTP 429)")]
    TooManyRequests {
        /// Raw response body
        body: String,
    },

    /// HTTP 404, 405, 410 or 426: the client built a request the API does not serve
    #[error("Client integration fault, server returned HTTP {status}: {body}")]
    IntegrationFault {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// HTTP 500 or 503
    #[error("Server error HTTP {status}: {body}")]
    ServerFault {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Any other non-success status
    #[error("Unexpected status HTTP {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body did not match the documented shape
    #[error("Decoding error: {0}")]
    Decoding(#[from] JsonAccessError),

    /// HTTP client could not be initialized
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Transport-level failure (connect, TLS, timeout, body read)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Configuration error (e.g. no API key available)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl GeocodeError {
    /// Map a non-success HTTP status and its body to the matching variant
    ///
    /// Callers only invoke this for statuses >= 300.
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => Self::BadRequest { body },
            401 => Self::InvalidKey { body },
            402 => Self::QuotaExceeded { body },
            403 => Self::Forbidden { body },
            408 => Self::UpstreamTimeout { body },
            429 => Self::TooManyRequests { body },
            404 | 405 | 410 | 426 => Self::IntegrationFault { status, body },
            500 | 503 => Self::ServerFault { status, body },
            _ => Self::UnexpectedStatus { status, body },
        }
    }

    /// HTTP status this error was derived from, if any
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::InvalidKey { .. } => Some(401),
            Self::QuotaExceeded { .. } => Some(402),
            Self::Forbidden { .. } => Some(403),
            Self::UpstreamTimeout { .. } => Some(408),
            Self::TooManyRequests { .. } => Some(429),
            Self::IntegrationFault { status, .. }
            | Self::ServerFault { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body, for every HTTP-derived variant
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::BadRequest { body }
            | Self::InvalidKey { body }
            | Self::QuotaExceeded { body }
            | Self::Forbidden { body }
            | Self::UpstreamTimeout { body }
            | Self::TooManyRequests { body }
            | Self::IntegrationFault { body, .. }
            | Self::ServerFault { body, .. }
            | Self::UnexpectedStatus { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns true for caller input errors raised before any request
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidBounds(_) | Self::InvalidLimit(_) | Self::InvalidProximity(_)
        )
    }

    /// Returns true for the named upstream API errors callers are expected to branch on
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::BadRequest { .. }
                | Self::InvalidKey { .. }
                | Self::QuotaExceeded { .. }
                | Self::Forbidden { .. }
                | Self::UpstreamTimeout { .. }
                | Self::TooManyRequests { .. }
        )
    }

    /// Returns true if retrying later may succeed
    ///
    /// Informational only: the client itself never retries.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamTimeout { .. }
                | Self::TooManyRequests { .. }
                | Self::ServerFault { .. }
                | Self::RequestFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> String {
        "{\"status\":{\"code\":0}}".to_string()
    }

    #[test]
    fn test_named_statuses() {
        assert!(matches!(
            GeocodeError::from_status(400, body()),
            GeocodeError::BadRequest { .. }
        ));
        assert!(matches!(
            GeocodeError::from_status(401, body()),
            GeocodeError::InvalidKey { .. }
        ));
        assert!(matches!(
            GeocodeError::from_status(402, body()),
            GeocodeError::QuotaExceeded { .. }
        ));
        assert!(matches!(
            GeocodeError::from_status(403, body()),
            GeocodeError::Forbidden { .. }
        ));
        assert!(matches!(
            GeocodeError::from_status(408, body()),
            GeocodeError::UpstreamTimeout { .. }
        ));
        assert!(matches!(
            GeocodeError::from_status(429, body()),
            GeocodeError::TooManyRequests { .. }
        ));
    }

    #[test]
    fn test_integration_faults() {
        for status in [404, 405, 410, 426] {
            let err = GeocodeError::from_status(status, body());
            assert!(
                matches!(err, GeocodeError::IntegrationFault { status: s, .. } if s == status),
                "status {status} mapped to {err:?}"
            );
        }
    }

    #[test]
    fn test_server_faults() {
        for status in [500, 503] {
            let err = GeocodeError::from_status(status, body());
            assert!(matches!(err, GeocodeError::ServerFault { .. }));
        }
    }

    #[test]
    fn test_unexpected_statuses() {
        for status in [302, 418, 502, 504] {
            let err = GeocodeError::from_status(status, body());
            assert!(matches!(err, GeocodeError::UnexpectedStatus { .. }));
        }
    }

    #[test]
    fn test_status_and_body_roundtrip() {
        for status in [400, 401, 402, 403, 404, 408, 429, 500, 599] {
            let err = GeocodeError::from_status(status, "payload".to_string());
            assert_eq!(err.status(), Some(status));
            assert_eq!(err.body(), Some("payload"));
        }
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        let err = GeocodeError::InvalidLimit(0);
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);

        let err = GeocodeError::RequestFailed("connection reset".to_string());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_classification() {
        assert!(GeocodeError::InvalidBounds(3).is_validation());
        assert!(GeocodeError::InvalidLimit(101).is_validation());
        assert!(!GeocodeError::InvalidLimit(101).is_upstream());

        assert!(GeocodeError::from_status(401, body()).is_upstream());
        assert!(!GeocodeError::from_status(404, body()).is_upstream());
        assert!(!GeocodeError::from_status(500, body()).is_upstream());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(GeocodeError::from_status(429, body()).is_retryable());
        assert!(GeocodeError::from_status(408, body()).is_retryable());
        assert!(GeocodeError::from_status(503, body()).is_retryable());
        assert!(GeocodeError::RequestFailed("timeout".to_string()).is_retryable());

        assert!(!GeocodeError::from_status(401, body()).is_retryable());
        assert!(!GeocodeError::from_status(402, body()).is_retryable());
        assert!(!GeocodeError::from_status(404, body()).is_retryable());
        assert!(!GeocodeError::InvalidBounds(2).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = GeocodeError::InvalidLimit(101);
        assert_eq!(err.to_string(), "Invalid limit 101: must be between 1 and 100");

        let err = GeocodeError::from_status(503, "maintenance".to_string());
        assert_eq!(err.to_string(), "Server error HTTP 503: maintenance");

        let err = GeocodeError::from(JsonAccessError::missing("results"));
        assert_eq!(err.to_string(), "Decoding error: Missing field: results");
    }
}
