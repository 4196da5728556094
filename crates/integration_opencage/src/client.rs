//! OpenCage geocoding client
//!
//! HTTP client for the OpenCage geocoding API.

use std::time::Duration;

use async_trait::async_trait;
use json_access::JsonAccessError;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::{
    config::OpenCageConfig, error::GeocodeError, models::GeocodeResponse,
    request::GeocodeRequest,
};

/// Geocoding client trait
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Run a forward or reverse geocoding request
    ///
    /// Exactly one HTTP request is sent per call; failures are returned
    /// immediately without retrying.
    async fn geocode(&self, request: &GeocodeRequest) -> Result<GeocodeResponse, GeocodeError>;

    /// Look up the address at a coordinate pair
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GeocodeResponse, GeocodeError> {
        self.geocode(&GeocodeRequest::reverse(latitude, longitude))
            .await
    }
}

/// OpenCage HTTP client implementation
#[derive(Debug, Clone)]
pub struct OpenCageClient {
    client: Client,
    config: OpenCageConfig,
}

impl OpenCageClient {
    /// Create a new OpenCage client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid (e.g. no API key) or
    /// the HTTP client cannot be initialized.
    pub fn new(config: OpenCageConfig) -> Result<Self, GeocodeError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodeError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a client that sends requests through a caller-supplied
    /// `reqwest::Client` (proxies, custom pools, default headers)
    ///
    /// `timeout_secs` and `user_agent` from the configuration are not
    /// applied; the supplied client's own settings win.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_http_client(config: OpenCageConfig, client: Client) -> Result<Self, GeocodeError> {
        config.validate()?;
        Ok(Self { client, config })
    }

    /// Create a client with default settings and the given API key
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client cannot be
    /// initialized.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, GeocodeError> {
        Self::new(OpenCageConfig::with_api_key(api_key))
    }

    /// The active configuration
    pub const fn config(&self) -> &OpenCageConfig {
        &self.config
    }

    /// Parse a success body into a response document
    fn decode_body(body: &str) -> Result<GeocodeResponse, GeocodeError> {
        serde_json::from_str::<Map<String, Value>>(body)
            .map(GeocodeResponse::from_document)
            .map_err(|source| {
                GeocodeError::Decoding(JsonAccessError::Decode {
                    path: "$".to_string(),
                    source,
                })
            })
    }
}

#[async_trait]
impl GeocodingClient for OpenCageClient {
    #[instrument(skip(self, request), fields(query_len = request.query.len()))]
    async fn geocode(&self, request: &GeocodeRequest) -> Result<GeocodeResponse, GeocodeError> {
        let params = request.to_query_pairs()?;
        let api_key = self
            .config
            .api_key_str()
            .ok_or_else(|| GeocodeError::ConfigurationError("API key is required".to_string()))?;

        let url = self.config.endpoint();
        debug!(url = %url, params = params.len(), "Sending geocode request");
        if self.config.verbose {
            info!(params = ?params, "Geocode request parameters");
        }

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[("key", api_key)])
            .query(&params)
            .send()
            .await
            // The URL carries the API key
            .map_err(|e| GeocodeError::RequestFailed(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GeocodeError::RequestFailed(e.without_url().to_string()))?;

        debug!(status, body_len = body.len(), "Received geocode response");
        if self.config.verbose {
            info!(status, body = %body, "Geocode response body");
        }

        if status >= 300 {
            return Err(GeocodeError::from_status(status, body));
        }

        Self::decode_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_client_creation() {
        let client = OpenCageClient::with_api_key("key");
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_requires_api_key() {
        let result = OpenCageClient::new(OpenCageConfig::default());
        assert!(matches!(result, Err(GeocodeError::ConfigurationError(_))));
    }

    #[test]
    fn test_with_http_client() {
        let config = OpenCageConfig::for_testing("http://localhost:1");
        let client = OpenCageClient::with_http_client(config, Client::new()).unwrap();
        assert_eq!(client.config().endpoint(), "http://localhost:1/v1/json");
    }

    #[test]
    fn test_client_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OpenCageClient>();

        let client: Arc<dyn GeocodingClient> =
            Arc::new(OpenCageClient::with_api_key("key").unwrap());
        assert_eq!(Arc::strong_count(&client), 1);
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let client = OpenCageClient::with_api_key("super-secret-key").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret-key"));
    }

    #[test]
    fn test_decode_body() {
        let response = OpenCageClient::decode_body(r#"{"total_results": 0, "results": []}"#)
            .unwrap();
        assert_eq!(response.total_results().unwrap(), 0);
    }

    #[test]
    fn test_decode_body_rejects_non_object() {
        for body in ["[]", "\"text\"", "not json", ""] {
            let err = OpenCageClient::decode_body(body).unwrap_err();
            assert!(
                matches!(err, GeocodeError::Decoding(JsonAccessError::Decode { .. })),
                "body {body:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_validation_runs_before_io() {
        // Nothing listens on port 1; a request attempt would fail with RequestFailed
        let config = OpenCageConfig::for_testing("http://127.0.0.1:1");
        let client = OpenCageClient::new(config).unwrap();

        let err = client
            .geocode(&GeocodeRequest::new("x").limit(0))
            .await
            .unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidLimit(0)));
    }

    #[tokio::test]
    async fn test_transport_error_hides_key() {
        let mut config = OpenCageConfig::for_testing("http://127.0.0.1:1");
        config.api_key = Some("super-secret-key".to_string().into());
        let client = OpenCageClient::new(config).unwrap();

        let err = client
            .geocode(&GeocodeRequest::new("Berlin"))
            .await
            .unwrap_err();
        assert!(matches!(err, GeocodeError::RequestFailed(_)));
        assert!(!err.to_string().contains("super-secret-key"));
    }
}
