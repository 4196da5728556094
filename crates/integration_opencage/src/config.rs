//! OpenCage client configuration

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::GeocodeError;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENCAGE_KEY";

/// Configuration file read by [`OpenCageConfig::load`] when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "opencage.toml";

/// Prefix for environment overrides (e.g. `OPENCAGE__BASE_URL`)
const ENV_PREFIX: &str = "OPENCAGE";

/// Configuration for the OpenCage geocoding client
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenCageConfig {
    /// OpenCage API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// API base URL; `/v1/json` is appended per request
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log outgoing parameters and raw response bodies at info level
    #[serde(default)]
    pub verbose: bool,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl std::fmt::Debug for OpenCageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenCageConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("verbose", &self.verbose)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://api.opencagedata.com/geocode".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("opencage-rs/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for OpenCageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            verbose: false,
            user_agent: default_user_agent(),
        }
    }
}

impl OpenCageConfig {
    /// Create a default configuration with the given API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Default::default()
        }
    }

    /// Create a configuration suitable for testing against a mock server
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from("test-api-key")),
            base_url: base_url.into(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Load configuration from an optional TOML file and the environment
    ///
    /// Without a path, `opencage.toml` in the working directory is read if it
    /// exists. With a path, the file must exist. `OPENCAGE__*` environment
    /// variables override file values (e.g. `OPENCAGE__TIMEOUT_SECS=10`).
    ///
    /// The API key is not resolved here; see [`Self::resolve_api_key`].
    pub fn load(path: Option<&Path>) -> Result<Self, GeocodeError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| GeocodeError::ConfigurationError(e.to_string()))
    }

    /// Read the API key from the `OPENCAGE_KEY` environment variable
    ///
    /// Empty values count as unset.
    pub fn api_key_from_env() -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Settle on one API key
    ///
    /// Precedence is `env_key` (normally [`Self::api_key_from_env`]), then
    /// the key already present in this configuration (from the file), then
    /// `explicit`. Finding none is a configuration error.
    pub fn resolve_api_key(
        &mut self,
        env_key: Option<String>,
        explicit: Option<String>,
    ) -> Result<(), GeocodeError> {
        let file_key = self
            .api_key
            .take()
            .filter(|key| !key.expose_secret().trim().is_empty());

        let resolved = env_key
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from)
            .or(file_key)
            .or_else(|| {
                explicit
                    .filter(|key| !key.trim().is_empty())
                    .map(SecretString::from)
            });

        match resolved {
            Some(key) => {
                self.api_key = Some(key);
                Ok(())
            },
            None => Err(GeocodeError::ConfigurationError(format!(
                "No API key: set {API_KEY_ENV}, add api_key to {DEFAULT_CONFIG_FILE} or pass one explicitly"
            ))),
        }
    }

    /// API key as plain text, if configured
    pub fn api_key_str(&self) -> Option<&str> {
        self.api_key.as_ref().map(|key| key.expose_secret())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GeocodeError> {
        if self.base_url.trim().is_empty() {
            return Err(GeocodeError::ConfigurationError(
                "base_url must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(GeocodeError::ConfigurationError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.api_key_str().is_none_or(|key| key.trim().is_empty()) {
            return Err(GeocodeError::ConfigurationError(format!(
                "API key is required (set {API_KEY_ENV})"
            )));
        }
        Ok(())
    }

    /// Full endpoint URL for JSON geocoding requests
    pub fn endpoint(&self) -> String {
        format!("{}/v1/json", self.base_url.trim_end_matches('/'))
    }
}
