//! Conekta gateway configuration

use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::{ConfigError, ValidationError};

pub const DEFAULT_API_BASE_URL: &str = "https://api.conekta.io";
pub const DEFAULT_API_VERSION: &str = "2.0.0";

/// Conekta API configuration.
///
/// Replaces process-wide API key/version state: each HTTP gateway owns
/// the configuration it was built with.
#[derive(Clone, Deserialize)]
pub struct ConektaConfig {
    /// Private API key (`key_...`).
    #[serde(default = "empty_secret")]
    pub private_key: SecretString,

    /// Signing key issued alongside the private key.
    #[serde(default = "empty_secret")]
    pub sign_key: SecretString,

    /// Base URL for the Conekta API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// API version sent in the `Accept` header.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Language of gateway error messages.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ConektaConfig {
    /// Create a configuration with default endpoint settings.
    pub fn new(private_key: impl Into<String>, sign_key: impl Into<String>) -> Self {
        Self {
            private_key: SecretString::new(private_key.into()),
            sign_key: SecretString::new(sign_key.into()),
            api_base_url: default_api_base_url(),
            api_version: default_api_version(),
            locale: default_locale(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `CONEKTA_PRIVATE_KEY`
    /// - `CONEKTA_SIGN_KEY`
    /// - `CONEKTA_API_BASE_URL` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let private_key = std::env::var("CONEKTA_PRIVATE_KEY")
            .map_err(|_| ConfigError::MissingEnv("CONEKTA_PRIVATE_KEY"))?;
        let sign_key = std::env::var("CONEKTA_SIGN_KEY")
            .map_err(|_| ConfigError::MissingEnv("CONEKTA_SIGN_KEY"))?;

        let mut config = Self::new(private_key, sign_key);
        if let Ok(url) = std::env::var("CONEKTA_API_BASE_URL") {
            config.api_base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn private_key(&self) -> &str {
        self.private_key.expose_secret()
    }

    pub fn sign_key(&self) -> &str {
        self.sign_key.expose_secret()
    }

    /// Versioned media type, e.g. `application/vnd.conekta-v2.0.0+json`.
    pub fn accept_header(&self) -> String {
        format!("application/vnd.conekta-v{}+json", self.api_version)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check if using a sandbox key
    pub fn is_test_mode(&self) -> bool {
        self.private_key().starts_with("key_test_")
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.private_key().is_empty() {
            return Err(ValidationError::MissingRequired("private_key"));
        }
        if self.sign_key().is_empty() {
            return Err(ValidationError::MissingRequired("sign_key"));
        }
        if !self.private_key().starts_with("key_") {
            return Err(ValidationError::InvalidPrivateKey);
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.api_version.is_empty() || !self.api_version.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(ValidationError::InvalidApiVersion);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ConektaConfig {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

impl fmt::Debug for ConektaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConektaConfig")
            .field("private_key", &"[REDACTED]")
            .field("sign_key", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("locale", &self.locale)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_locale() -> String {
    "es".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
