//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CONEKTA` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use conekta_client::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Conekta API at {}", config.gateway.api_base_url);
//! ```

mod error;
mod gateway;
mod logging;
mod orders;

pub use error::{ConfigError, ValidationError};
pub use gateway::{ConektaConfig, DEFAULT_API_BASE_URL, DEFAULT_API_VERSION};
pub use logging::LoggingConfig;
pub use orders::OrderDefaults;

use serde::Deserialize;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Conekta credentials and endpoint
    #[serde(default)]
    pub gateway: ConektaConfig,

    /// Order defaults (carrier, country, currency)
    #[serde(default)]
    pub orders: OrderDefaults,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CONEKTA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CONEKTA__GATEWAY__PRIVATE_KEY=key_...` -> `gateway.private_key`
    /// - `CONEKTA__ORDERS__CURRENCY=USD` -> `orders.currency`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    /// Missing keys are reported by [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CONEKTA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid,
    /// including a missing `private_key` or `sign_key`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.gateway.validate()?;
        self.orders.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Load and validate in one step; any failure is fatal at startup.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }
}
