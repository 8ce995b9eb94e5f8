//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Environment variable missing: {0}")]
    MissingEnv(&'static str),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid Conekta private key format")]
    InvalidPrivateKey,

    #[error("Invalid Conekta API base URL")]
    InvalidBaseUrl,

    #[error("Invalid Conekta API version")]
    InvalidApiVersion,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Invalid country code: {0}")]
    InvalidCountry(String),

    #[error("Shipping amount cannot be negative")]
    NegativeShippingAmount,

    #[error("Invalid log filter: {0}")]
    InvalidLogLevel(String),
}
