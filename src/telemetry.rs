//! Tracing subscriber setup.
//!
//! Library code only emits `tracing` events; hosts call [`init_tracing`]
//! once at startup to get them on stdout.

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LoggingConfig, ValidationError};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(#[from] ValidationError),

    #[error("Global tracing subscriber already installed: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `log_level` when set. Output is JSON lines when
/// `json` is enabled, human-readable otherwise.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = select_filter(EnvFilter::try_from_default_env().ok(), config)?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()?;
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    }

    tracing::debug!(json = config.json, "Tracing initialized");
    Ok(())
}

fn select_filter(
    from_env: Option<EnvFilter>,
    config: &LoggingConfig,
) -> Result<EnvFilter, TelemetryError> {
    match from_env {
        Some(filter) => Ok(filter),
        None => Ok(config.env_filter()?),
    }
}
