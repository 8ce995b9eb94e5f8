//! Errors returned by the client facade.

use thiserror::Error;

use crate::domain::ValidationError;
use crate::ports::{GatewayError, GatewayErrorCode};

/// Failure of a facade operation.
///
/// `Validation` errors are raised locally before any request is sent;
/// `Gateway` errors come back from Conekta or the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Gateway(e) if e.is_not_found())
    }

    /// Whether repeating the call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Gateway(e) if e.retryable)
    }

    pub fn gateway_code(&self) -> Option<GatewayErrorCode> {
        match self {
            ClientError::Gateway(e) => Some(e.code),
            ClientError::Validation(_) => None,
        }
    }
}
