//! Error types for payload construction.

use thiserror::Error;

/// Errors raised while building a gateway request from caller input.
///
/// These never reach the gateway: the request is rejected locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid payment type: {0}")]
    InvalidPaymentType(String),

    #[error("Postal code '{0}' is longer than 5 characters")]
    PostalCodeTooLong(String),

    #[error("Required field missing: {0}")]
    MissingField(&'static str),

    #[error("Quantity of '{0}' must be at least 1")]
    InvalidQuantity(String),

    #[error("Unit price of '{0}' must be positive")]
    InvalidUnitPrice(String),

    #[error("Shipping amount cannot be negative")]
    NegativeShippingAmount,

    #[error("Order total exceeds the representable amount")]
    AmountOverflow,
}

impl ValidationError {
    /// Creates a missing field validation error.
    pub fn missing(field: &'static str) -> Self {
        ValidationError::MissingField(field)
    }
}
