//! Name and address normalization for shipping contacts.
//!
//! Conekta rejects receiver names containing digits or punctuation, and
//! Mexican postal codes must always be five digits. Both rules are applied
//! here before a payload leaves the process.

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

/// Fixed width of a postal code in an order payload.
pub const POSTAL_CODE_LEN: usize = 5;

/// Removes every character that is not an ASCII letter or a space.
///
/// Never fails; an empty result is valid.
pub fn normalize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .collect()
}

/// Left-pads a postal code with `'0'` to [`POSTAL_CODE_LEN`] characters.
///
/// Surrounding whitespace is trimmed first. Codes longer than the fixed
/// width are rejected rather than truncated.
pub fn normalize_postal_code(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() > POSTAL_CODE_LEN {
        return Err(ValidationError::PostalCodeTooLong(trimmed.to_string()));
    }
    Ok(format!("{:0>width$}", trimmed, width = POSTAL_CODE_LEN))
}

/// Shipping address as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl ShippingAddress {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
        }
    }
}

/// Address block of a shipping contact, in gateway field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street1: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

/// Receiver of an order's shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingContact {
    pub receiver: String,
    pub phone: String,
    pub address: Address,
}

impl ShippingContact {
    /// Builds a shipping contact with a normalized receiver and postal code.
    pub fn build(
        receiver: &str,
        phone: &str,
        address: &ShippingAddress,
        country: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            receiver: normalize_name(receiver),
            phone: phone.to_string(),
            address: Address {
                street1: address.street.clone(),
                city: address.city.clone(),
                state: address.state.clone(),
                country: country.to_string(),
                postal_code: normalize_postal_code(&address.postal_code)?,
            },
        })
    }
}
