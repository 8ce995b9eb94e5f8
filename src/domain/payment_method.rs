//! Payment variants and the gateway payment-method descriptor they map to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

/// Textual tag of a payment variant, as used by host applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Card,
    #[serde(rename = "token_id")]
    Token,
    OxxoCash,
    Spei,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Card => "card",
            PaymentKind::Token => "token_id",
            PaymentKind::OxxoCash => "oxxo_cash",
            PaymentKind::Spei => "spei",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(PaymentKind::Card),
            "token_id" => Ok(PaymentKind::Token),
            "oxxo_cash" => Ok(PaymentKind::OxxoCash),
            "spei" => Ok(PaymentKind::Spei),
            other => Err(ValidationError::InvalidPaymentType(other.to_string())),
        }
    }
}

/// How a single charge is paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentType {
    /// Card already stored on the customer.
    Card { source_id: String },
    /// Card tokenized client-side for this order only.
    Token { token_id: String },
    /// Cash voucher payable at OXXO stores.
    OxxoCash,
    /// SPEI bank transfer.
    Spei,
}

impl PaymentType {
    pub fn card(source_id: impl Into<String>) -> Self {
        PaymentType::Card {
            source_id: source_id.into(),
        }
    }

    pub fn token(token_id: impl Into<String>) -> Self {
        PaymentType::Token {
            token_id: token_id.into(),
        }
    }

    /// Builds a variant from its textual tag and the inputs it needs.
    ///
    /// `source_id` is read for `card`, `token` for `token_id`; the other
    /// inputs are ignored.
    pub fn from_tag(
        tag: &str,
        source_id: Option<&str>,
        token: Option<&str>,
    ) -> Result<Self, ValidationError> {
        match tag.parse::<PaymentKind>()? {
            PaymentKind::Card => source_id
                .map(PaymentType::card)
                .ok_or(ValidationError::missing("payment_source_id")),
            PaymentKind::Token => token
                .map(PaymentType::token)
                .ok_or(ValidationError::missing("token_id")),
            PaymentKind::OxxoCash => Ok(PaymentType::OxxoCash),
            PaymentKind::Spei => Ok(PaymentType::Spei),
        }
    }

    pub fn kind(&self) -> PaymentKind {
        match self {
            PaymentType::Card { .. } => PaymentKind::Card,
            PaymentType::Token { .. } => PaymentKind::Token,
            PaymentType::OxxoCash => PaymentKind::OxxoCash,
            PaymentType::Spei => PaymentKind::Spei,
        }
    }
}

/// Payment method sub-structure of a charge request.
///
/// Serializes as `{"type": "card", "payment_source_id": ...}`,
/// `{"type": "card", "token_id": ...}`, `{"type": "oxxo_cash"}` or
/// `{"type": "spei"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    Card {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payment_source_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_id: Option<String>,
    },
    OxxoCash,
    Spei,
}

/// Maps a payment variant to its gateway descriptor.
///
/// Pure: the same variant always yields the same descriptor. Empty source
/// ids and tokens are rejected.
pub fn resolve_payment_method(payment: &PaymentType) -> Result<PaymentMethod, ValidationError> {
    match payment {
        PaymentType::Card { source_id } => {
            if source_id.trim().is_empty() {
                return Err(ValidationError::missing("payment_source_id"));
            }
            Ok(PaymentMethod::Card {
                payment_source_id: Some(source_id.clone()),
                token_id: None,
            })
        }
        PaymentType::Token { token_id } => {
            if token_id.trim().is_empty() {
                return Err(ValidationError::missing("token_id"));
            }
            Ok(PaymentMethod::Card {
                payment_source_id: None,
                token_id: Some(token_id.clone()),
            })
        }
        PaymentType::OxxoCash => Ok(PaymentMethod::OxxoCash),
        PaymentType::Spei => Ok(PaymentMethod::Spei),
    }
}
