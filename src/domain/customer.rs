//! Customers and their stored payment sources.

use serde::{Deserialize, Serialize};

use super::address::normalize_name;
use super::subscription::Subscription;

/// Customer as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Gateway's customer ID (`cus_...`).
    pub id: String,

    pub name: String,

    pub email: Option<String>,

    pub phone: Option<String>,

    /// ID of the source charged by default.
    pub default_payment_source_id: Option<String>,

    pub payment_sources: Vec<PaymentSource>,

    /// Current subscription, if the customer has one.
    pub subscription: Option<Subscription>,

    /// When the customer was created (gateway timestamp).
    pub created_at: i64,
}

impl Customer {
    /// Finds one of this customer's sources by ID.
    pub fn payment_source(&self, source_id: &str) -> Option<&PaymentSource> {
        self.payment_sources.iter().find(|s| s.id == source_id)
    }

    /// The source currently flagged as default.
    pub fn default_payment_source(&self) -> Option<&PaymentSource> {
        self.payment_sources.iter().find(|s| s.default)
    }
}

/// Stored payment instrument attached to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSource {
    /// Gateway's source ID (`src_...`).
    pub id: String,

    /// Owning customer ID.
    pub customer_id: Option<String>,

    /// Source type, `card` for every source this crate creates.
    pub source_type: String,

    pub last4: Option<String>,

    pub brand: Option<String>,

    pub exp_month: Option<String>,

    pub exp_year: Option<String>,

    pub default: bool,
}

/// Body of `POST /customers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub payment_sources: Vec<PaymentSourceRequest>,
}

impl CreateCustomerRequest {
    /// Customer with a normalized name and one card source from `token`.
    pub fn with_card(full_name: &str, email: &str, phone: &str, token: &str) -> Self {
        Self {
            name: normalize_name(full_name),
            email: email.to_string(),
            phone: phone.to_string(),
            payment_sources: vec![PaymentSourceRequest::card(token)],
        }
    }
}

/// Body of `POST /customers/{id}/payment_sources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSourceRequest {
    #[serde(rename = "type")]
    pub source_type: String,
    pub token_id: String,
}

impl PaymentSourceRequest {
    pub fn card(token_id: impl Into<String>) -> Self {
        Self {
            source_type: "card".to_string(),
            token_id: token_id.into(),
        }
    }
}

/// Body of `PUT /customers/{id}/payment_sources/{source_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSourceUpdate {
    pub default: bool,
}

/// Body of `PUT /customers/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_payment_source_id: Option<String>,
}

impl CustomerUpdate {
    pub fn default_source(source_id: impl Into<String>) -> Self {
        Self {
            default_payment_source_id: Some(source_id.into()),
        }
    }
}
