//! Customer subscriptions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Subscription status reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Trial period, not yet billed.
    InTrial,

    Active,

    /// Last charge failed; the gateway keeps retrying.
    PastDue,

    Paused,

    Canceled,

    /// Status value this crate does not know yet.
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::InTrial => "in_trial",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Unknown => "unknown",
        }
    }

    /// Maps a gateway status string; unrecognized values become `Unknown`.
    pub fn from_gateway(status: &str) -> Self {
        match status {
            "in_trial" => SubscriptionStatus::InTrial,
            "active" => SubscriptionStatus::Active,
            "past_due" => SubscriptionStatus::PastDue,
            "paused" => SubscriptionStatus::Paused,
            "canceled" | "cancelled" => SubscriptionStatus::Canceled,
            _ => SubscriptionStatus::Unknown,
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, SubscriptionStatus::Canceled)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subscription as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Gateway's subscription ID (`sub_...`).
    pub id: String,

    pub customer_id: String,

    pub plan_id: String,

    pub status: SubscriptionStatus,

    /// Payment source billed for this subscription.
    pub card_id: Option<String>,

    /// End of the current billing cycle (Unix timestamp).
    pub billing_cycle_end: Option<i64>,

    pub created_at: i64,
}

/// Body of `POST /customers/{id}/subscription`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub plan: String,
}

/// Body of `PUT /customers/{id}/subscription`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
}

impl SubscriptionUpdate {
    pub fn plan(plan: impl Into<String>) -> Self {
        Self {
            plan: Some(plan.into()),
            card: None,
        }
    }

    pub fn card(source_id: impl Into<String>) -> Self {
        Self {
            plan: None,
            card: Some(source_id.into()),
        }
    }
}
