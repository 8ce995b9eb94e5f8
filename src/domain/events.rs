//! Webhook events delivered by Conekta.
//!
//! Signature verification is left to the host application; this module only
//! classifies and parses payloads.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Event types the gateway emits for charges and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WebhookEventType {
    ChargeCreated,
    ChargePaid,
    ChargeRefunded,
    ChargebackCreated,
    ChargebackUpdated,
    ChargebackUnderReview,
    ChargebackWon,
    ChargebackLost,
    SubscriptionCreated,
    SubscriptionPaused,
    SubscriptionResumed,
    SubscriptionCanceled,
    SubscriptionUpdated,
    SubscriptionPaid,
    SubscriptionPaymentFailed,
    /// Any other event type.
    Unknown(String),
}

impl WebhookEventType {
    pub fn as_str(&self) -> &str {
        match self {
            WebhookEventType::ChargeCreated => "charge.created",
            WebhookEventType::ChargePaid => "charge.paid",
            WebhookEventType::ChargeRefunded => "charge.refunded",
            WebhookEventType::ChargebackCreated => "charge.chargeback.created",
            WebhookEventType::ChargebackUpdated => "charge.chargeback.updated",
            WebhookEventType::ChargebackUnderReview => "charge.chargeback.under_review",
            WebhookEventType::ChargebackWon => "charge.chargeback.won",
            WebhookEventType::ChargebackLost => "charge.chargeback.lost",
            WebhookEventType::SubscriptionCreated => "subscription.created",
            WebhookEventType::SubscriptionPaused => "subscription.paused",
            WebhookEventType::SubscriptionResumed => "subscription.resumed",
            WebhookEventType::SubscriptionCanceled => "subscription.canceled",
            WebhookEventType::SubscriptionUpdated => "subscription.updated",
            WebhookEventType::SubscriptionPaid => "subscription.paid",
            WebhookEventType::SubscriptionPaymentFailed => "subscription.payment_failed",
            WebhookEventType::Unknown(other) => other,
        }
    }

    pub fn is_charge_event(&self) -> bool {
        self.as_str().starts_with("charge.")
    }

    pub fn is_chargeback_event(&self) -> bool {
        self.as_str().starts_with("charge.chargeback.")
    }

    pub fn is_subscription_event(&self) -> bool {
        self.as_str().starts_with("subscription.")
    }
}

impl From<&str> for WebhookEventType {
    fn from(s: &str) -> Self {
        match s {
            "charge.created" => WebhookEventType::ChargeCreated,
            "charge.paid" => WebhookEventType::ChargePaid,
            "charge.refunded" => WebhookEventType::ChargeRefunded,
            "charge.chargeback.created" => WebhookEventType::ChargebackCreated,
            "charge.chargeback.updated" => WebhookEventType::ChargebackUpdated,
            "charge.chargeback.under_review" => WebhookEventType::ChargebackUnderReview,
            "charge.chargeback.won" => WebhookEventType::ChargebackWon,
            "charge.chargeback.lost" => WebhookEventType::ChargebackLost,
            "subscription.created" => WebhookEventType::SubscriptionCreated,
            "subscription.paused" => WebhookEventType::SubscriptionPaused,
            "subscription.resumed" => WebhookEventType::SubscriptionResumed,
            "subscription.canceled" => WebhookEventType::SubscriptionCanceled,
            "subscription.updated" => WebhookEventType::SubscriptionUpdated,
            "subscription.paid" => WebhookEventType::SubscriptionPaid,
            "subscription.payment_failed" => WebhookEventType::SubscriptionPaymentFailed,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Invalid webhook JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Raw event envelope as delivered.
#[derive(Debug, Deserialize)]
struct RawWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    livemode: bool,
    #[serde(default)]
    data: RawEventData,
}

#[derive(Debug, Default, Deserialize)]
struct RawEventData {
    #[serde(default)]
    object: serde_json::Value,
    #[serde(default)]
    previous_attributes: serde_json::Value,
}

/// Parsed webhook event.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    pub id: String,
    pub event_type: WebhookEventType,
    pub created_at: i64,
    pub livemode: bool,
    /// The charge, order or subscription the event is about.
    pub object: serde_json::Value,
    pub previous_attributes: serde_json::Value,
}

impl WebhookEvent {
    pub fn parse(payload: &[u8]) -> Result<Self, WebhookError> {
        let raw: RawWebhookEvent = serde_json::from_slice(payload)?;
        Ok(Self {
            id: raw.id,
            event_type: WebhookEventType::from(raw.event_type.as_str()),
            created_at: raw.created_at,
            livemode: raw.livemode,
            object: raw.data.object,
            previous_attributes: raw.data.previous_attributes,
        })
    }

    /// ID of the object the event refers to.
    pub fn object_id(&self) -> Option<&str> {
        self.object.get("id").and_then(|v| v.as_str())
    }

    /// Order ID for charge events.
    pub fn order_id(&self) -> Option<&str> {
        self.object.get("order_id").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_roundtrips_known_names() {
        for name in [
            "charge.created",
            "charge.paid",
            "charge.refunded",
            "charge.chargeback.created",
            "charge.chargeback.updated",
            "charge.chargeback.under_review",
            "charge.chargeback.won",
            "charge.chargeback.lost",
            "subscription.created",
            "subscription.paused",
            "subscription.resumed",
            "subscription.canceled",
            "subscription.updated",
            "subscription.paid",
            "subscription.payment_failed",
        ] {
            let event_type = WebhookEventType::from(name);
            assert!(!matches!(event_type, WebhookEventType::Unknown(_)), "{name}");
            assert_eq!(event_type.as_str(), name);
        }
    }

    #[test]
    fn unknown_event_type_keeps_name() {
        let event_type = WebhookEventType::from("order.expired");
        assert_eq!(event_type, WebhookEventType::Unknown("order.expired".to_string()));
        assert_eq!(event_type.to_string(), "order.expired");
    }

    #[test]
    fn event_type_categories() {
        assert!(WebhookEventType::ChargePaid.is_charge_event());
        assert!(!WebhookEventType::ChargePaid.is_chargeback_event());
        assert!(WebhookEventType::ChargebackWon.is_charge_event());
        assert!(WebhookEventType::ChargebackWon.is_chargeback_event());
        assert!(WebhookEventType::SubscriptionPaid.is_subscription_event());
        assert!(!WebhookEventType::SubscriptionPaid.is_charge_event());
    }

    #[test]
    fn parse_charge_paid() {
        let payload = r#"{
            "id": "5f3c0a8b",
            "object": "event",
            "type": "charge.paid",
            "created_at": 1704067200,
            "livemode": false,
            "webhook_status": "pending",
            "data": {
                "object": {
                    "id": "ch_123",
                    "object": "charge",
                    "order_id": "ord_456",
                    "status": "paid",
                    "amount": 2000
                },
                "previous_attributes": {"status": "pending_payment"}
            }
        }"#;

        let event = WebhookEvent::parse(payload.as_bytes()).unwrap();

        assert_eq!(event.id, "5f3c0a8b");
        assert_eq!(event.event_type, WebhookEventType::ChargePaid);
        assert_eq!(event.created_at, 1704067200);
        assert!(!event.livemode);
        assert_eq!(event.object_id(), Some("ch_123"));
        assert_eq!(event.order_id(), Some("ord_456"));
        assert_eq!(event.previous_attributes["status"], "pending_payment");
    }

    #[test]
    fn parse_tolerates_missing_data() {
        let event = WebhookEvent::parse(br#"{"id": "evt", "type": "subscription.paused"}"#).unwrap();
        assert_eq!(event.event_type, WebhookEventType::SubscriptionPaused);
        assert!(event.object_id().is_none());
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let result = WebhookEvent::parse(b"not json");
        assert!(matches!(result, Err(WebhookError::InvalidJson(_))));
    }
}
