//! Conekta API objects as they arrive over the wire.
//!
//! These types:
//! - Parse actual Conekta JSON (lists wrapped in `{"data": [...]}`)
//! - Map to domain types for the facade
//! - Carry the gateway's error envelope

use serde::Deserialize;

use crate::domain::{
    Charge, ChargePaymentMethod, Customer, Order, PaymentSource, Subscription, SubscriptionStatus,
};
use crate::ports::{GatewayError, GatewayErrorCode};

/// Paginated list wrapper used for nested collections.
#[derive(Debug, Clone, Deserialize)]
pub struct ConektaList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Default for ConektaList<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConektaCustomer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub default_payment_source_id: Option<String>,
    #[serde(default)]
    pub payment_sources: ConektaList<ConektaPaymentSource>,
    pub subscription: Option<ConektaSubscription>,
    #[serde(default)]
    pub created_at: i64,
}

impl From<ConektaCustomer> for Customer {
    fn from(c: ConektaCustomer) -> Self {
        Customer {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            default_payment_source_id: c.default_payment_source_id,
            payment_sources: c.payment_sources.data.into_iter().map(Into::into).collect(),
            subscription: c.subscription.map(Into::into),
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConektaPaymentSource {
    pub id: String,
    #[serde(rename = "type", default = "card_type")]
    pub source_type: String,
    pub parent_id: Option<String>,
    pub last4: Option<String>,
    pub brand: Option<String>,
    pub exp_month: Option<String>,
    pub exp_year: Option<String>,
    #[serde(default)]
    pub default: bool,
}

impl From<ConektaPaymentSource> for PaymentSource {
    fn from(s: ConektaPaymentSource) -> Self {
        PaymentSource {
            id: s.id,
            customer_id: s.parent_id,
            source_type: s.source_type,
            last4: s.last4,
            brand: s.brand,
            exp_month: s.exp_month,
            exp_year: s.exp_year,
            default: s.default,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConektaSubscription {
    pub id: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub status: String,
    pub card_id: Option<String>,
    pub billing_cycle_end: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
}

impl From<ConektaSubscription> for Subscription {
    fn from(s: ConektaSubscription) -> Self {
        let status = SubscriptionStatus::from_gateway(&s.status);
        if status == SubscriptionStatus::Unknown {
            tracing::warn!(
                subscription_id = %s.id,
                status = %s.status,
                "Unknown Conekta subscription status"
            );
        }
        Subscription {
            id: s.id,
            customer_id: s.customer_id,
            plan_id: s.plan_id,
            status,
            card_id: s.card_id,
            billing_cycle_end: s.billing_cycle_end,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConektaOrder {
    pub id: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
    pub payment_status: Option<String>,
    #[serde(default)]
    pub charges: ConektaList<ConektaCharge>,
    #[serde(default)]
    pub created_at: i64,
}

impl From<ConektaOrder> for Order {
    fn from(o: ConektaOrder) -> Self {
        Order {
            id: o.id,
            amount: o.amount,
            currency: o.currency,
            payment_status: o.payment_status,
            charges: o.charges.data.into_iter().map(Into::into).collect(),
            created_at: o.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConektaCharge {
    pub id: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub payment_method: ConektaChargeMethod,
}

impl From<ConektaCharge> for Charge {
    fn from(c: ConektaCharge) -> Self {
        Charge {
            id: c.id,
            amount: c.amount,
            status: c.status,
            payment_method: ChargePaymentMethod {
                method_type: c.payment_method.method_type,
                reference: c.payment_method.reference,
                clabe: c.payment_method.clabe,
                last4: c.payment_method.last4,
                brand: c.payment_method.brand,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConektaChargeMethod {
    #[serde(rename = "type", default)]
    pub method_type: String,
    pub reference: Option<String>,
    pub clabe: Option<String>,
    pub last4: Option<String>,
    pub brand: Option<String>,
}

/// Error envelope: `{"object": "error", "type": "...", "details": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConektaErrorBody {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub details: Vec<ConektaErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConektaErrorDetail {
    pub message: Option<String>,
    pub debug_message: Option<String>,
    pub param: Option<String>,
    pub code: Option<String>,
}

/// Maps a non-success response to a typed gateway error.
///
/// The HTTP status gives the base code; the envelope's `type` refines it.
pub fn error_from_response(status: u16, body: &str) -> GatewayError {
    let envelope = serde_json::from_str::<ConektaErrorBody>(body).ok();

    let mut code = match status {
        400 | 422 => GatewayErrorCode::InvalidRequest,
        401 | 403 => GatewayErrorCode::AuthenticationError,
        402 => GatewayErrorCode::CardDeclined,
        404 => GatewayErrorCode::NotFound,
        429 => GatewayErrorCode::RateLimitExceeded,
        500..=599 => GatewayErrorCode::ProviderError,
        _ => GatewayErrorCode::Unknown,
    };

    let Some(envelope) = envelope else {
        let message = if body.trim().is_empty() {
            format!("Conekta API returned HTTP {}", status)
        } else {
            format!("Conekta API error: {}", body)
        };
        return GatewayError::new(code, message);
    };

    if let Some(refined) = envelope.error_type.as_deref().and_then(code_for_type) {
        code = refined;
    }

    let detail = envelope.details.first();
    let message = detail
        .and_then(|d| d.message.clone().or_else(|| d.debug_message.clone()))
        .unwrap_or_else(|| format!("Conekta API returned HTTP {}", status));

    let mut error = GatewayError::new(code, message);
    if let Some(provider_code) = detail
        .and_then(|d| d.code.clone())
        .or(envelope.error_type)
    {
        error = error.with_provider_code(provider_code);
    }
    error
}

fn code_for_type(error_type: &str) -> Option<GatewayErrorCode> {
    match error_type {
        "authentication_error" => Some(GatewayErrorCode::AuthenticationError),
        "resource_not_found_error" => Some(GatewayErrorCode::NotFound),
        "parameter_validation_error" | "malformed_request_error" => {
            Some(GatewayErrorCode::InvalidRequest)
        }
        "processing_error" => Some(GatewayErrorCode::CardDeclined),
        "api_error" => Some(GatewayErrorCode::ProviderError),
        _ => None,
    }
}

fn card_type() -> String {
    "card".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_parses_nested_lists() {
        let json = r#"{
            "id": "cus_2fkJPFjQKABcmiZWz",
            "object": "customer",
            "livemode": false,
            "name": "Fulanito Perez",
            "email": "fulanito@conekta.com",
            "phone": "+5215555555555",
            "created_at": 1485151007,
            "default_payment_source_id": "src_2fkJPFjQKABcmiZX1",
            "payment_sources": {
                "object": "list",
                "has_more": false,
                "total": 1,
                "data": [{
                    "id": "src_2fkJPFjQKABcmiZX1",
                    "object": "payment_source",
                    "type": "card",
                    "created_at": 1485151007,
                    "last4": "4242",
                    "bin": "424242",
                    "exp_month": "12",
                    "exp_year": "19",
                    "brand": "visa",
                    "name": "Fulanito Perez",
                    "parent_id": "cus_2fkJPFjQKABcmiZWz",
                    "default": true
                }]
            },
            "subscription": {
                "id": "sub_2fkJPFjQKABcmiZX2",
                "object": "subscription",
                "created_at": 1485151007,
                "status": "in_trial",
                "plan_id": "gold-plan",
                "card_id": "src_2fkJPFjQKABcmiZX1",
                "customer_id": "cus_2fkJPFjQKABcmiZWz",
                "billing_cycle_end": 1487829407
            }
        }"#;

        let customer: Customer = serde_json::from_str::<ConektaCustomer>(json).unwrap().into();

        assert_eq!(customer.id, "cus_2fkJPFjQKABcmiZWz");
        assert_eq!(customer.payment_sources.len(), 1);
        assert!(customer.payment_sources[0].default);
        assert_eq!(
            customer.payment_sources[0].customer_id.as_deref(),
            Some("cus_2fkJPFjQKABcmiZWz")
        );
        let subscription = customer.subscription.unwrap();
        assert_eq!(subscription.status, SubscriptionStatus::InTrial);
        assert_eq!(subscription.plan_id, "gold-plan");
    }

    #[test]
    fn customer_without_sources_parses() {
        let customer: ConektaCustomer =
            serde_json::from_str(r#"{"id": "cus_1", "name": "Ana"}"#).unwrap();
        assert!(customer.payment_sources.data.is_empty());
        assert!(customer.subscription.is_none());
    }

    #[test]
    fn order_parses_oxxo_reference() {
        let json = r#"{
            "id": "ord_2fsQdMUmsFNP2WjqS",
            "object": "order",
            "amount": 35000,
            "currency": "MXN",
            "payment_status": "pending_payment",
            "created_at": 1485151007,
            "charges": {
                "object": "list",
                "data": [{
                    "id": "5887a1d1edbb6ea2dc000b02",
                    "amount": 35000,
                    "status": "pending_payment",
                    "payment_method": {
                        "object": "cash_payment",
                        "type": "oxxo",
                        "reference": "93000262276908",
                        "expires_at": 1485388800
                    }
                }]
            }
        }"#;

        let order: Order = serde_json::from_str::<ConektaOrder>(json).unwrap().into();
        assert_eq!(order.amount, 35000);
        assert_eq!(order.charges[0].payment_method.method_type, "oxxo");
        assert_eq!(order.payment_reference(), Some("93000262276908"));
    }

    #[test]
    fn error_maps_processing_error_to_declined() {
        let body = r#"{
            "object": "error",
            "type": "processing_error",
            "log_id": "507f1f77bcf86cd799439011",
            "details": [{
                "debug_message": "The card was declined.",
                "message": "La tarjeta fue declinada.",
                "code": "conekta.errors.processing.charge.card_payment.declined"
            }]
        }"#;

        let err = error_from_response(402, body);
        assert_eq!(err.code, GatewayErrorCode::CardDeclined);
        assert_eq!(err.message, "La tarjeta fue declinada.");
        assert_eq!(
            err.provider_code.as_deref(),
            Some("conekta.errors.processing.charge.card_payment.declined")
        );
        assert!(!err.retryable);
    }

    #[test]
    fn error_type_refines_status() {
        let body = r#"{"object":"error","type":"resource_not_found_error","details":[{"message":"El recurso no ha sido encontrado."}]}"#;
        let err = error_from_response(400, body);
        assert_eq!(err.code, GatewayErrorCode::NotFound);
        assert_eq!(err.provider_code.as_deref(), Some("resource_not_found_error"));
    }

    #[test]
    fn error_falls_back_to_status_for_non_json_body() {
        let err = error_from_response(503, "Service Unavailable");
        assert_eq!(err.code, GatewayErrorCode::ProviderError);
        assert!(err.message.contains("Service Unavailable"));

        let err = error_from_response(429, "");
        assert_eq!(err.code, GatewayErrorCode::RateLimitExceeded);
        assert!(err.retryable);
        assert!(err.message.contains("429"));
    }

    #[test]
    fn error_uses_debug_message_when_message_absent() {
        let body = r#"{"type":"authentication_error","details":[{"debug_message":"Please include your access key"}]}"#;
        let err = error_from_response(401, body);
        assert_eq!(err.code, GatewayErrorCode::AuthenticationError);
        assert_eq!(err.message, "Please include your access key");
    }
}
