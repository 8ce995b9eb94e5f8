//! Payment gateway port for the Conekta API.
//!
//! Defines the resource operations the client facade needs from the
//! gateway. Implementations perform the actual network calls; the facade
//! only composes them.
//!
//! # Design
//!
//! - **One call per method**: compound flows live in the facade
//! - **Typed failures**: every error carries a [`GatewayErrorCode`]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    CreateCustomerRequest, CreateSubscriptionRequest, Customer, CustomerUpdate, Order,
    OrderRequest, PaymentSource, PaymentSourceRequest, PaymentSourceUpdate, Subscription,
    SubscriptionUpdate,
};

/// Port for the payment gateway.
///
/// Lookups of missing resources fail with [`GatewayErrorCode::NotFound`].
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a customer, including its initial payment sources.
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, GatewayError>;

    /// Fetch a customer with its payment sources and subscription.
    async fn find_customer(&self, customer_id: &str) -> Result<Customer, GatewayError>;

    async fn update_customer(
        &self,
        customer_id: &str,
        update: CustomerUpdate,
    ) -> Result<Customer, GatewayError>;

    /// Delete a customer. Returns the deleted customer.
    async fn delete_customer(&self, customer_id: &str) -> Result<Customer, GatewayError>;

    async fn create_payment_source(
        &self,
        customer_id: &str,
        request: PaymentSourceRequest,
    ) -> Result<PaymentSource, GatewayError>;

    async fn update_payment_source(
        &self,
        customer_id: &str,
        source_id: &str,
        update: PaymentSourceUpdate,
    ) -> Result<PaymentSource, GatewayError>;

    /// Delete a payment source. Returns the deleted source.
    async fn delete_payment_source(
        &self,
        customer_id: &str,
        source_id: &str,
    ) -> Result<PaymentSource, GatewayError>;

    async fn create_subscription(
        &self,
        customer_id: &str,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription, GatewayError>;

    /// Change the plan or billed card of the customer's subscription.
    async fn update_subscription(
        &self,
        customer_id: &str,
        update: SubscriptionUpdate,
    ) -> Result<Subscription, GatewayError>;

    async fn cancel_subscription(&self, customer_id: &str) -> Result<Subscription, GatewayError>;

    async fn create_order(&self, request: OrderRequest) -> Result<Order, GatewayError>;
}

/// Errors from gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayError {
    /// Error code for categorization.
    pub code: GatewayErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Gateway's own error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl GatewayError {
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::AuthenticationError, message)
    }

    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::CardDeclined, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::InvalidRequest, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::ProviderError, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(GatewayErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn is_not_found(&self) -> bool {
        self.code == GatewayErrorCode::NotFound
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

/// Gateway error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorCode {
    /// Network connectivity issue or timeout.
    NetworkError,

    /// API key rejected.
    AuthenticationError,

    /// Card was declined or the charge could not be processed.
    CardDeclined,

    /// Resource not found.
    NotFound,

    /// Gateway rejected request parameters.
    InvalidRequest,

    RateLimitExceeded,

    /// Gateway-side failure or unreadable response.
    ProviderError,

    Unknown,
}

impl GatewayErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayErrorCode::NetworkError | GatewayErrorCode::RateLimitExceeded
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayErrorCode::NetworkError => "network_error",
            GatewayErrorCode::AuthenticationError => "authentication_error",
            GatewayErrorCode::CardDeclined => "card_declined",
            GatewayErrorCode::NotFound => "not_found",
            GatewayErrorCode::InvalidRequest => "invalid_request",
            GatewayErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            GatewayErrorCode::ProviderError => "provider_error",
            GatewayErrorCode::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn gateway_error_retryable() {
        assert!(GatewayError::network("timeout").retryable);
        assert!(GatewayError::new(GatewayErrorCode::RateLimitExceeded, "slow down").retryable);

        assert!(!GatewayError::card_declined("declined").retryable);
        assert!(!GatewayError::not_found("Customer").retryable);
        assert!(!GatewayError::authentication("bad key").retryable);
    }

    #[test]
    fn gateway_error_display() {
        let err = GatewayError::card_declined("La tarjeta fue declinada");
        assert_eq!(err.to_string(), "card_declined: La tarjeta fue declinada");
    }

    #[test]
    fn not_found_names_resource() {
        let err = GatewayError::not_found("Payment source");
        assert!(err.is_not_found());
        assert_eq!(err.message, "Payment source not found");
    }

    #[test]
    fn provider_code_is_attached() {
        let err = GatewayError::invalid_request("bad email")
            .with_provider_code("conekta.errors.parameter_validation.email");
        assert_eq!(
            err.provider_code.as_deref(),
            Some("conekta.errors.parameter_validation.email")
        );
    }
}
