//! Conekta REST adapter.
//!
//! Implements the `PaymentGateway` trait against the Conekta v2 JSON API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ConektaConfig::new(private_key, sign_key);
//! let gateway = ConektaHttpGateway::new(config);
//! ```

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Method, RequestBuilder, Url};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use crate::config::ConektaConfig;
use crate::domain::{
    CreateCustomerRequest, CreateSubscriptionRequest, Customer, CustomerUpdate, Order,
    OrderRequest, PaymentSource, PaymentSourceRequest, PaymentSourceUpdate, Subscription,
    SubscriptionUpdate,
};
use crate::ports::{GatewayError, PaymentGateway};

use super::api_types::{
    error_from_response, ConektaCustomer, ConektaOrder, ConektaPaymentSource, ConektaSubscription,
};

/// Conekta payment gateway adapter.
///
/// Every request carries the configured key, API version and locale; no
/// process-wide state is touched.
pub struct ConektaHttpGateway {
    config: ConektaConfig,
    http_client: reqwest::Client,
}

impl ConektaHttpGateway {
    /// Create a new adapter with the given configuration.
    pub fn new(config: ConektaConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ConektaConfig {
        &self.config
    }

    /// Build a request to `segments` under the base URL. Each segment is
    /// percent-encoded, so ids cannot add path components.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, GatewayError> {
        let mut url = Url::parse(&self.config.api_base_url).map_err(|e| {
            GatewayError::invalid_request(format!(
                "Invalid Conekta base URL '{}': {}",
                self.config.api_base_url, e
            ))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                GatewayError::invalid_request(format!(
                    "Conekta base URL '{}' cannot carry a path",
                    self.config.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(self
            .http_client
            .request(method, url)
            .basic_auth(self.config.private_key.expose_secret(), Option::<&str>::None)
            .header(ACCEPT, self.config.accept_header())
            .header(ACCEPT_LANGUAGE, &self.config.locale)
            .timeout(self.config.request_timeout()))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Conekta request failed to complete");
            GatewayError::network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let error = error_from_response(status.as_u16(), &error_text);
            tracing::warn!(
                operation,
                status = status.as_u16(),
                code = %error.code,
                provider_code = error.provider_code.as_deref().unwrap_or(""),
                "Conekta {} failed",
                operation
            );
            return Err(error);
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Unparseable Conekta response");
            GatewayError::provider(format!("Failed to parse Conekta response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentGateway for ConektaHttpGateway {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, GatewayError> {
        let builder = self.request(Method::POST, &["customers"])?.json(&request);
        let customer: ConektaCustomer = self.send("create_customer", builder).await?;

        tracing::info!(customer_id = %customer.id, "Conekta customer created");
        Ok(customer.into())
    }

    async fn find_customer(&self, customer_id: &str) -> Result<Customer, GatewayError> {
        let path = ["customers", customer_id];
        let builder = self.request(Method::GET, &path)?;
        let customer: ConektaCustomer = self.send("find_customer", builder).await?;
        Ok(customer.into())
    }

    async fn update_customer(
        &self,
        customer_id: &str,
        update: CustomerUpdate,
    ) -> Result<Customer, GatewayError> {
        let path = ["customers", customer_id];
        let builder = self.request(Method::PUT, &path)?.json(&update);
        let customer: ConektaCustomer = self.send("update_customer", builder).await?;
        Ok(customer.into())
    }

    async fn delete_customer(&self, customer_id: &str) -> Result<Customer, GatewayError> {
        let path = ["customers", customer_id];
        let builder = self.request(Method::DELETE, &path)?;
        let customer: ConektaCustomer = self.send("delete_customer", builder).await?;

        tracing::info!(customer_id = %customer.id, "Conekta customer deleted");
        Ok(customer.into())
    }

    async fn create_payment_source(
        &self,
        customer_id: &str,
        request: PaymentSourceRequest,
    ) -> Result<PaymentSource, GatewayError> {
        let path = ["customers", customer_id, "payment_sources"];
        let builder = self.request(Method::POST, &path)?.json(&request);
        let source: ConektaPaymentSource = self.send("create_payment_source", builder).await?;
        Ok(source.into())
    }

    async fn update_payment_source(
        &self,
        customer_id: &str,
        source_id: &str,
        update: PaymentSourceUpdate,
    ) -> Result<PaymentSource, GatewayError> {
        let path = ["customers", customer_id, "payment_sources", source_id];
        let builder = self.request(Method::PUT, &path)?.json(&update);
        let source: ConektaPaymentSource = self.send("update_payment_source", builder).await?;
        Ok(source.into())
    }

    async fn delete_payment_source(
        &self,
        customer_id: &str,
        source_id: &str,
    ) -> Result<PaymentSource, GatewayError> {
        let path = ["customers", customer_id, "payment_sources", source_id];
        let builder = self.request(Method::DELETE, &path)?;
        let source: ConektaPaymentSource = self.send("delete_payment_source", builder).await?;
        Ok(source.into())
    }

    async fn create_subscription(
        &self,
        customer_id: &str,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription, GatewayError> {
        let path = ["customers", customer_id, "subscription"];
        let builder = self.request(Method::POST, &path)?.json(&request);
        let subscription: ConektaSubscription =
            self.send("create_subscription", builder).await?;

        tracing::info!(
            customer_id,
            subscription_id = %subscription.id,
            plan = %subscription.plan_id,
            "Conekta subscription created"
        );
        Ok(subscription.into())
    }

    async fn update_subscription(
        &self,
        customer_id: &str,
        update: SubscriptionUpdate,
    ) -> Result<Subscription, GatewayError> {
        let path = ["customers", customer_id, "subscription"];
        let builder = self.request(Method::PUT, &path)?.json(&update);
        let subscription: ConektaSubscription =
            self.send("update_subscription", builder).await?;
        Ok(subscription.into())
    }

    async fn cancel_subscription(&self, customer_id: &str) -> Result<Subscription, GatewayError> {
        let path = ["customers", customer_id, "subscription", "cancel"];
        let builder = self.request(Method::POST, &path)?;
        let subscription: ConektaSubscription =
            self.send("cancel_subscription", builder).await?;

        tracing::info!(customer_id, "Conekta subscription canceled");
        Ok(subscription.into())
    }

    async fn create_order(&self, request: OrderRequest) -> Result<Order, GatewayError> {
        let builder = self.request(Method::POST, &["orders"])?.json(&request);
        let order: ConektaOrder = self.send("create_order", builder).await?;

        tracing::info!(
            order_id = %order.id,
            amount = order.amount,
            currency = %order.currency,
            "Conekta order created"
        );
        Ok(order.into())
    }
}
