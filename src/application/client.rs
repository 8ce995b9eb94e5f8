//! ConektaClient - Facade over the payment gateway.
//!
//! Each public operation validates and normalizes caller input, builds the
//! gateway request, and maps failures into [`ClientError`].

use std::sync::Arc;

use crate::adapters::ConektaHttpGateway;
use crate::config::{AppConfig, ConfigError};
use crate::domain::{
    build_order_payload, CreateCustomerRequest, CreateSubscriptionRequest, Customer,
    CustomerUpdate, LineItem, Order, OrderContact, OrderOptions, OrderParams, PaymentSource,
    PaymentSourceRequest, PaymentSourceUpdate, PaymentType, ShippingAddress, Subscription,
    SubscriptionStatus, SubscriptionUpdate,
};
use crate::ports::{GatewayError, PaymentGateway};

use super::error::ClientError;

/// Buyer, destination and the single product of an order.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub contact: OrderContact,
    pub address: ShippingAddress,
    pub item: LineItem,
    /// Overrides the client's order defaults when set.
    pub options: Option<OrderOptions>,
}

impl OrderDetails {
    pub fn new(contact: OrderContact, address: ShippingAddress, item: LineItem) -> Self {
        Self {
            contact,
            address,
            item,
            options: None,
        }
    }

    pub fn with_options(mut self, options: OrderOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Client facade for Conekta customers, orders, subscriptions and
/// payment sources.
///
/// Cheap to clone; clones share the same gateway.
#[derive(Clone)]
pub struct ConektaClient {
    gateway: Arc<dyn PaymentGateway>,
    defaults: OrderOptions,
}

impl ConektaClient {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            gateway,
            defaults: OrderOptions::default(),
        }
    }

    /// Replace the shipping/country/currency defaults used by order operations.
    pub fn with_order_defaults(mut self, defaults: OrderOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Build a client backed by the Conekta HTTP gateway.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if the configuration is
    /// incomplete, e.g. a missing `private_key` or `sign_key`.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let gateway = ConektaHttpGateway::new(config.gateway.clone());
        tracing::debug!(
            api_base_url = %config.gateway.api_base_url,
            test_mode = config.gateway.is_test_mode(),
            "Conekta client configured"
        );

        Ok(Self::new(Arc::new(gateway)).with_order_defaults(config.orders.to_options()))
    }

    pub fn order_defaults(&self) -> &OrderOptions {
        &self.defaults
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Customers
    // ════════════════════════════════════════════════════════════════════════════

    /// Create a customer with one card source from `token`.
    ///
    /// The name is reduced to ASCII letters and spaces before it is sent.
    pub async fn create_customer(
        &self,
        full_name: &str,
        email: &str,
        phone: &str,
        token: &str,
    ) -> Result<Customer, ClientError> {
        let request = CreateCustomerRequest::with_card(full_name, email, phone, token);
        self.gateway
            .create_customer(request)
            .await
            .map_err(|e| failed("create_customer", e))
    }

    pub async fn get_customer(&self, customer_id: &str) -> Result<Customer, ClientError> {
        self.gateway
            .find_customer(customer_id)
            .await
            .map_err(|e| failed("get_customer", e))
    }

    /// Delete a customer, returning its last known state.
    pub async fn delete_customer(&self, customer_id: &str) -> Result<Customer, ClientError> {
        self.gateway
            .delete_customer(customer_id)
            .await
            .map_err(|e| failed("delete_customer", e))
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Orders
    // ════════════════════════════════════════════════════════════════════════════

    /// Charge a stored card of an existing customer.
    pub async fn create_customer_order(
        &self,
        customer_id: &str,
        source_id: &str,
        details: OrderDetails,
    ) -> Result<Order, ClientError> {
        self.place_order(
            "create_customer_order",
            PaymentType::card(source_id),
            Some(customer_id.to_string()),
            details,
        )
        .await
    }

    /// Charge a single-use card token with inline buyer details.
    pub async fn create_one_time_order(
        &self,
        token: &str,
        details: OrderDetails,
    ) -> Result<Order, ClientError> {
        self.place_order(
            "create_one_time_order",
            PaymentType::token(token),
            None,
            details,
        )
        .await
    }

    /// Create an order paid in cash at OXXO; the charge carries the reference.
    pub async fn create_oxxo_order(&self, details: OrderDetails) -> Result<Order, ClientError> {
        self.place_order("create_oxxo_order", PaymentType::OxxoCash, None, details)
            .await
    }

    /// Create an order paid by SPEI transfer; the charge carries the CLABE.
    pub async fn create_spei_order(&self, details: OrderDetails) -> Result<Order, ClientError> {
        self.place_order("create_spei_order", PaymentType::Spei, None, details)
            .await
    }

    async fn place_order(
        &self,
        operation: &'static str,
        payment: PaymentType,
        customer_id: Option<String>,
        details: OrderDetails,
    ) -> Result<Order, ClientError> {
        let params = OrderParams {
            payment,
            contact: details.contact,
            address: details.address,
            line_items: vec![details.item],
            options: details.options.unwrap_or_else(|| self.defaults.clone()),
            customer_id,
        };

        let payload = build_order_payload(&params).map_err(|e| failed(operation, e))?;
        tracing::debug!(
            operation,
            payment = %params.payment.kind(),
            amount = payload.total_amount().unwrap_or_default(),
            currency = %payload.currency,
            "Submitting order"
        );

        self.gateway
            .create_order(payload)
            .await
            .map_err(|e| failed(operation, e))
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Subscriptions
    // ════════════════════════════════════════════════════════════════════════════

    pub async fn create_subscription(
        &self,
        customer_id: &str,
        plan: &str,
    ) -> Result<Subscription, ClientError> {
        let request = CreateSubscriptionRequest {
            plan: plan.to_string(),
        };
        self.gateway
            .create_subscription(customer_id, request)
            .await
            .map_err(|e| failed("create_subscription", e))
    }

    /// Move the customer's subscription to another plan.
    pub async fn update_subscription(
        &self,
        customer_id: &str,
        plan: &str,
    ) -> Result<Subscription, ClientError> {
        self.gateway
            .update_subscription(customer_id, SubscriptionUpdate::plan(plan))
            .await
            .map_err(|e| failed("update_subscription", e))
    }

    pub async fn cancel_subscription(&self, customer_id: &str) -> Result<Subscription, ClientError> {
        self.gateway
            .cancel_subscription(customer_id)
            .await
            .map_err(|e| failed("cancel_subscription", e))
    }

    /// The subscription embedded in the customer record.
    ///
    /// Fails with a not-found error when the customer has none.
    pub async fn get_customer_subscription(
        &self,
        customer_id: &str,
    ) -> Result<Subscription, ClientError> {
        let customer = self.get_customer(customer_id).await?;
        customer
            .subscription
            .ok_or_else(|| failed("get_customer_subscription", GatewayError::not_found("subscription")))
    }

    /// Add a card from `token`, make it the customer's default source and,
    /// unless the subscription is canceled, bill the subscription to it.
    ///
    /// Returns the new payment source.
    pub async fn update_subscription_card(
        &self,
        customer_id: &str,
        status: SubscriptionStatus,
        token: &str,
    ) -> Result<PaymentSource, ClientError> {
        let operation = "update_subscription_card";

        let card = self
            .gateway
            .create_payment_source(customer_id, PaymentSourceRequest::card(token))
            .await
            .map_err(|e| failed(operation, e))?;

        self.gateway
            .update_customer(customer_id, CustomerUpdate::default_source(&card.id))
            .await
            .map_err(|e| failed(operation, e))?;

        if status.is_canceled() {
            tracing::debug!(customer_id, "Subscription canceled; card not attached");
        } else {
            self.gateway
                .update_subscription(customer_id, SubscriptionUpdate::card(&card.id))
                .await
                .map_err(|e| failed(operation, e))?;
        }

        tracing::info!(customer_id, source_id = %card.id, "Subscription card updated");
        Ok(card)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Payment Sources
    // ════════════════════════════════════════════════════════════════════════════

    /// Attach a card from `token` to the customer.
    pub async fn add_payment_source(
        &self,
        customer_id: &str,
        token: &str,
    ) -> Result<PaymentSource, ClientError> {
        self.gateway
            .create_payment_source(customer_id, PaymentSourceRequest::card(token))
            .await
            .map_err(|e| failed("add_payment_source", e))
    }

    /// Delete a source by id and return the refreshed customer.
    pub async fn remove_payment_source(
        &self,
        customer_id: &str,
        source_id: &str,
    ) -> Result<Customer, ClientError> {
        self.gateway
            .delete_payment_source(customer_id, source_id)
            .await
            .map_err(|e| failed("remove_payment_source", e))?;

        self.get_customer(customer_id).await
    }

    /// Delete the customer's source matching `source_id` and return it.
    pub async fn delete_payment_source(
        &self,
        customer_id: &str,
        source_id: &str,
    ) -> Result<PaymentSource, ClientError> {
        let customer = self.get_customer(customer_id).await?;
        if customer.payment_source(source_id).is_none() {
            return Err(failed(
                "delete_payment_source",
                GatewayError::not_found("payment source"),
            ));
        }

        self.gateway
            .delete_payment_source(customer_id, source_id)
            .await
            .map_err(|e| failed("delete_payment_source", e))
    }

    /// Make `source_id` the only default source of the customer.
    ///
    /// Nothing is modified when the customer has no such source.
    pub async fn update_default_card(
        &self,
        customer_id: &str,
        source_id: &str,
    ) -> Result<PaymentSource, ClientError> {
        let operation = "update_default_card";

        let customer = self.get_customer(customer_id).await?;
        if customer.payment_source(source_id).is_none() {
            return Err(failed(operation, GatewayError::not_found("payment source")));
        }

        // Target is promoted only after every other source is cleared
        for source in customer.payment_sources.iter().filter(|s| s.id != source_id) {
            self.gateway
                .update_payment_source(customer_id, &source.id, PaymentSourceUpdate { default: false })
                .await
                .map_err(|e| failed(operation, e))?;
        }

        let target = self
            .gateway
            .update_payment_source(customer_id, source_id, PaymentSourceUpdate { default: true })
            .await
            .map_err(|e| failed(operation, e))?;

        tracing::info!(customer_id, source_id, "Default card updated");
        Ok(target)
    }
}

/// Log a failed operation and convert the cause into a `ClientError`.
fn failed(operation: &'static str, cause: impl Into<ClientError>) -> ClientError {
    let error = cause.into();
    match &error {
        ClientError::Validation(e) => {
            tracing::warn!(operation, error = %e, "Rejected invalid request");
        }
        ClientError::Gateway(e) if e.retryable => {
            tracing::error!(operation, code = %e.code, error = %e.message, "Conekta unavailable");
        }
        ClientError::Gateway(e) => {
            tracing::warn!(operation, code = %e.code, error = %e.message, "Conekta rejected request");
        }
    }
    error
}
