//! In-memory payment gateway for testing.
//!
//! Provides a configurable implementation of `PaymentGateway` for unit
//! and integration tests. Supports:
//! - A customer "database" with payment sources and subscriptions
//! - Error injection
//! - Call tracking
//! - Recording of submitted order payloads

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{
    Charge, ChargePaymentMethod, CreateCustomerRequest, CreateSubscriptionRequest, Customer,
    CustomerUpdate, Order, OrderRequest, PaymentMethod, PaymentSource, PaymentSourceRequest,
    PaymentSourceUpdate, Subscription, SubscriptionStatus, SubscriptionUpdate,
};
use crate::ports::{GatewayError, PaymentGateway};

/// Mock payment gateway for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentGateway::new();
///
/// // Inject errors
/// mock.set_method_error("create_order", GatewayError::card_declined("Test decline"));
///
/// // Inspect what the facade sent
/// let orders = mock.orders();
/// ```
#[derive(Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Stored customers by ID.
    customers: HashMap<String, Customer>,

    /// Order payloads in submission order.
    orders: Vec<OrderRequest>,

    /// Error to return on next call.
    next_error: Option<GatewayError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, GatewayError>,

    /// Errors for calls of a method that carry a given argument.
    arg_errors: Vec<(String, String, GatewayError)>,

    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a customer to the "database".
    pub fn add_customer(&self, customer: Customer) {
        let id = customer.id.clone();
        self.state().customers.insert(id, customer);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: GatewayError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method; it persists until cleared.
    pub fn set_method_error(&self, method: &str, error: GatewayError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    /// Fail calls to `method` whose arguments include `arg`, e.g. one
    /// payment source id. Persists until cleared.
    pub fn set_arg_error(&self, method: &str, arg: &str, error: GatewayError) {
        self.state()
            .arg_errors
            .push((method.to_string(), arg.to_string(), error));
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
        state.arg_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Inspection
    // ════════════════════════════════════════════════════════════════════════════

    /// Current stored state of a customer.
    pub fn customer(&self, customer_id: &str) -> Option<Customer> {
        self.state().customers.get(customer_id).cloned()
    }

    /// Every order payload received, oldest first.
    pub fn orders(&self) -> Vec<OrderRequest> {
        self.state().orders.clone()
    }

    pub fn last_order(&self) -> Option<OrderRequest> {
        self.state().orders.last().cloned()
    }

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    pub fn clear_calls(&self) {
        self.state().call_log.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str, args: &[String]) -> Result<(), GatewayError> {
        let mut state = self.state();

        // Method-specific errors take precedence
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        if let Some((_, _, error)) = state
            .arg_errors
            .iter()
            .find(|(m, arg, _)| m == method && args.contains(arg))
        {
            return Err(error.clone());
        }

        // Global error is consumed
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }

    /// Records the call, applies injected errors, then runs `f` on the state.
    fn with_state<T>(
        &self,
        method: &str,
        args: Vec<String>,
        f: impl FnOnce(&mut MockState) -> Result<T, GatewayError>,
    ) -> Result<T, GatewayError> {
        self.record_call(method, args.clone());
        self.check_error(method, &args)?;
        f(&mut self.state())
    }
}

impl MockState {
    fn customer_mut(&mut self, customer_id: &str) -> Result<&mut Customer, GatewayError> {
        self.customers
            .get_mut(customer_id)
            .ok_or_else(|| GatewayError::not_found("customer"))
    }
}

impl Clone for MockPaymentGateway {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn mock_id(prefix: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_mock_{}", prefix, &uuid[..12])
}

fn mock_source(customer_id: &str, request: &PaymentSourceRequest) -> PaymentSource {
    PaymentSource {
        id: mock_id("src"),
        customer_id: Some(customer_id.to_string()),
        source_type: request.source_type.clone(),
        last4: Some("4242".to_string()),
        brand: Some("visa".to_string()),
        exp_month: Some("12".to_string()),
        exp_year: Some("30".to_string()),
        default: false,
    }
}

fn mock_charge(order_id: &str, amount: i64, method: &PaymentMethod) -> Charge {
    let payment_method = match method {
        PaymentMethod::Card { .. } => ChargePaymentMethod {
            method_type: "card".to_string(),
            last4: Some("4242".to_string()),
            brand: Some("visa".to_string()),
            ..Default::default()
        },
        PaymentMethod::OxxoCash => ChargePaymentMethod {
            method_type: "oxxo".to_string(),
            reference: Some("93000262276908".to_string()),
            ..Default::default()
        },
        PaymentMethod::Spei => ChargePaymentMethod {
            method_type: "spei".to_string(),
            clabe: Some("646180111812345678".to_string()),
            ..Default::default()
        },
    };

    let status = match method {
        PaymentMethod::Card { .. } => "paid",
        PaymentMethod::OxxoCash | PaymentMethod::Spei => "pending_payment",
    };

    Charge {
        id: format!("{}_charge", order_id),
        amount,
        status: status.to_string(),
        payment_method,
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, GatewayError> {
        self.with_state(
            "create_customer",
            vec![request.name.clone(), request.email.clone()],
            |state| {
                let id = mock_id("cus");
                let mut sources: Vec<PaymentSource> = request
                    .payment_sources
                    .iter()
                    .map(|s| mock_source(&id, s))
                    .collect();
                if let Some(first) = sources.first_mut() {
                    first.default = true;
                }

                let customer = Customer {
                    default_payment_source_id: sources.first().map(|s| s.id.clone()),
                    id,
                    name: request.name,
                    email: Some(request.email),
                    phone: Some(request.phone),
                    payment_sources: sources,
                    subscription: None,
                    created_at: chrono::Utc::now().timestamp(),
                };

                state.customers.insert(customer.id.clone(), customer.clone());
                Ok(customer)
            },
        )
    }

    async fn find_customer(&self, customer_id: &str) -> Result<Customer, GatewayError> {
        self.with_state("find_customer", vec![customer_id.to_string()], |state| {
            Ok(state.customer_mut(customer_id)?.clone())
        })
    }

    async fn update_customer(
        &self,
        customer_id: &str,
        update: CustomerUpdate,
    ) -> Result<Customer, GatewayError> {
        let args = vec![
            customer_id.to_string(),
            update.default_payment_source_id.clone().unwrap_or_default(),
        ];
        self.with_state("update_customer", args, |state| {
            let customer = state.customer_mut(customer_id)?;
            if let Some(source_id) = update.default_payment_source_id {
                if customer.payment_source(&source_id).is_none() {
                    return Err(GatewayError::not_found("payment source"));
                }
                customer.default_payment_source_id = Some(source_id);
            }
            Ok(customer.clone())
        })
    }

    async fn delete_customer(&self, customer_id: &str) -> Result<Customer, GatewayError> {
        self.with_state("delete_customer", vec![customer_id.to_string()], |state| {
            state
                .customers
                .remove(customer_id)
                .ok_or_else(|| GatewayError::not_found("customer"))
        })
    }

    async fn create_payment_source(
        &self,
        customer_id: &str,
        request: PaymentSourceRequest,
    ) -> Result<PaymentSource, GatewayError> {
        let args = vec![customer_id.to_string(), request.token_id.clone()];
        self.with_state("create_payment_source", args, |state| {
            let customer = state.customer_mut(customer_id)?;
            let mut source = mock_source(customer_id, &request);
            if customer.payment_sources.is_empty() {
                source.default = true;
                customer.default_payment_source_id = Some(source.id.clone());
            }
            customer.payment_sources.push(source.clone());
            Ok(source)
        })
    }

    async fn update_payment_source(
        &self,
        customer_id: &str,
        source_id: &str,
        update: PaymentSourceUpdate,
    ) -> Result<PaymentSource, GatewayError> {
        let args = vec![
            customer_id.to_string(),
            source_id.to_string(),
            update.default.to_string(),
        ];
        self.with_state("update_payment_source", args, |state| {
            let customer = state.customer_mut(customer_id)?;
            let source = customer
                .payment_sources
                .iter_mut()
                .find(|s| s.id == source_id)
                .ok_or_else(|| GatewayError::not_found("payment source"))?;
            source.default = update.default;
            let source = source.clone();

            if update.default {
                customer.default_payment_source_id = Some(source.id.clone());
            } else if customer.default_payment_source_id.as_deref() == Some(source_id) {
                customer.default_payment_source_id = None;
            }
            Ok(source)
        })
    }

    async fn delete_payment_source(
        &self,
        customer_id: &str,
        source_id: &str,
    ) -> Result<PaymentSource, GatewayError> {
        let args = vec![customer_id.to_string(), source_id.to_string()];
        self.with_state("delete_payment_source", args, |state| {
            let customer = state.customer_mut(customer_id)?;
            let position = customer
                .payment_sources
                .iter()
                .position(|s| s.id == source_id)
                .ok_or_else(|| GatewayError::not_found("payment source"))?;
            let removed = customer.payment_sources.remove(position);
            if customer.default_payment_source_id.as_deref() == Some(source_id) {
                customer.default_payment_source_id = None;
            }
            Ok(removed)
        })
    }

    async fn create_subscription(
        &self,
        customer_id: &str,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription, GatewayError> {
        let args = vec![customer_id.to_string(), request.plan.clone()];
        self.with_state("create_subscription", args, |state| {
            let customer = state.customer_mut(customer_id)?;
            let now = chrono::Utc::now().timestamp();
            let subscription = Subscription {
                id: mock_id("sub"),
                customer_id: customer_id.to_string(),
                plan_id: request.plan,
                status: SubscriptionStatus::Active,
                card_id: customer.default_payment_source_id.clone(),
                billing_cycle_end: Some(now + 30 * 24 * 60 * 60),
                created_at: now,
            };
            customer.subscription = Some(subscription.clone());
            Ok(subscription)
        })
    }

    async fn update_subscription(
        &self,
        customer_id: &str,
        update: SubscriptionUpdate,
    ) -> Result<Subscription, GatewayError> {
        let args = vec![
            customer_id.to_string(),
            update.plan.clone().unwrap_or_default(),
            update.card.clone().unwrap_or_default(),
        ];
        self.with_state("update_subscription", args, |state| {
            let subscription = state
                .customer_mut(customer_id)?
                .subscription
                .as_mut()
                .ok_or_else(|| GatewayError::not_found("subscription"))?;
            if let Some(plan) = update.plan {
                subscription.plan_id = plan;
            }
            if let Some(card) = update.card {
                subscription.card_id = Some(card);
            }
            Ok(subscription.clone())
        })
    }

    async fn cancel_subscription(&self, customer_id: &str) -> Result<Subscription, GatewayError> {
        self.with_state("cancel_subscription", vec![customer_id.to_string()], |state| {
            let subscription = state
                .customer_mut(customer_id)?
                .subscription
                .as_mut()
                .ok_or_else(|| GatewayError::not_found("subscription"))?;
            subscription.status = SubscriptionStatus::Canceled;
            Ok(subscription.clone())
        })
    }

    async fn create_order(&self, request: OrderRequest) -> Result<Order, GatewayError> {
        let amount = request.total_amount().unwrap_or_default();
        let args = vec![request.currency.clone(), amount.to_string()];
        self.with_state("create_order", args, |state| {
            let id = mock_id("ord");
            let charges: Vec<Charge> = request
                .charges
                .iter()
                .map(|c| mock_charge(&id, amount, &c.payment_method))
                .collect();
            let payment_status = charges.first().map(|c| c.status.clone());

            let order = Order {
                id,
                amount,
                currency: request.currency.clone(),
                payment_status,
                charges,
                created_at: chrono::Utc::now().timestamp(),
            };
            state.orders.push(request);
            Ok(order)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::GatewayErrorCode;

    fn card_customer_request() -> CreateCustomerRequest {
        CreateCustomerRequest::with_card("Ana Lopez", "ana@example.com", "5555555555", "tok_test")
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Basic Operation Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_customer_stores_default_source() {
        let mock = MockPaymentGateway::new();

        let customer = mock.create_customer(card_customer_request()).await.unwrap();

        assert!(customer.id.starts_with("cus_mock_"));
        assert_eq!(customer.payment_sources.len(), 1);
        assert!(customer.payment_sources[0].default);
        assert_eq!(
            customer.default_payment_source_id.as_deref(),
            Some(customer.payment_sources[0].id.as_str())
        );
        assert_eq!(mock.customer(&customer.id), Some(customer));
    }

    #[tokio::test]
    async fn find_customer_not_found() {
        let mock = MockPaymentGateway::new();
        let err = mock.find_customer("cus_nonexistent").await.unwrap_err();
        assert_eq!(err.code, GatewayErrorCode::NotFound);
    }

    #[tokio::test]
    async fn second_source_is_not_default() {
        let mock = MockPaymentGateway::new();
        let customer = mock.create_customer(card_customer_request()).await.unwrap();

        let source = mock
            .create_payment_source(&customer.id, PaymentSourceRequest::card("tok_2"))
            .await
            .unwrap();

        assert!(!source.default);
        assert_eq!(mock.customer(&customer.id).unwrap().payment_sources.len(), 2);
    }

    #[tokio::test]
    async fn default_flag_moves_customer_default_id() {
        let mock = MockPaymentGateway::new();
        let customer = mock.create_customer(card_customer_request()).await.unwrap();
        let first = customer.payment_sources[0].id.clone();
        let second = mock
            .create_payment_source(&customer.id, PaymentSourceRequest::card("tok_2"))
            .await
            .unwrap();

        mock.update_payment_source(&customer.id, &second.id, PaymentSourceUpdate { default: true })
            .await
            .unwrap();
        assert_eq!(
            mock.customer(&customer.id).unwrap().default_payment_source_id,
            Some(second.id.clone())
        );

        // Clearing a source that is not the default leaves the id alone
        mock.update_payment_source(&customer.id, &first, PaymentSourceUpdate { default: false })
            .await
            .unwrap();
        assert_eq!(
            mock.customer(&customer.id).unwrap().default_payment_source_id,
            Some(second.id.clone())
        );

        mock.update_payment_source(&customer.id, &second.id, PaymentSourceUpdate { default: false })
            .await
            .unwrap();
        assert_eq!(mock.customer(&customer.id).unwrap().default_payment_source_id, None);
    }

    #[tokio::test]
    async fn subscription_lifecycle() {
        let mock = MockPaymentGateway::new();
        let customer = mock.create_customer(card_customer_request()).await.unwrap();

        let sub = mock
            .create_subscription(&customer.id, CreateSubscriptionRequest { plan: "gold".into() })
            .await
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.card_id, customer.default_payment_source_id);

        let updated = mock
            .update_subscription(&customer.id, SubscriptionUpdate::plan("platinum"))
            .await
            .unwrap();
        assert_eq!(updated.plan_id, "platinum");

        let canceled = mock.cancel_subscription(&customer.id).await.unwrap();
        assert!(canceled.status.is_canceled());
        assert_eq!(
            mock.customer(&customer.id).unwrap().subscription.unwrap().status,
            SubscriptionStatus::Canceled
        );
    }

    #[tokio::test]
    async fn update_subscription_without_one_is_not_found() {
        let mock = MockPaymentGateway::new();
        let customer = mock.create_customer(card_customer_request()).await.unwrap();

        let err = mock
            .update_subscription(&customer.id, SubscriptionUpdate::card("src_x"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_customer_removes_it() {
        let mock = MockPaymentGateway::new();
        let customer = mock.create_customer(card_customer_request()).await.unwrap();

        let deleted = mock.delete_customer(&customer.id).await.unwrap();
        assert_eq!(deleted.id, customer.id);
        assert!(mock.customer(&customer.id).is_none());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Injection Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn global_error_is_consumed() {
        let mock = MockPaymentGateway::new();
        mock.set_error(GatewayError::network("connection reset"));

        assert!(mock.create_customer(card_customer_request()).await.is_err());
        assert!(mock.create_customer(card_customer_request()).await.is_ok());
    }

    #[tokio::test]
    async fn method_error_persists_until_cleared() {
        let mock = MockPaymentGateway::new();
        mock.set_method_error("find_customer", GatewayError::authentication("bad key"));

        assert!(mock.find_customer("cus_1").await.is_err());
        let err = mock.find_customer("cus_1").await.unwrap_err();
        assert_eq!(err.code, GatewayErrorCode::AuthenticationError);

        mock.clear_errors();
        assert!(mock.find_customer("cus_1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn arg_error_only_hits_matching_calls() {
        let mock = MockPaymentGateway::new();
        let customer = mock.create_customer(card_customer_request()).await.unwrap();
        mock.set_arg_error("find_customer", "cus_broken", GatewayError::network("timeout"));

        let err = mock.find_customer("cus_broken").await.unwrap_err();
        assert_eq!(err.code, GatewayErrorCode::NetworkError);
        assert!(mock.find_customer(&customer.id).await.is_ok());

        mock.clear_errors();
        assert!(mock.find_customer("cus_broken").await.unwrap_err().is_not_found());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn calls_are_recorded_in_order() {
        let mock = MockPaymentGateway::new();
        let customer = mock.create_customer(card_customer_request()).await.unwrap();
        let _ = mock.find_customer(&customer.id).await;

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "create_customer");
        assert_eq!(calls[1].args, vec![customer.id.clone()]);
        assert_eq!(mock.call_count("find_customer"), 1);

        mock.clear_calls();
        assert!(!mock.was_called("create_customer"));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let mock = MockPaymentGateway::new();
        let clone = mock.clone();

        let customer = clone.create_customer(card_customer_request()).await.unwrap();
        assert!(mock.customer(&customer.id).is_some());
    }
}
