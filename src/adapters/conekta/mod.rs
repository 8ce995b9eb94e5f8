//! Conekta payment gateway adapter.
//!
//! Implements the `PaymentGateway` port for Conekta, including:
//! - Customer and payment source management
//! - Subscription lifecycle
//! - Card, OXXO cash and SPEI orders
//!
//! # Configuration
//!
//! Required environment variables:
//! - `CONEKTA_PRIVATE_KEY`: Conekta private API key (key_...)
//! - `CONEKTA_SIGN_KEY`: Signing key issued with the private key

mod api_types;
mod http_gateway;
mod mock_gateway;

pub use api_types::{
    error_from_response, ConektaCharge, ConektaChargeMethod, ConektaCustomer, ConektaErrorBody,
    ConektaErrorDetail, ConektaList, ConektaOrder, ConektaPaymentSource, ConektaSubscription,
};
pub use http_gateway::ConektaHttpGateway;
pub use mock_gateway::{MethodCall, MockPaymentGateway};
