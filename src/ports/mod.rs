//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the client facade and the outside world. Adapters implement these ports.
//!
//! - `PaymentGateway` - Conekta customer, order, subscription and payment
//!   source resources

mod payment_gateway;

pub use payment_gateway::{GatewayError, GatewayErrorCode, PaymentGateway};
