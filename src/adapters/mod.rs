//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `conekta` - Conekta REST gateway and its in-memory test double

pub mod conekta;

pub use conekta::{ConektaHttpGateway, MethodCall, MockPaymentGateway};
