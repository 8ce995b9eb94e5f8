//! Conekta Client - Typed facade over the Conekta payment gateway
//!
//! This crate wraps the Conekta REST API for customers, one-off and
//! stored-card orders, OXXO and SPEI payments, subscriptions and payment
//! sources.
//!
//! ```no_run
//! use conekta_client::application::{ConektaClient, OrderDetails};
//! use conekta_client::config::AppConfig;
//! use conekta_client::domain::{LineItem, OrderContact, ShippingAddress};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load_validated()?;
//! conekta_client::telemetry::init_tracing(&config.logging)?;
//!
//! let client = ConektaClient::from_config(&config)?;
//! let order = client
//!     .create_oxxo_order(OrderDetails::new(
//!         OrderContact::new("Ana Lopez", "ana@example.com", "5555555555"),
//!         ShippingAddress::new("Calle 1", "CDMX", "CDMX", "06600"),
//!         LineItem::new("Widget", 1000, 2),
//!     ))
//!     .await?;
//! println!("Pay at OXXO with reference {:?}", order.payment_reference());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
