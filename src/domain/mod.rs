//! Domain layer: gateway request/response types and the pure payload logic.
//!
//! # Module Organization
//!
//! - `address` - Name and postal code normalization, shipping contacts
//! - `payment_method` - Payment variants and their gateway descriptors
//! - `order` - Order payload builder and order responses
//! - `customer` - Customers and payment sources
//! - `subscription` - Subscriptions and their status
//! - `events` - Webhook event catalogue and parsing

mod address;
mod customer;
mod errors;
mod events;
mod order;
mod payment_method;
mod subscription;

pub use address::{
    normalize_name, normalize_postal_code, Address, ShippingAddress, ShippingContact,
    POSTAL_CODE_LEN,
};
pub use customer::{
    CreateCustomerRequest, Customer, CustomerUpdate, PaymentSource, PaymentSourceRequest,
    PaymentSourceUpdate,
};
pub use errors::ValidationError;
pub use events::{WebhookError, WebhookEvent, WebhookEventType};
pub use order::{
    build_order_payload, Charge, ChargePaymentMethod, ChargeRequest, CustomerInfo, LineItem,
    Order, OrderContact, OrderOptions, OrderParams, OrderRequest, ShippingLine,
    DEFAULT_COUNTRY, DEFAULT_CURRENCY, DEFAULT_SHIPPING_CARRIER,
};
pub use payment_method::{resolve_payment_method, PaymentKind, PaymentMethod, PaymentType};
pub use subscription::{
    CreateSubscriptionRequest, Subscription, SubscriptionStatus, SubscriptionUpdate,
};
