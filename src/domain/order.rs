//! Order request construction and order responses.
//!
//! [`build_order_payload`] is pure: it turns caller parameters into the
//! nested structure `POST /orders` expects and performs no I/O.

use serde::{Deserialize, Serialize};

use super::address::{normalize_name, ShippingAddress, ShippingContact};
use super::errors::ValidationError;
use super::payment_method::{resolve_payment_method, PaymentMethod, PaymentType};

pub const DEFAULT_SHIPPING_CARRIER: &str = "Fedex";
pub const DEFAULT_COUNTRY: &str = "MX";
pub const DEFAULT_CURRENCY: &str = "MXN";

/// Buyer contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl OrderContact {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

/// A product line; `unit_price` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub unit_price: i64,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(name: impl Into<String>, unit_price: i64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// `unit_price * quantity`, or `None` on overflow.
    pub fn total(&self) -> Option<i64> {
        self.unit_price.checked_mul(i64::from(self.quantity))
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity == 0 {
            return Err(ValidationError::InvalidQuantity(self.name.clone()));
        }
        if self.unit_price <= 0 {
            return Err(ValidationError::InvalidUnitPrice(self.name.clone()));
        }
        Ok(())
    }
}

/// Shipping and currency settings applied to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOptions {
    /// Shipping amount in cents.
    pub shipping_amount: i64,
    pub shipping_carrier: String,
    pub country: String,
    pub currency: String,
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self {
            shipping_amount: 0,
            shipping_carrier: DEFAULT_SHIPPING_CARRIER.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// `customer_info` block: either a reference to a stored customer or inline
/// contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerInfo {
    Existing {
        customer_id: String,
    },
    Inline {
        name: String,
        email: String,
        phone: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingLine {
    pub amount: i64,
    pub carrier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRequest {
    pub payment_method: PaymentMethod,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub currency: String,
    pub line_items: Vec<LineItem>,
    pub customer_info: CustomerInfo,
    pub shipping_contact: ShippingContact,
    pub shipping_lines: Vec<ShippingLine>,
    pub charges: Vec<ChargeRequest>,
}

impl OrderRequest {
    /// Sum of line items plus shipping, in cents. `None` on overflow.
    pub fn total_amount(&self) -> Option<i64> {
        let items = self
            .line_items
            .iter()
            .try_fold(0i64, |acc, item| acc.checked_add(item.total()?))?;
        self.shipping_lines
            .iter()
            .try_fold(items, |acc, line| acc.checked_add(line.amount))
    }
}

/// Everything needed to build one order.
#[derive(Debug, Clone)]
pub struct OrderParams {
    pub payment: PaymentType,
    pub contact: OrderContact,
    pub address: ShippingAddress,
    pub line_items: Vec<LineItem>,
    pub options: OrderOptions,
    /// When set, `customer_info` references the stored customer instead of
    /// carrying the inline contact.
    pub customer_id: Option<String>,
}

/// Builds the order payload.
///
/// Produces one shipping line and one charge. Fails on an empty line item
/// list, a zero quantity or non-positive unit price, a negative shipping
/// amount, a total that overflows, an empty stored-card source or token,
/// or an oversized postal code.
pub fn build_order_payload(params: &OrderParams) -> Result<OrderRequest, ValidationError> {
    if params.line_items.is_empty() {
        return Err(ValidationError::missing("line_items"));
    }
    for item in &params.line_items {
        item.validate()?;
    }
    if params.options.shipping_amount < 0 {
        return Err(ValidationError::NegativeShippingAmount);
    }

    let payment_method = resolve_payment_method(&params.payment)?;

    let customer_info = match params.customer_id.as_deref() {
        Some(customer_id) if !customer_id.is_empty() => CustomerInfo::Existing {
            customer_id: customer_id.to_string(),
        },
        _ => CustomerInfo::Inline {
            name: normalize_name(&params.contact.name),
            email: params.contact.email.clone(),
            phone: params.contact.phone.clone(),
        },
    };

    let shipping_contact = ShippingContact::build(
        &params.contact.name,
        &params.contact.phone,
        &params.address,
        &params.options.country,
    )?;

    let request = OrderRequest {
        currency: params.options.currency.clone(),
        line_items: params.line_items.clone(),
        customer_info,
        shipping_contact,
        shipping_lines: vec![ShippingLine {
            amount: params.options.shipping_amount,
            carrier: params.options.shipping_carrier.clone(),
        }],
        charges: vec![ChargeRequest { payment_method }],
    };
    if request.total_amount().is_none() {
        return Err(ValidationError::AmountOverflow);
    }
    Ok(request)
}

/// Order as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub payment_status: Option<String>,
    pub charges: Vec<Charge>,
    pub created_at: i64,
}

impl Order {
    /// OXXO reference or SPEI CLABE the buyer needs to complete payment.
    pub fn payment_reference(&self) -> Option<&str> {
        self.charges.iter().find_map(|c| {
            c.payment_method
                .reference
                .as_deref()
                .or(c.payment_method.clabe.as_deref())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    pub id: String,
    pub amount: i64,
    pub status: String,
    pub payment_method: ChargePaymentMethod,
}

/// Payment method details echoed back on a charge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargePaymentMethod {
    pub method_type: String,
    /// OXXO payment reference.
    pub reference: Option<String>,
    /// SPEI destination account.
    pub clabe: Option<String>,
    pub last4: Option<String>,
    pub brand: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(payment: PaymentType, customer_id: Option<&str>) -> OrderParams {
        OrderParams {
            payment,
            contact: OrderContact::new("Jo3hn_ Doe!", "john@example.com", "5512345678"),
            address: ShippingAddress::new("Calle 1", "Monterrey", "NL", "123"),
            line_items: vec![LineItem::new("Widget", 1000, 2)],
            options: OrderOptions::default(),
            customer_id: customer_id.map(str::to_string),
        }
    }

    #[test]
    fn one_time_token_order_matches_gateway_shape() {
        let payload = build_order_payload(&params(PaymentType::token("tok_test"), None)).unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value["line_items"][0],
            json!({"name": "Widget", "unit_price": 1000, "quantity": 2})
        );
        assert_eq!(value["shipping_contact"]["address"]["postal_code"], "00123");
        assert_eq!(
            value["charges"][0]["payment_method"],
            json!({"type": "card", "token_id": "tok_test"})
        );
        assert_eq!(value["currency"], "MXN");
        assert_eq!(value["shipping_lines"][0], json!({"amount": 0, "carrier": "Fedex"}));
        assert_eq!(value["shipping_contact"]["address"]["country"], "MX");
    }

    #[test]
    fn customer_id_replaces_inline_contact() {
        let payload =
            build_order_payload(&params(PaymentType::card("src_1"), Some("cus_1"))).unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["customer_info"], json!({"customer_id": "cus_1"}));
        assert!(value["customer_info"].get("name").is_none());
        assert!(value["customer_info"].get("email").is_none());
        assert!(value["customer_info"].get("phone").is_none());
    }

    #[test]
    fn inline_contact_is_normalized() {
        let payload = build_order_payload(&params(PaymentType::OxxoCash, None)).unwrap();

        assert_eq!(
            payload.customer_info,
            CustomerInfo::Inline {
                name: "John Doe".to_string(),
                email: "john@example.com".to_string(),
                phone: "5512345678".to_string(),
            }
        );
        assert_eq!(payload.shipping_contact.receiver, "John Doe");
    }

    #[test]
    fn empty_customer_id_falls_back_to_inline_contact() {
        let payload = build_order_payload(&params(PaymentType::Spei, Some(""))).unwrap();
        assert!(matches!(payload.customer_info, CustomerInfo::Inline { .. }));
    }

    #[test]
    fn produces_single_shipping_line_and_charge() {
        let payload = build_order_payload(&params(PaymentType::Spei, None)).unwrap();
        assert_eq!(payload.shipping_lines.len(), 1);
        assert_eq!(payload.charges.len(), 1);
        assert_eq!(payload.charges[0].payment_method, PaymentMethod::Spei);
    }

    #[test]
    fn accepts_several_line_items() {
        let mut p = params(PaymentType::OxxoCash, None);
        p.line_items.push(LineItem::new("Gadget", 250, 4));
        p.options.shipping_amount = 500;

        let payload = build_order_payload(&p).unwrap();
        assert_eq!(payload.line_items.len(), 2);
        assert_eq!(payload.total_amount(), Some(2000 + 1000 + 500));
    }

    #[test]
    fn rejects_zero_quantity() {
        let mut p = params(PaymentType::OxxoCash, None);
        p.line_items = vec![LineItem::new("Widget", 1000, 0)];
        assert_eq!(
            build_order_payload(&p),
            Err(ValidationError::InvalidQuantity("Widget".to_string()))
        );
    }

    #[test]
    fn rejects_non_positive_unit_price() {
        let mut p = params(PaymentType::OxxoCash, None);
        p.line_items = vec![LineItem::new("Widget", -500, 1)];
        assert_eq!(
            build_order_payload(&p),
            Err(ValidationError::InvalidUnitPrice("Widget".to_string()))
        );

        p.line_items = vec![LineItem::new("Freebie", 0, 1)];
        assert_eq!(
            build_order_payload(&p),
            Err(ValidationError::InvalidUnitPrice("Freebie".to_string()))
        );
    }

    #[test]
    fn rejects_negative_shipping_amount() {
        let mut p = params(PaymentType::OxxoCash, None);
        p.options.shipping_amount = -1;
        assert_eq!(
            build_order_payload(&p),
            Err(ValidationError::NegativeShippingAmount)
        );
    }

    #[test]
    fn rejects_line_total_overflow() {
        let mut p = params(PaymentType::OxxoCash, None);
        p.line_items = vec![LineItem::new("Widget", i64::MAX / 2 + 1, 2)];
        assert_eq!(build_order_payload(&p), Err(ValidationError::AmountOverflow));
    }

    #[test]
    fn rejects_order_sum_overflow() {
        let mut p = params(PaymentType::OxxoCash, None);
        p.line_items = vec![
            LineItem::new("Widget", i64::MAX - 10, 1),
            LineItem::new("Gadget", 100, 1),
        ];
        assert_eq!(build_order_payload(&p), Err(ValidationError::AmountOverflow));

        p.line_items = vec![LineItem::new("Widget", i64::MAX - 10, 1)];
        p.options.shipping_amount = 100;
        assert_eq!(build_order_payload(&p), Err(ValidationError::AmountOverflow));
    }

    #[test]
    fn line_item_total_is_checked() {
        assert_eq!(LineItem::new("Widget", 1000, 3).total(), Some(3000));
        assert_eq!(LineItem::new("Widget", i64::MAX, 2).total(), None);
    }

    #[test]
    fn rejects_empty_line_items() {
        let mut p = params(PaymentType::OxxoCash, None);
        p.line_items.clear();
        assert_eq!(
            build_order_payload(&p),
            Err(ValidationError::MissingField("line_items"))
        );
    }

    #[test]
    fn rejects_oversized_postal_code() {
        let mut p = params(PaymentType::OxxoCash, None);
        p.address.postal_code = "1234567".to_string();
        assert!(matches!(
            build_order_payload(&p),
            Err(ValidationError::PostalCodeTooLong(_))
        ));
    }

    #[test]
    fn custom_options_flow_into_payload() {
        let mut p = params(PaymentType::OxxoCash, None);
        p.options = OrderOptions {
            shipping_amount: 9900,
            shipping_carrier: "DHL".to_string(),
            country: "US".to_string(),
            currency: "USD".to_string(),
        };

        let payload = build_order_payload(&p).unwrap();
        assert_eq!(payload.currency, "USD");
        assert_eq!(payload.shipping_contact.address.country, "US");
        assert_eq!(payload.shipping_lines[0].carrier, "DHL");
        assert_eq!(payload.shipping_lines[0].amount, 9900);
    }

    #[test]
    fn payment_reference_prefers_oxxo_reference_then_clabe() {
        let mut order = Order {
            id: "ord_1".to_string(),
            amount: 1000,
            currency: "MXN".to_string(),
            payment_status: Some("pending_payment".to_string()),
            charges: vec![Charge {
                id: "ch_1".to_string(),
                amount: 1000,
                status: "pending_payment".to_string(),
                payment_method: ChargePaymentMethod {
                    method_type: "spei".to_string(),
                    clabe: Some("646180111812345678".to_string()),
                    ..Default::default()
                },
            }],
            created_at: 0,
        };
        assert_eq!(order.payment_reference(), Some("646180111812345678"));

        order.charges[0].payment_method.reference = Some("98000012345678".to_string());
        assert_eq!(order.payment_reference(), Some("98000012345678"));
    }
}
