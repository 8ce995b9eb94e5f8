//! Order default configuration

use serde::Deserialize;

use crate::domain::{OrderOptions, DEFAULT_COUNTRY, DEFAULT_CURRENCY, DEFAULT_SHIPPING_CARRIER};

use super::error::ValidationError;

/// Shipping and currency defaults applied when a caller gives none.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OrderDefaults {
    /// Shipping amount in cents
    #[serde(default)]
    pub shipping_amount: i64,

    #[serde(default = "default_carrier")]
    pub shipping_carrier: String,

    /// ISO 3166-1 alpha-2 country code
    #[serde(default = "default_country")]
    pub country: String,

    /// ISO 4217 currency code
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl OrderDefaults {
    /// Validate order defaults
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.shipping_amount < 0 {
            return Err(ValidationError::NegativeShippingAmount);
        }
        if self.shipping_carrier.trim().is_empty() {
            return Err(ValidationError::MissingRequired("orders.shipping_carrier"));
        }
        if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCountry(self.country.clone()));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency(self.currency.clone()));
        }
        Ok(())
    }

    pub fn to_options(&self) -> OrderOptions {
        OrderOptions {
            shipping_amount: self.shipping_amount,
            shipping_carrier: self.shipping_carrier.clone(),
            country: self.country.clone(),
            currency: self.currency.clone(),
        }
    }
}

impl Default for OrderDefaults {
    fn default() -> Self {
        Self {
            shipping_amount: 0,
            shipping_carrier: default_carrier(),
            country: default_country(),
            currency: default_currency(),
        }
    }
}

fn default_carrier() -> String {
    DEFAULT_SHIPPING_CARRIER.to_string()
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_order_options() {
        assert_eq!(OrderDefaults::default().to_options(), OrderOptions::default());
    }

    #[test]
    fn default_is_valid() {
        assert!(OrderDefaults::default().validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_codes() {
        let lower_currency = OrderDefaults {
            currency: "mxn".to_string(),
            ..Default::default()
        };
        assert_eq!(
            lower_currency.validate(),
            Err(ValidationError::InvalidCurrency("mxn".to_string()))
        );

        let long_country = OrderDefaults {
            country: "MEX".to_string(),
            ..Default::default()
        };
        assert_eq!(
            long_country.validate(),
            Err(ValidationError::InvalidCountry("MEX".to_string()))
        );
    }

    #[test]
    fn validation_rejects_negative_shipping() {
        let config = OrderDefaults {
            shipping_amount: -1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::NegativeShippingAmount));
    }

    #[test]
    fn validation_rejects_blank_carrier() {
        let config = OrderDefaults {
            shipping_carrier: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
