//! Shipping method types and the default shipping catalog.

use serde::{Deserialize, Serialize};

use crate::cart::PricingPolicy;
use crate::ids::ShippingMethodId;
use crate::money::Money;

/// A shipping method option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    /// Unique identifier.
    pub id: ShippingMethodId,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Listed price.
    pub price: Money,
    /// Delivery estimate shown to the shopper, e.g. "24-48 h".
    #[serde(default)]
    pub eta_label: String,
    /// Whether the method can be selected.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl ShippingMethod {
    /// Create a new, enabled shipping method.
    pub fn new(id: impl Into<ShippingMethodId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            eta_label: String::new(),
            enabled: true,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the delivery estimate.
    pub fn with_eta(mut self, eta: impl Into<String>) -> Self {
        self.eta_label = eta.into();
        self
    }

    /// Mark the method as not selectable.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Price the pricing engine will charge for this method on `subtotal`.
    pub fn effective_price(&self, subtotal: Money, policy: &PricingPolicy) -> Money {
        policy.shipping_cost(subtotal, self)
    }

    /// Check if the listed price is zero.
    pub fn is_free(&self) -> bool {
        self.price.is_zero()
    }
}

/// The storefront's built-in shipping methods.
pub fn standard_shipping_methods() -> Vec<ShippingMethod> {
    vec![
        ShippingMethod::new("estandar", "Envío estándar", Money::from_cents(495))
            .with_description("Tracked parcel delivery")
            .with_eta("3-5 business days"),
        ShippingMethod::new("express", "Envío express", Money::from_cents(995))
            .with_description("Priority courier delivery")
            .with_eta("24-48 h"),
        ShippingMethod::new("gratis", "Envío gratis", Money::from_cents(495))
            .with_description("Free on orders from 100")
            .with_eta("5-7 business days"),
        ShippingMethod::new("recogida", "Recogida en tienda", Money::zero())
            .with_description("Collect from the workshop")
            .with_eta("Same day")
            .disabled(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(id: &str) -> ShippingMethod {
        standard_shipping_methods()
            .into_iter()
            .find(|m| m.id.as_str() == id)
            .unwrap()
    }

    #[test]
    fn test_catalog_shape() {
        let methods = standard_shipping_methods();
        assert_eq!(methods.len(), 4);
        assert_eq!(find("express").price, Money::from_cents(995));
        assert_eq!(find("express").eta_label, "24-48 h");
        assert!(!find("recogida").enabled);
        assert!(find("recogida").is_free());
    }

    #[test]
    fn test_free_method_has_listed_price() {
        assert!(!find("gratis").is_free());
    }

    #[test]
    fn test_effective_price() {
        let policy = PricingPolicy::default();
        let gratis = find("gratis");
        assert_eq!(gratis.effective_price(Money::from_cents(9999), &policy), gratis.price);
        assert_eq!(gratis.effective_price(Money::from_cents(10000), &policy), Money::zero());
        let express = find("express");
        assert_eq!(express.effective_price(Money::from_cents(50000), &policy), express.price);
    }

    #[test]
    fn test_enabled_defaults_true_when_omitted() {
        let method: ShippingMethod =
            serde_json::from_str(r#"{"id":"moto","name":"Moto courier","price":"12.50"}"#).unwrap();
        assert!(method.enabled);
        assert_eq!(method.price, Money::from_cents(1250));
    }
}
