//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use velo_commerce::cart::{CartSettings, PricingPolicy};
use velo_commerce::catalog::{Product, ProductKind};
use velo_commerce::checkout::{
    standard_payment_methods, standard_shipping_methods, CheckoutSettings, PaymentMethod,
    ShippingMethod,
};
use velo_commerce::Money;

/// Config file names searched for, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["velo.toml", ".velo.toml", "velo.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Local storage.
    #[serde(default)]
    pub store: StoreConfig,

    /// Cart persistence.
    #[serde(default)]
    pub cart: CartSettings,

    /// Tax and free-shipping rules.
    #[serde(default)]
    pub pricing: PricingPolicy,

    /// Checkout behaviour.
    #[serde(default)]
    pub checkout: CheckoutSettings,

    /// Replacement shipping catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_methods: Option<Vec<ShippingMethod>>,

    /// Replacement payment catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_methods: Option<Vec<PaymentMethod>>,

    /// Replacement product catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Shipping methods in effect.
    pub fn shipping_methods(&self) -> Vec<ShippingMethod> {
        self.shipping_methods
            .clone()
            .unwrap_or_else(standard_shipping_methods)
    }

    /// Payment methods in effect.
    pub fn payment_methods(&self) -> Vec<PaymentMethod> {
        self.payment_methods
            .clone()
            .unwrap_or_else(standard_payment_methods)
    }

    /// Products in effect.
    pub fn products(&self) -> Vec<Product> {
        self.products.clone().unwrap_or_else(default_products)
    }

    /// The config with every catalog spelled out.
    pub fn resolved(&self) -> Self {
        Self {
            shipping_methods: Some(self.shipping_methods()),
            payment_methods: Some(self.payment_methods()),
            products: Some(self.products()),
            ..self.clone()
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Local storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the persisted cart, relative to the working directory.
    #[serde(default = "default_store_dir")]
    pub dir: String,
}

fn default_store_dir() -> String {
    ".velo".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

/// Demo catalog used when the config does not list products.
pub fn default_products() -> Vec<Product> {
    vec![
        Product::new(1, "Carbon Road Handlebar 420mm", ProductKind::Hardware, Money::from_cents(12900), 4),
        Product::new(2, "12-speed Chain", ProductKind::Hardware, Money::from_cents(3999), 25),
        Product::new(3, "Hydraulic Disc Brake Set", ProductKind::Hardware, Money::from_cents(18950), 2)
            .with_colors(["Black", "Silver"]),
        Product::new(4, "Tubeless Gravel Tyre 700x40", ProductKind::Hardware, Money::from_cents(4495), 0),
        Product::new(10, "Team Jersey", ProductKind::Apparel, Money::from_cents(5995), 12)
            .with_colors(["Navy", "Red"])
            .with_sizes(["S", "M", "L", "XL"]),
        Product::new(11, "Bib Shorts", ProductKind::Apparel, Money::from_cents(8995), 6)
            .with_colors(["Black"])
            .with_sizes(["S", "M", "L"]),
        Product::new(12, "Merino Socks", ProductKind::Apparel, Money::from_cents(1450), 30)
            .with_sizes(["S/M", "L/XL"]),
    ]
}

/// Generate a default velo.toml config file.
pub fn generate_default_config() -> String {
    r#"# Velo storefront configuration

[store]
# Where the cart is kept between runs
dir = ".velo"

[cart]
storage_key = "velo:cart"

[pricing]
tax_rate = "0.21"
free_shipping_threshold = "100"
free_shipping_method = "gratis"
currency = "EUR"

[checkout]
# Simulated payment processing time
processing_latency_ms = 1500

# Uncomment to replace the built-in shipping catalog.
# [[shipping_methods]]
# id = "estandar"
# name = "Envío estándar"
# description = "Tracked parcel delivery"
# price = "4.95"
# etaLabel = "3-5 business days"
# enabled = true

# Uncomment to replace the demo product catalog.
# [[products]]
# id = 10
# name = "Team Jersey"
# kind = "apparel"
# unit_price = "59.95"
# stock = 12
# colors = ["Navy", "Red"]
# sizes = ["S", "M", "L", "XL"]
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_default_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.store.dir, ".velo");
        assert_eq!(config.cart.storage_key, "velo:cart");
        assert_eq!(config.pricing, PricingPolicy::default());
        assert_eq!(config.checkout.processing_latency_ms, 1500);
        assert!(config.shipping_methods.is_none());
        assert_eq!(config.shipping_methods().len(), 4);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.pricing.tax_rate, Decimal::new(21, 2));
        assert_eq!(config.products().len(), default_products().len());
    }

    #[test]
    fn test_catalog_override() {
        let config: CliConfig = toml::from_str(
            r#"
            [[products]]
            id = 99
            name = "Saddle"
            unit_price = "49.00"
            stock = 1

            [[shipping_methods]]
            id = "moto"
            name = "Moto courier"
            price = "12.00"
            "#,
        )
        .unwrap();
        let products = config.products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].kind, ProductKind::Hardware);
        assert_eq!(config.shipping_methods()[0].id.as_str(), "moto");
        assert_eq!(config.payment_methods().len(), 4);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("velo.json");
        std::fs::write(&path, r#"{"pricing": {"tax_rate": "0.10"}, "store": {"dir": "tmp-cart"}}"#).unwrap();
        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.pricing.tax_rate, Decimal::new(10, 2));
        assert_eq!(config.store.dir, "tmp-cart");
    }
}
