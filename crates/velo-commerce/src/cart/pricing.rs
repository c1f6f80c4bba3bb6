//! Order pricing.
//!
//! `subtotal` comes from the cart, shipping from the selected method, tax is
//! a flat rate on goods plus shipping, and discount is always zero for now.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::checkout::ShippingMethod;
use crate::ids::ShippingMethodId;
use crate::money::{Currency, Money};

/// Store-wide pricing rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// Value-added tax applied to goods and shipping.
    pub tax_rate: Decimal,
    /// Subtotal from which the free-shipping method costs nothing.
    pub free_shipping_threshold: Money,
    /// Id of the method that becomes free above the threshold.
    pub free_shipping_method: ShippingMethodId,
    /// Store currency, used for display.
    pub currency: Currency,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(21, 2),
            free_shipping_threshold: Money::new(Decimal::ONE_HUNDRED),
            free_shipping_method: ShippingMethodId::new("gratis"),
            currency: Currency::EUR,
        }
    }
}

impl PricingPolicy {
    /// Price charged for `method` on an order with this `subtotal`.
    pub fn shipping_cost(&self, subtotal: Money, method: &ShippingMethod) -> Money {
        if method.id == self.free_shipping_method && subtotal >= self.free_shipping_threshold {
            Money::zero()
        } else {
            method.price
        }
    }

    /// Compute the summary for a cart and optional shipping method.
    pub fn summarize(&self, cart: &Cart, shipping: Option<&ShippingMethod>) -> OrderSummary {
        let subtotal = cart.subtotal();
        let shipping_cost = shipping.map_or(Money::zero(), |m| self.shipping_cost(subtotal, m));
        let tax = (subtotal + shipping_cost).multiply_rate(self.tax_rate);
        let discount = Money::zero();
        OrderSummary {
            subtotal,
            shipping_cost,
            tax,
            discount,
            grand_total: subtotal + shipping_cost + tax - discount,
        }
    }

    /// Amount still needed to qualify for free shipping, if any.
    pub fn remaining_for_free_shipping(&self, subtotal: Money) -> Option<Money> {
        (subtotal < self.free_shipping_threshold).then(|| self.free_shipping_threshold - subtotal)
    }
}

/// Monetary breakdown of an order.
///
/// Only produced by [`compute_summary`] / [`PricingPolicy::summarize`]; the
/// fields cannot be set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    subtotal: Money,
    shipping_cost: Money,
    tax: Money,
    discount: Money,
    grand_total: Money,
}

impl OrderSummary {
    /// Goods total.
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// Shipping charged.
    pub fn shipping_cost(&self) -> Money {
        self.shipping_cost
    }

    /// Tax on goods and shipping.
    pub fn tax(&self) -> Money {
        self.tax
    }

    /// Discount applied.
    pub fn discount(&self) -> Money {
        self.discount
    }

    /// `subtotal + shipping + tax - discount`.
    pub fn grand_total(&self) -> Money {
        self.grand_total
    }

    /// Check if shipping is free on this order.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping_cost.is_zero()
    }
}

/// Compute the summary under the default policy.
pub fn compute_summary(cart: &Cart, shipping: Option<&ShippingMethod>) -> OrderSummary {
    PricingPolicy::default().summarize(cart, shipping)
}
