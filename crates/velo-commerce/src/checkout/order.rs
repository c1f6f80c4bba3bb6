//! Order types and the order factory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cart::{Cart, CartLine, OrderSummary};
use crate::checkout::{
    CheckoutField, CheckoutState, CheckoutStep, PaymentMethod, PaymentStatus, Transaction,
};
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::money::Money;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Payment not settled yet.
    #[default]
    Pending,
    /// Paid and accepted.
    Confirmed,
    /// Payment declined.
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Failed => "failed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Failed => "Failed",
        }
    }

    /// Status implied by a payment outcome.
    pub fn from_payment(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Completed => OrderStatus::Confirmed,
            PaymentStatus::Pending => OrderStatus::Pending,
            PaymentStatus::Failed => OrderStatus::Failed,
        }
    }
}

/// A placed order.
///
/// Everything in it is a copy taken when the order was created; it shares
/// nothing with the live cart or checkout and exposes no setters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    order_number: String,
    created_at: DateTime<Utc>,
    status: OrderStatus,
    lines: Vec<CartLine>,
    checkout: CheckoutState,
    summary: OrderSummary,
    payment_method_used: PaymentMethod,
    transaction: Transaction,
}

impl Order {
    /// Unique order identifier.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Human-readable order number, `ORD-<unix millis>`.
    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Lines as they were in the cart.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Checkout data as it was at submission.
    pub fn checkout(&self) -> &CheckoutState {
        &self.checkout
    }

    pub fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    pub fn payment_method_used(&self) -> &PaymentMethod {
        &self.payment_method_used
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Grand total charged.
    pub fn total(&self) -> Money {
        self.summary.grand_total()
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Check if the order went through.
    pub fn is_confirmed(&self) -> bool {
        self.status == OrderStatus::Confirmed
    }
}

/// Builds [`Order`] records.
///
/// Creating an order has no other effect: clearing the cart and notifying
/// anyone are left to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFactory;

impl OrderFactory {
    /// Build an order stamped with a synthetic completed transaction.
    pub fn create_order(
        cart: &Cart,
        checkout: &CheckoutState,
        summary: OrderSummary,
    ) -> Result<Order, CommerceError> {
        let method = required_payment_method(checkout)?;
        let transaction = Transaction::completed(method.kind);
        Self::create_order_with_transaction(cart, checkout, summary, transaction)
    }

    /// Build an order around a transaction produced by a gateway.
    pub fn create_order_with_transaction(
        cart: &Cart,
        checkout: &CheckoutState,
        summary: OrderSummary,
        transaction: Transaction,
    ) -> Result<Order, CommerceError> {
        let payment_method_used = required_payment_method(checkout)?.clone();
        let created_at = Utc::now();
        let order = Order {
            id: OrderId::generate(),
            order_number: order_number(created_at),
            created_at,
            status: OrderStatus::from_payment(transaction.payment_status),
            lines: cart.lines().to_vec(),
            checkout: checkout.clone(),
            summary,
            payment_method_used,
            transaction,
        };

        info!(
            order = %order.order_number,
            status = order.status.as_str(),
            total = %order.total(),
            lines = order.lines.len(),
            "Order created"
        );
        Ok(order)
    }
}

fn required_payment_method(checkout: &CheckoutState) -> Result<&PaymentMethod, CommerceError> {
    checkout
        .payment_method
        .as_ref()
        .ok_or(CommerceError::CheckoutIncomplete {
            step: CheckoutStep::Payment,
            missing: vec![CheckoutField::PaymentMethod],
        })
}

fn order_number(created_at: DateTime<Utc>) -> String {
    format!("ORD-{}", created_at.timestamp_millis())
}
