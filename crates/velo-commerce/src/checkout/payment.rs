//! Payment methods and the payment gateway seam.
//!
//! Real gateway integrations are out of scope. [`SimulatedGateway`] stands in
//! for one: it waits for a configurable latency and approves every charge.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CommerceError;
use crate::ids::{PaymentMethodId, TransactionId};
use crate::money::{Currency, Money};

/// How a payment method moves money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Credit or debit card.
    Card,
    /// Digital wallet such as PayPal.
    Wallet,
    /// Bank transfer.
    BankTransfer,
    /// Paid to the courier on delivery.
    CashOnDelivery,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Card => "card",
            PaymentKind::Wallet => "wallet",
            PaymentKind::BankTransfer => "bank_transfer",
            PaymentKind::CashOnDelivery => "cash_on_delivery",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentKind::Card => "Card",
            PaymentKind::Wallet => "Wallet",
            PaymentKind::BankTransfer => "Bank transfer",
            PaymentKind::CashOnDelivery => "Cash on delivery",
        }
    }
}

/// A payment method option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Unique identifier.
    pub id: PaymentMethodId,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Payment kind.
    pub kind: PaymentKind,
    /// Extra charge as a percentage of the order total, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surcharge_percent: Option<Decimal>,
}

impl PaymentMethod {
    /// Create a payment method without surcharge.
    pub fn new(id: impl Into<PaymentMethodId>, name: impl Into<String>, kind: PaymentKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind,
            surcharge_percent: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set a percentage surcharge.
    pub fn with_surcharge(mut self, percent: Decimal) -> Self {
        self.surcharge_percent = Some(percent);
        self
    }

    /// Surcharge this method would add to `amount`.
    ///
    /// Informational only: order totals never include it.
    pub fn surcharge_on(&self, amount: Money) -> Money {
        self.surcharge_percent
            .map_or(Money::zero(), |percent| amount.percentage(percent))
    }
}

/// The storefront's built-in payment methods.
pub fn standard_payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod::new("tarjeta", "Tarjeta de crédito/débito", PaymentKind::Card)
            .with_description("Visa, Mastercard, American Express"),
        PaymentMethod::new("paypal", "PayPal", PaymentKind::Wallet)
            .with_description("Pay with your PayPal account"),
        PaymentMethod::new("transferencia", "Transferencia bancaria", PaymentKind::BankTransfer)
            .with_description("Order ships once the transfer clears"),
        PaymentMethod::new("contrareembolso", "Contra reembolso", PaymentKind::CashOnDelivery)
            .with_description("Pay the courier on delivery")
            .with_surcharge(Decimal::TWO),
    ]
}

/// Outcome of a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// Record of a charge attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub payment_status: PaymentStatus,
    pub payment_method_kind: PaymentKind,
}

impl Transaction {
    /// A successful transaction with a fresh id.
    pub fn completed(kind: PaymentKind) -> Self {
        Self {
            transaction_id: TransactionId::generate(),
            payment_status: PaymentStatus::Completed,
            payment_method_kind: kind,
        }
    }
}

/// What the gateway is asked to charge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Money,
    pub currency: Currency,
    pub method: PaymentMethod,
}

/// A payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge the request. Implementations report declines either as an
    /// `Err` or as a transaction with [`PaymentStatus::Failed`].
    async fn charge(&self, request: &PaymentRequest) -> Result<Transaction, CommerceError>;
}

/// A gateway that approves everything after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    latency: Duration,
}

impl SimulatedGateway {
    /// Create a gateway with the given processing latency.
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// A gateway that answers immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Configured latency.
    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::checkout::DEFAULT_PROCESSING_LATENCY_MS))
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, request: &PaymentRequest) -> Result<Transaction, CommerceError> {
        debug!(
            amount = %request.amount,
            method = %request.method.id,
            latency_ms = self.latency.as_millis() as u64,
            "Simulating payment"
        );
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(Transaction::completed(request.method.kind))
    }
}
