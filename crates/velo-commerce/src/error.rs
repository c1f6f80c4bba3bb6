//! Commerce error types.

use thiserror::Error;

use crate::checkout::{CheckoutField, CheckoutStep};

/// Errors that can occur in cart and checkout operations.
///
/// Validation shortfalls and stock overruns are deliberately absent: those are
/// reported as values (`bool`, `QuantityChange`), never as errors.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// The checkout is missing data required by a step.
    #[error("Checkout incomplete at {step} step: missing {}", join_fields(.missing))]
    CheckoutIncomplete {
        step: CheckoutStep,
        missing: Vec<CheckoutField>,
    },

    /// Invalid checkout navigation.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: CheckoutStep, to: CheckoutStep },

    /// Step number outside 1..=4.
    #[error("Invalid checkout step: {0}")]
    InvalidStep(u8),

    /// Tried to submit an order for an empty cart.
    #[error("Cannot submit an order for an empty cart")]
    EmptyCart,

    /// A submission for this checkout is already running.
    #[error("An order submission is already in progress")]
    SubmissionInFlight,

    /// Shipping method id not offered.
    #[error("Shipping method not found: {0}")]
    ShippingMethodNotFound(String),

    /// Shipping method exists but is switched off.
    #[error("Shipping method unavailable: {0}")]
    ShippingMethodUnavailable(String),

    /// Payment method id not offered.
    #[error("Payment method not found: {0}")]
    PaymentMethodNotFound(String),

    /// The payment gateway rejected or failed the charge.
    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    /// Persistence adapter error.
    #[error("Storage error: {0}")]
    Storage(#[from] velo_cache::CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

fn join_fields(fields: &[CheckoutField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_message_lists_fields() {
        let err = CommerceError::CheckoutIncomplete {
            step: CheckoutStep::Address,
            missing: vec![CheckoutField::FirstName, CheckoutField::Email],
        };
        assert_eq!(
            err.to_string(),
            "Checkout incomplete at address step: missing first name, email"
        );
    }
}
