//! Checkout wizard state machine.
//!
//! Four steps, in order: address, shipping, payment, confirmation. Each of
//! the first three has a predicate over [`CheckoutState`]; [`advance`] only
//! moves forward when the current step's predicate holds, and does nothing
//! otherwise. Field-level feedback comes from [`missing_fields`].
//!
//! [`advance`]: CheckoutState::advance
//! [`missing_fields`]: CheckoutState::missing_fields

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::checkout::{Address, PaymentMethod, ShippingMethod};
use crate::error::CommerceError;

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CheckoutStep {
    /// Shipping and billing address.
    #[default]
    Address,
    /// Shipping method.
    Shipping,
    /// Payment method.
    Payment,
    /// Final review and submission.
    Confirmation,
}

impl CheckoutStep {
    /// All steps in order.
    pub const ALL: [CheckoutStep; 4] = [
        CheckoutStep::Address,
        CheckoutStep::Shipping,
        CheckoutStep::Payment,
        CheckoutStep::Confirmation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Address => "address",
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Confirmation => "confirmation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Address => "Address",
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Confirmation => "Confirmation",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Address => 1,
            CheckoutStep::Shipping => 2,
            CheckoutStep::Payment => 3,
            CheckoutStep::Confirmation => 4,
        }
    }

    /// Step for a 1-indexed number.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(CheckoutStep::Address),
            2 => Some(CheckoutStep::Shipping),
            3 => Some(CheckoutStep::Payment),
            4 => Some(CheckoutStep::Confirmation),
            _ => None,
        }
    }

    /// The following step, saturating at confirmation.
    pub fn next(&self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(CheckoutStep::Confirmation)
    }

    /// The preceding step, saturating at address.
    pub fn previous(&self) -> Self {
        Self::from_number(self.number().saturating_sub(1)).unwrap_or(CheckoutStep::Address)
    }

    /// Get progress percentage.
    pub fn progress_percent(&self) -> u8 {
        self.number() * 25
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CheckoutStep> for u8 {
    fn from(step: CheckoutStep) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for CheckoutStep {
    type Error = CommerceError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::from_number(number).ok_or(CommerceError::InvalidStep(number))
    }
}

/// A requirement a checkout step can be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutField {
    FirstName,
    LastName,
    Line1,
    City,
    PostalCode,
    Email,
    ShippingMethod,
    PaymentMethod,
}

impl CheckoutField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutField::FirstName => "first_name",
            CheckoutField::LastName => "last_name",
            CheckoutField::Line1 => "line1",
            CheckoutField::City => "city",
            CheckoutField::PostalCode => "postal_code",
            CheckoutField::Email => "email",
            CheckoutField::ShippingMethod => "shipping_method",
            CheckoutField::PaymentMethod => "payment_method",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            CheckoutField::FirstName => "first name",
            CheckoutField::LastName => "last name",
            CheckoutField::Line1 => "address line",
            CheckoutField::City => "city",
            CheckoutField::PostalCode => "postal code",
            CheckoutField::Email => "email",
            CheckoutField::ShippingMethod => "shipping method",
            CheckoutField::PaymentMethod => "payment method",
        }
    }
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Data collected by the checkout wizard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutState {
    pub shipping_address: Address,
    pub billing_address: Address,
    pub use_shipping_as_billing: bool,
    pub shipping_method: Option<ShippingMethod>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: String,
    current_step: CheckoutStep,
}

impl CheckoutState {
    /// Empty checkout on the address step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Step the wizard is on.
    pub fn current_step(&self) -> CheckoutStep {
        self.current_step
    }

    /// Merge a partial update.
    ///
    /// Fields absent from the update are left alone. When the update sets
    /// `use_shipping_as_billing` to `true`, the shipping address (after this
    /// update) is copied into the billing address once; later shipping edits
    /// are not mirrored unless the flag is set again.
    pub fn apply(&mut self, update: CheckoutUpdate) {
        let CheckoutUpdate {
            shipping_address,
            billing_address,
            use_shipping_as_billing,
            shipping_method,
            payment_method,
            notes,
        } = update;

        if let Some(address) = shipping_address {
            self.shipping_address = address;
        }
        if let Some(address) = billing_address {
            self.billing_address = address;
        }
        if let Some(method) = shipping_method {
            self.shipping_method = Some(method);
        }
        if let Some(method) = payment_method {
            self.payment_method = Some(method);
        }
        if let Some(notes) = notes {
            self.notes = notes;
        }
        if let Some(flag) = use_shipping_as_billing {
            self.use_shipping_as_billing = flag;
            if flag {
                self.billing_address = self.shipping_address.clone();
            }
        }
    }

    /// Unmet requirements for `step`, empty when the step validates.
    pub fn missing_fields(&self, step: CheckoutStep) -> Vec<CheckoutField> {
        match step {
            CheckoutStep::Address => self.shipping_address.missing_required_fields(),
            CheckoutStep::Shipping if self.shipping_method.is_none() => {
                vec![CheckoutField::ShippingMethod]
            }
            CheckoutStep::Payment if self.payment_method.is_none() => {
                vec![CheckoutField::PaymentMethod]
            }
            _ => Vec::new(),
        }
    }

    /// Check the predicate for `step`. Confirmation always passes.
    pub fn validate_step(&self, step: CheckoutStep) -> bool {
        self.missing_fields(step).is_empty()
    }

    /// First step among 1-3 that fails, with what it is missing.
    pub fn first_incomplete_step(&self) -> Option<(CheckoutStep, Vec<CheckoutField>)> {
        [CheckoutStep::Address, CheckoutStep::Shipping, CheckoutStep::Payment]
            .into_iter()
            .map(|step| (step, self.missing_fields(step)))
            .find(|(_, missing)| !missing.is_empty())
    }

    /// Move to the next step if the current one validates.
    ///
    /// Returns `true` if the step changed.
    pub fn advance(&mut self) -> bool {
        let from = self.current_step;
        if !self.validate_step(from) {
            debug!(step = %from, "Checkout step incomplete, not advancing");
            return false;
        }
        self.current_step = from.next();
        debug!(from = %from, to = %self.current_step, "Checkout advanced");
        self.current_step != from
    }

    /// Move back one step. Stays on the address step.
    pub fn retreat(&mut self) -> CheckoutStep {
        self.current_step = self.current_step.previous();
        self.current_step
    }

    /// Jump back to an earlier step, or stay on the current one.
    pub fn go_to(&mut self, step: CheckoutStep) -> Result<(), CommerceError> {
        if step > self.current_step {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.current_step,
                to: step,
            });
        }
        self.current_step = step;
        Ok(())
    }
}

/// A partial [`CheckoutState`] update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutUpdate {
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub use_shipping_as_billing: Option<bool>,
    pub shipping_method: Option<ShippingMethod>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

impl CheckoutUpdate {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shipping_address(mut self, address: Address) -> Self {
        self.shipping_address = Some(address);
        self
    }

    pub fn billing_address(mut self, address: Address) -> Self {
        self.billing_address = Some(address);
        self
    }

    pub fn use_shipping_as_billing(mut self, flag: bool) -> Self {
        self.use_shipping_as_billing = Some(flag);
        self
    }

    pub fn shipping_method(mut self, method: ShippingMethod) -> Self {
        self.shipping_method = Some(method);
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
