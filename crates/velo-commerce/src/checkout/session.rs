//! Checkout session: wizard state, catalogs, pricing and order submission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cart::{Cart, OrderSummary, PricingPolicy};
use crate::checkout::{
    standard_payment_methods, standard_shipping_methods, CheckoutField, CheckoutState,
    CheckoutStep, CheckoutUpdate, Order, OrderFactory, PaymentGateway, PaymentMethod,
    PaymentRequest, ShippingMethod, SimulatedGateway,
};
use crate::error::CommerceError;

/// Default simulated payment processing time.
pub const DEFAULT_PROCESSING_LATENCY_MS: u64 = 1500;

/// Checkout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutSettings {
    /// How long the simulated gateway takes to answer.
    pub processing_latency_ms: u64,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            processing_latency_ms: DEFAULT_PROCESSING_LATENCY_MS,
        }
    }
}

impl CheckoutSettings {
    /// Processing latency as a duration.
    pub fn processing_latency(&self) -> Duration {
        Duration::from_millis(self.processing_latency_ms)
    }

    /// A simulated gateway using these settings.
    pub fn simulated_gateway(&self) -> SimulatedGateway {
        SimulatedGateway::new(self.processing_latency())
    }
}

/// One shopper's checkout.
///
/// Holds the wizard state plus what it needs to price and submit an order.
/// At most one submission runs at a time; a second call while one is pending
/// fails with [`CommerceError::SubmissionInFlight`].
///
/// # Example
///
/// ```rust
/// use velo_commerce::checkout::{CheckoutSession, SimulatedGateway, CheckoutStep};
///
/// let mut session = CheckoutSession::new(SimulatedGateway::instant());
/// assert_eq!(session.current_step(), CheckoutStep::Address);
/// // Nothing filled in yet, so the address step does not advance.
/// assert!(!session.advance());
/// ```
pub struct CheckoutSession<G = SimulatedGateway> {
    state: CheckoutState,
    policy: PricingPolicy,
    shipping_methods: Vec<ShippingMethod>,
    payment_methods: Vec<PaymentMethod>,
    gateway: Arc<G>,
    in_flight: AtomicBool,
}

impl<G: PaymentGateway> CheckoutSession<G> {
    /// Start an empty checkout with the built-in catalogs and default policy.
    pub fn new(gateway: G) -> Self {
        Self::with_shared_gateway(Arc::new(gateway))
    }

    /// Start an empty checkout that shares a gateway with other sessions.
    pub fn with_shared_gateway(gateway: Arc<G>) -> Self {
        Self {
            state: CheckoutState::new(),
            policy: PricingPolicy::default(),
            shipping_methods: standard_shipping_methods(),
            payment_methods: standard_payment_methods(),
            gateway,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Set the pricing policy.
    pub fn with_policy(mut self, policy: PricingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the shipping catalog.
    pub fn with_shipping_methods(mut self, methods: Vec<ShippingMethod>) -> Self {
        self.shipping_methods = methods;
        self
    }

    /// Replace the payment catalog.
    pub fn with_payment_methods(mut self, methods: Vec<PaymentMethod>) -> Self {
        self.payment_methods = methods;
        self
    }

    /// Current wizard state.
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Pricing policy in use.
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Offered shipping methods, including disabled ones.
    pub fn shipping_methods(&self) -> &[ShippingMethod] {
        &self.shipping_methods
    }

    /// Offered payment methods.
    pub fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    /// Step the wizard is on.
    pub fn current_step(&self) -> CheckoutStep {
        self.state.current_step()
    }

    /// Merge a partial update into the checkout data. No validation happens
    /// here; see [`validate_step`](Self::validate_step).
    pub fn update_checkout_data(&mut self, update: CheckoutUpdate) {
        self.state.apply(update);
    }

    /// Select a shipping method from the catalog by id.
    pub fn select_shipping_method(&mut self, id: &str) -> Result<&ShippingMethod, CommerceError> {
        let method = self
            .shipping_methods
            .iter()
            .find(|m| m.id.as_str() == id)
            .ok_or_else(|| CommerceError::ShippingMethodNotFound(id.to_string()))?;
        if !method.enabled {
            return Err(CommerceError::ShippingMethodUnavailable(id.to_string()));
        }
        let method = method.clone();
        debug!(method = %method.id, "Shipping method selected");
        self.state.apply(CheckoutUpdate::new().shipping_method(method));
        self.state
            .shipping_method
            .as_ref()
            .ok_or_else(|| CommerceError::ShippingMethodNotFound(id.to_string()))
    }

    /// Select a payment method from the catalog by id.
    pub fn select_payment_method(&mut self, id: &str) -> Result<&PaymentMethod, CommerceError> {
        let method = self
            .payment_methods
            .iter()
            .find(|m| m.id.as_str() == id)
            .cloned()
            .ok_or_else(|| CommerceError::PaymentMethodNotFound(id.to_string()))?;
        debug!(method = %method.id, "Payment method selected");
        self.state.apply(CheckoutUpdate::new().payment_method(method));
        self.state
            .payment_method
            .as_ref()
            .ok_or_else(|| CommerceError::PaymentMethodNotFound(id.to_string()))
    }

    /// See [`CheckoutState::validate_step`].
    pub fn validate_step(&self, step: CheckoutStep) -> bool {
        self.state.validate_step(step)
    }

    /// See [`CheckoutState::missing_fields`].
    pub fn missing_fields(&self, step: CheckoutStep) -> Vec<CheckoutField> {
        self.state.missing_fields(step)
    }

    /// See [`CheckoutState::advance`].
    pub fn advance(&mut self) -> bool {
        self.state.advance()
    }

    /// See [`CheckoutState::retreat`].
    pub fn retreat(&mut self) -> CheckoutStep {
        self.state.retreat()
    }

    /// See [`CheckoutState::go_to`].
    pub fn go_to(&mut self, step: CheckoutStep) -> Result<(), CommerceError> {
        self.state.go_to(step)
    }

    /// Price `cart` with the selected shipping method.
    pub fn summary(&self, cart: &Cart) -> OrderSummary {
        self.policy.summarize(cart, self.state.shipping_method.as_ref())
    }

    /// Check if a submission is running.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Charge the order and build it.
    ///
    /// Fails without charging if the cart is empty, if any of steps 1-3 no
    /// longer validates, or if the wizard is not on the confirmation step.
    /// The cart and checkout data are copied before the gateway is called.
    /// Neither the cart nor this session is modified, whatever the outcome;
    /// clearing the cart after a confirmed order is up to the caller.
    pub async fn submit_order(&self, cart: &Cart) -> Result<Order, CommerceError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        if let Some((step, missing)) = self.state.first_incomplete_step() {
            return Err(CommerceError::CheckoutIncomplete { step, missing });
        }
        if self.state.current_step() != CheckoutStep::Confirmation {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.state.current_step(),
                to: CheckoutStep::Confirmation,
            });
        }

        let cart = cart.clone();
        let checkout = self.state.clone();
        let summary = self.policy.summarize(&cart, checkout.shipping_method.as_ref());
        let method = checkout
            .payment_method
            .clone()
            .ok_or(CommerceError::CheckoutIncomplete {
                step: CheckoutStep::Payment,
                missing: vec![CheckoutField::PaymentMethod],
            })?;

        let request = PaymentRequest {
            amount: summary.grand_total(),
            currency: self.policy.currency,
            method,
        };
        info!(amount = %request.amount, method = %request.method.id, "Submitting order");

        let transaction = match self.gateway.charge(&request).await {
            Ok(tx) => tx,
            Err(CommerceError::PaymentFailed(reason)) => {
                warn!(reason = %reason, "Payment failed");
                return Err(CommerceError::PaymentFailed(reason));
            }
            Err(e) => {
                warn!(error = %e, "Payment failed");
                return Err(CommerceError::PaymentFailed(e.to_string()));
            }
        };

        OrderFactory::create_order_with_transaction(&cart, &checkout, summary, transaction)
    }

    /// Discard the checkout data and start over on the address step.
    pub fn reset(&mut self) {
        self.state = CheckoutState::new();
    }
}

/// Holds the in-flight flag for the duration of a submission.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CommerceError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CommerceError::SubmissionInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
