//! Checkout module.
//!
//! Contains the four-step checkout wizard, addresses, the shipping and
//! payment catalogs, the payment gateway seam, and order creation.

mod address;
mod flow;
mod order;
mod payment;
mod session;
mod shipping;

pub use address::Address;
pub use flow::{CheckoutField, CheckoutState, CheckoutStep, CheckoutUpdate};
pub use order::{Order, OrderFactory, OrderStatus};
pub use payment::{
    standard_payment_methods, PaymentGateway, PaymentKind, PaymentMethod, PaymentRequest,
    PaymentStatus, SimulatedGateway, Transaction,
};
pub use session::{CheckoutSession, CheckoutSettings, DEFAULT_PROCESSING_LATENCY_MS};
pub use shipping::{standard_shipping_methods, ShippingMethod};
