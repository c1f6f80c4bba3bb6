//! Shopping cart module.
//!
//! Contains the cart snapshot and its transitions, line identity, pricing,
//! and the persisted cart store.

mod cart;
mod identity;
mod line;
mod pricing;
mod store;

pub use cart::{Cart, QuantityChange};
pub use identity::{resolve_id, Variation};
pub use line::{CartLine, LineCandidate};
pub use pricing::{compute_summary, OrderSummary, PricingPolicy};
pub use store::{CartSettings, CartStore};
