//! Cart and checkout engine for the Velo bicycle-parts and apparel storefront.
//!
//! - **Cart**: immutable cart snapshots, line identity, stock clamping,
//!   pricing, and a write-through [`CartStore`](cart::CartStore)
//! - **Checkout**: the four-step wizard, shipping and payment catalogs,
//!   order submission through a [`PaymentGateway`](checkout::PaymentGateway)
//! - **Catalog**: the product shape the cart is fed from
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use velo_cache::MemoryStore;
//! use velo_commerce::prelude::*;
//!
//! let mut store = CartStore::new(Arc::new(MemoryStore::new()));
//! let jersey = Product::new(3, "Team Jersey", ProductKind::Apparel, Money::from_cents(5995), 10)
//!     .with_colors(["Navy"])
//!     .with_sizes(["S", "M", "L"]);
//!
//! store.add_item(jersey.candidate(Variation::none().with_color("Navy").with_size("M"), 2));
//!
//! let summary = compute_summary(store.cart(), None);
//! assert_eq!(summary.subtotal(), Money::from_cents(11990));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Product, ProductKind};

    // Cart
    pub use crate::cart::{
        compute_summary, resolve_id, Cart, CartLine, CartSettings, CartStore, LineCandidate,
        OrderSummary, PricingPolicy, QuantityChange, Variation,
    };

    // Checkout
    pub use crate::checkout::{
        Address, CheckoutField, CheckoutSession, CheckoutSettings, CheckoutState, CheckoutStep,
        CheckoutUpdate, Order, OrderFactory, OrderStatus, PaymentGateway, PaymentKind,
        PaymentMethod, PaymentStatus, ShippingMethod, SimulatedGateway, Transaction,
    };
}
