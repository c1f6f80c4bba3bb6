//! Product catalog module.
//!
//! The catalog itself is owned by an external collaborator; this module only
//! describes the shape the cart needs from it.

mod product;

pub use product::{Product, ProductKind};
