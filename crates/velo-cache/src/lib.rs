//! Key-value persistence layer for the Velo storefront.
//!
//! Provides a small [`KvStore`] trait with an in-memory and a file-backed
//! implementation, plus a [`Cache`] wrapper that handles JSON serialization.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use serde::{Serialize, Deserialize};
//! use velo_cache::{Cache, MemoryStore};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Cart {
//!     items: Vec<String>,
//! }
//!
//! let cache = Cache::new(Arc::new(MemoryStore::new()));
//!
//! // Store a value
//! cache.set("velo:cart", &Cart { items: vec!["chainring".into()] }).unwrap();
//!
//! // Retrieve a value
//! let cart: Option<Cart> = cache.get("velo:cart").unwrap();
//! assert!(cart.is_some());
//!
//! // Delete a value
//! cache.delete("velo:cart").unwrap();
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KvStore};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
