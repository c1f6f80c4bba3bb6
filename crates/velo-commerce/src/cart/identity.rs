//! Cart line identity.
//!
//! A line is keyed by `(product, color, size)`. The key is a readable string:
//! the product id, then `|c=<color>` and `|s=<size>` for whichever attributes
//! are present. `%` and `|` inside attribute values are percent-escaped, so no
//! two distinct tuples can produce the same key.

use serde::{Deserialize, Serialize};

use crate::ids::{LineId, ProductId};

/// Selected variation attributes of a product.
///
/// Blank attributes are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Variation {
    pub color: Option<String>,
    pub size: Option<String>,
}

impl Variation {
    /// No variation selected.
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from optional attributes, normalising blanks to `None`.
    pub fn new(color: Option<&str>, size: Option<&str>) -> Self {
        Self {
            color: normalise(color),
            size: normalise(size),
        }
    }

    /// Set the color.
    pub fn with_color(mut self, color: impl AsRef<str>) -> Self {
        self.color = normalise(Some(color.as_ref()));
        self
    }

    /// Set the size.
    pub fn with_size(mut self, size: impl AsRef<str>) -> Self {
        self.size = normalise(Some(size.as_ref()));
        self
    }

    /// Resolve the line id for this variation of `product_id`.
    pub fn line_id(&self, product_id: ProductId) -> LineId {
        resolve_id(product_id, self.color.as_deref(), self.size.as_deref())
    }

    /// Human label such as "Black / M", or `None` without attributes.
    pub fn label(&self) -> Option<String> {
        match (&self.color, &self.size) {
            (Some(c), Some(s)) => Some(format!("{c} / {s}")),
            (Some(c), None) => Some(c.clone()),
            (None, Some(s)) => Some(s.clone()),
            (None, None) => None,
        }
    }
}

/// Derive the stable line key for a product and its selected attributes.
///
/// Pure and deterministic: equal inputs always give equal keys, and distinct
/// `(product_id, color, size)` tuples always give distinct keys.
pub fn resolve_id(product_id: ProductId, color: Option<&str>, size: Option<&str>) -> LineId {
    let mut key = product_id.to_string();
    if let Some(color) = normalise(color) {
        key.push_str("|c=");
        push_escaped(&mut key, &color);
    }
    if let Some(size) = normalise(size) {
        key.push_str("|s=");
        push_escaped(&mut key, &size);
    }
    LineId::new(key)
}

fn normalise(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn push_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '|' => out.push_str("%7C"),
            _ => out.push(ch),
        }
    }
}
