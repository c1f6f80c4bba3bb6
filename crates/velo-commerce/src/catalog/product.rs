//! Catalog product types.

use serde::{Deserialize, Serialize};

use crate::cart::{LineCandidate, Variation};
use crate::ids::ProductId;
use crate::money::Money;

/// Broad product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// Components and parts.
    #[default]
    Hardware,
    /// Clothing, sized.
    Apparel,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Hardware => "hardware",
            ProductKind::Apparel => "apparel",
        }
    }

    /// Parse a kind name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hardware" => Some(ProductKind::Hardware),
            "apparel" => Some(ProductKind::Apparel),
            _ => None,
        }
    }
}

/// A product as read from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Product family.
    #[serde(default)]
    pub kind: ProductKind,
    /// Price per unit.
    pub unit_price: Money,
    /// Units available to sell.
    #[serde(default)]
    pub stock: i64,
    /// Offered colors, empty if the product has none.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Offered sizes, empty if the product has none.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Primary image.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    /// Create a product with no variations.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        kind: ProductKind,
        unit_price: Money,
        stock: i64,
    ) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            kind,
            unit_price,
            stock,
            colors: Vec::new(),
            sizes: Vec::new(),
            image_url: None,
        }
    }

    /// Set offered colors.
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Set offered sizes.
    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the primary image.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Check if the product has any stock.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Check if the product offers color or size choices.
    pub fn has_variations(&self) -> bool {
        !self.colors.is_empty() || !self.sizes.is_empty()
    }

    /// Build an add-to-cart request for this product.
    ///
    /// The variation is passed through untouched; whether it is one the
    /// product actually offers is the caller's concern.
    pub fn candidate(&self, variation: Variation, quantity: i64) -> LineCandidate {
        LineCandidate {
            product_id: self.id,
            name: self.name.clone(),
            unit_price: self.unit_price,
            quantity,
            image_url: self.image_url.clone(),
            variation,
            product_kind: self.kind,
            available_stock: self.stock,
        }
    }
}
