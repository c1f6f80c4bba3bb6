//! Cart line types.

use serde::{Deserialize, Serialize};

use crate::cart::identity::{resolve_id, Variation};
use crate::catalog::ProductKind;
use crate::ids::{LineId, ProductId};
use crate::money::Money;

/// One product variation in the cart with its own quantity.
///
/// Invariants, upheld by [`Cart`](crate::cart::Cart): `1 <= quantity <=
/// available_stock`, and `line_id == resolve_id(product_id, color, size)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub line_id: LineId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub product_kind: ProductKind,
    pub available_stock: i64,
}

impl CartLine {
    /// `unit_price * quantity`.
    pub fn total(&self) -> Money {
        self.unit_price * self.quantity
    }

    /// The selected variation.
    pub fn variation(&self) -> Variation {
        Variation::new(self.color.as_deref(), self.size.as_deref())
    }

    /// Display name including the variation, e.g. "Team Jersey (Navy / M)".
    pub fn display_name(&self) -> String {
        match self.variation().label() {
            Some(label) => format!("{} ({})", self.name, label),
            None => self.name.clone(),
        }
    }

    /// Largest quantity this line may hold.
    pub fn max_quantity(&self) -> i64 {
        self.available_stock.max(0)
    }
}

/// An add-to-cart request: a cart line before its id is resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineCandidate {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    /// Requested quantity; may be anything, the cart clamps it.
    pub quantity: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub variation: Variation,
    pub product_kind: ProductKind,
    pub available_stock: i64,
}

impl LineCandidate {
    /// The id this candidate resolves to.
    pub fn line_id(&self) -> LineId {
        resolve_id(
            self.product_id,
            self.variation.color.as_deref(),
            self.variation.size.as_deref(),
        )
    }

    /// Materialise as a line holding `quantity` units.
    pub(crate) fn into_line(self, quantity: i64) -> CartLine {
        let line_id = self.line_id();
        let variation = Variation::new(
            self.variation.color.as_deref(),
            self.variation.size.as_deref(),
        );
        CartLine {
            line_id,
            product_id: self.product_id,
            name: self.name,
            unit_price: self.unit_price,
            quantity,
            image_url: self.image_url,
            color: variation.color,
            size: variation.size,
            product_kind: self.product_kind,
            available_stock: self.available_stock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> LineCandidate {
        LineCandidate {
            product_id: ProductId::new(12),
            name: "Bib Shorts".into(),
            unit_price: Money::from_cents(8995),
            quantity: 2,
            image_url: None,
            variation: Variation::new(Some(" Black "), Some("L")),
            product_kind: ProductKind::Apparel,
            available_stock: 4,
        }
    }

    #[test]
    fn test_into_line_resolves_id_and_normalises() {
        let line = candidate().into_line(2);
        assert_eq!(line.line_id.as_str(), "12|c=Black|s=L");
        assert_eq!(line.color.as_deref(), Some("Black"));
        assert_eq!(line.total(), Money::from_cents(17990));
    }

    #[test]
    fn test_display_name() {
        let line = candidate().into_line(1);
        assert_eq!(line.display_name(), "Bib Shorts (Black / L)");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(candidate().into_line(1)).unwrap();
        assert_eq!(json["lineId"], "12|c=Black|s=L");
        assert_eq!(json["availableStock"], 4);
        assert_eq!(json["productKind"], "apparel");
    }
}
