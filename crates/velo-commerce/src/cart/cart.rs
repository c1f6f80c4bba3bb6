//! Cart snapshot and its transitions.
//!
//! A [`Cart`] is an immutable value. Every operation returns a new cart with
//! `grand_quantity` and `subtotal` recomputed from the lines, so a snapshot can
//! never be observed with totals out of step with its lines.

use serde::{Deserialize, Serialize};

use crate::cart::{CartLine, LineCandidate, Variation};
use crate::ids::{LineId, ProductId};
use crate::money::Money;

/// A shopping cart snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", from = "StoredCart")]
pub struct Cart {
    lines: Vec<CartLine>,
    grand_quantity: i64,
    subtotal: Money,
}

/// Wire shape of a cart. Totals in the record are ignored on decode and
/// rebuilt from the lines.
#[derive(Deserialize)]
struct StoredCart {
    #[serde(default)]
    lines: Vec<CartLine>,
}

impl From<StoredCart> for Cart {
    fn from(stored: StoredCart) -> Self {
        Cart::from_lines(stored.lines)
    }
}

/// What a quantity-changing operation did to a line.
///
/// `requested` is the quantity the caller asked the line to end up with and
/// `applied` the quantity it actually holds afterwards (0 if it is gone).
/// Comparing the two is how callers detect a stock clamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantityChange {
    pub line_id: LineId,
    pub previous: i64,
    pub requested: i64,
    pub applied: i64,
}

impl QuantityChange {
    /// True when stock capped the request.
    pub fn was_clamped(&self) -> bool {
        self.applied < self.requested
    }

    /// Units the request asked for but did not get.
    pub fn shortfall(&self) -> i64 {
        self.requested.saturating_sub(self.applied).max(0)
    }

    /// True when the line was left as it was.
    pub fn is_noop(&self) -> bool {
        self.applied == self.previous
    }
}

impl Cart {
    /// The empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from arbitrary lines, restoring every line invariant.
    ///
    /// Line ids are re-derived from `(product_id, color, size)`, lines that
    /// share an id are merged, quantities are clamped to stock and lines left
    /// with fewer than one unit are dropped.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut merged: Vec<CartLine> = Vec::new();
        for line in lines {
            let variation = line.variation();
            let line_id = variation.line_id(line.product_id);
            let line = CartLine {
                line_id,
                color: variation.color,
                size: variation.size,
                ..line
            };
            match merged.iter_mut().find(|l| l.line_id == line.line_id) {
                Some(existing) => {
                    let quantity = existing.quantity.max(0).saturating_add(line.quantity.max(0));
                    *existing = CartLine { quantity, ..line };
                }
                None => merged.push(line),
            }
        }

        let lines = merged
            .into_iter()
            .map(|line| CartLine {
                quantity: line.quantity.min(line.max_quantity()),
                ..line
            })
            .filter(|line| line.quantity >= 1)
            .collect();

        Self::with_lines(lines)
    }

    /// Recompute totals for an already-valid set of lines.
    fn with_lines(lines: Vec<CartLine>) -> Self {
        let grand_quantity = lines
            .iter()
            .fold(0_i64, |acc, l| acc.saturating_add(l.quantity));
        let subtotal = lines.iter().map(CartLine::total).sum();
        Self {
            lines,
            grand_quantity,
            subtotal,
        }
    }

    /// Add a candidate, merging into an existing line with the same id.
    ///
    /// Existing line: quantity becomes `min(existing + requested, stock)`.
    /// New line: quantity is `min(requested, stock)`. Over-requests are
    /// clamped silently; the returned [`QuantityChange`] reports it. A
    /// non-positive request, or one against zero stock, leaves the cart
    /// untouched, including any line already held.
    pub fn add_item(&self, candidate: LineCandidate) -> (Cart, QuantityChange) {
        let line_id = candidate.line_id();
        let stock = candidate.available_stock.max(0);
        let previous = self.line(&line_id).map_or(0, |l| l.quantity);
        let requested = previous.saturating_add(candidate.quantity);

        if candidate.quantity <= 0 || stock == 0 {
            let change = QuantityChange {
                line_id,
                previous,
                requested,
                applied: previous,
            };
            return (self.clone(), change);
        }

        let applied = requested.min(stock);
        let mut lines: Vec<CartLine> = self
            .lines
            .iter()
            .filter(|l| l.line_id != line_id)
            .cloned()
            .collect();

        let fresh = candidate.into_line(applied);
        match self.lines.iter().position(|l| l.line_id == line_id) {
            Some(index) => lines.insert(index, fresh),
            None => lines.push(fresh),
        }

        let change = QuantityChange {
            line_id,
            previous,
            requested,
            applied,
        };
        (Self::with_lines(lines), change)
    }

    /// Remove a line. Absent ids are ignored.
    pub fn remove_item(&self, line_id: &LineId) -> Cart {
        let lines = self
            .lines
            .iter()
            .filter(|l| &l.line_id != line_id)
            .cloned()
            .collect();
        Self::with_lines(lines)
    }

    /// Set a line's quantity, clamped to its stock.
    ///
    /// A quantity of zero or less removes the line. Returns `None` for the
    /// change when no line has that id, in which case the cart is unchanged.
    pub fn update_quantity(&self, line_id: &LineId, quantity: i64) -> (Cart, Option<QuantityChange>) {
        let Some(line) = self.line(line_id) else {
            return (self.clone(), None);
        };

        let previous = line.quantity;
        let applied = if quantity <= 0 {
            0
        } else {
            quantity.min(line.max_quantity())
        };

        let lines = self
            .lines
            .iter()
            .filter_map(|l| {
                if &l.line_id != line_id {
                    Some(l.clone())
                } else if applied >= 1 {
                    Some(CartLine {
                        quantity: applied,
                        ..l.clone()
                    })
                } else {
                    None
                }
            })
            .collect();

        let change = QuantityChange {
            line_id: line_id.clone(),
            previous,
            requested: quantity.max(0),
            applied,
        };
        (Self::with_lines(lines), Some(change))
    }

    /// The empty cart.
    pub fn cleared(&self) -> Cart {
        Cart::new()
    }

    /// Look up the line for a product and variation.
    pub fn find_line(&self, product_id: ProductId, variation: &Variation) -> Option<&CartLine> {
        self.line(&variation.line_id(product_id))
    }

    /// Look up a line by id.
    pub fn line(&self, line_id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.line_id == line_id)
    }

    /// All lines.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of line quantities.
    pub fn grand_quantity(&self) -> i64 {
        self.grand_quantity
    }

    /// Sum of `unit_price * quantity` over lines.
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// Number of distinct lines.
    pub fn unique_line_count(&self) -> usize {
        self.lines.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductKind;

    fn candidate(product: u64, quantity: i64, stock: i64) -> LineCandidate {
        LineCandidate {
            product_id: ProductId::new(product),
            name: format!("Product {product}"),
            unit_price: Money::from_cents(1000),
            quantity,
            image_url: None,
            variation: Variation::none(),
            product_kind: ProductKind::Hardware,
            available_stock: stock,
        }
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.grand_quantity(), 0);
        assert_eq!(cart.subtotal(), Money::zero());
    }

    #[test]
    fn test_add_item() {
        let (cart, change) = Cart::new().add_item(candidate(1, 2, 10));
        assert_eq!(cart.grand_quantity(), 2);
        assert_eq!(cart.unique_line_count(), 1);
        assert_eq!(cart.subtotal(), Money::from_cents(2000));
        assert!(!change.was_clamped());
    }

    #[test]
    fn test_add_same_item_merges() {
        let (cart, _) = Cart::new().add_item(candidate(1, 1, 10));
        let (cart, change) = cart.add_item(candidate(1, 1, 10));
        assert_eq!(cart.unique_line_count(), 1);
        assert_eq!(cart.grand_quantity(), 2);
        assert_eq!(change.previous, 1);
        assert_eq!(change.applied, 2);
    }

    #[test]
    fn test_different_variations_are_separate_lines() {
        let red = LineCandidate {
            variation: Variation::none().with_color("Red"),
            ..candidate(1, 1, 10)
        };
        let blue = LineCandidate {
            variation: Variation::none().with_color("Blue"),
            ..candidate(1, 1, 10)
        };
        let (cart, _) = Cart::new().add_item(red);
        let (cart, _) = cart.add_item(blue);
        assert_eq!(cart.unique_line_count(), 2);
    }

    #[test]
    fn test_add_clamps_new_line_to_stock() {
        let (cart, change) = Cart::new().add_item(candidate(1, 9, 3));
        assert_eq!(cart.grand_quantity(), 3);
        assert!(change.was_clamped());
        assert_eq!(change.shortfall(), 6);
    }

    #[test]
    fn test_add_clamps_merge_to_stock() {
        let (cart, _) = Cart::new().add_item(candidate(1, 2, 3));
        let (cart, change) = cart.add_item(candidate(1, 2, 3));
        assert_eq!(cart.grand_quantity(), 3);
        assert_eq!(change.requested, 4);
        assert_eq!(change.applied, 3);
    }

    #[test]
    fn test_add_non_positive_is_noop() {
        let (cart, _) = Cart::new().add_item(candidate(1, 2, 5));
        let (after, change) = cart.add_item(candidate(1, -4, 5));
        assert_eq!(after, cart);
        assert!(change.is_noop());

        let (empty, change) = Cart::new().add_item(candidate(2, 0, 5));
        assert!(empty.is_empty());
        assert_eq!(change.applied, 0);
    }

    #[test]
    fn test_add_out_of_stock_inserts_nothing() {
        let (cart, change) = Cart::new().add_item(candidate(1, 1, 0));
        assert!(cart.is_empty());
        assert!(change.was_clamped());
    }

    #[test]
    fn test_add_out_of_stock_keeps_existing_line() {
        let (cart, _) = Cart::new().add_item(candidate(1, 3, 10));
        let (after, change) = cart.add_item(candidate(1, 1, 0));
        assert_eq!(after, cart);
        assert_eq!(after.lines()[0].quantity, 3);
        assert_eq!(change.previous, 3);
        assert_eq!(change.applied, 3);
        assert!(change.is_noop());
    }

    #[test]
    fn test_add_is_pure() {
        let (before, _) = Cart::new().add_item(candidate(1, 1, 5));
        let snapshot = before.clone();
        let _ = before.add_item(candidate(1, 3, 5));
        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_update_quantity() {
        let (cart, change) = Cart::new().add_item(candidate(1, 1, 10));
        let (cart, update) = cart.update_quantity(&change.line_id, 5);
        assert_eq!(cart.grand_quantity(), 5);
        assert_eq!(update.map(|u| u.applied), Some(5));
    }

    #[test]
    fn test_update_quantity_clamps() {
        let (cart, change) = Cart::new().add_item(candidate(1, 1, 4));
        let (cart, update) = cart.update_quantity(&change.line_id, 40);
        assert_eq!(cart.grand_quantity(), 4);
        assert!(update.is_some_and(|u| u.was_clamped()));
    }

    #[test]
    fn test_update_to_zero_removes() {
        let (cart, change) = Cart::new().add_item(candidate(1, 2, 4));
        let (cart, update) = cart.update_quantity(&change.line_id, 0);
        assert!(cart.is_empty());
        assert_eq!(update.map(|u| u.applied), Some(0));

        let (cart, change) = Cart::new().add_item(candidate(1, 2, 4));
        let (cart, _) = cart.update_quantity(&change.line_id, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_absent_is_noop() {
        let (cart, _) = Cart::new().add_item(candidate(1, 2, 4));
        let (after, update) = cart.update_quantity(&LineId::new("999"), 3);
        assert_eq!(after, cart);
        assert!(update.is_none());
    }

    #[test]
    fn test_remove_item() {
        let (cart, change) = Cart::new().add_item(candidate(1, 1, 4));
        let (cart, _) = cart.add_item(candidate(2, 1, 4));
        let cart = cart.remove_item(&change.line_id);
        assert_eq!(cart.unique_line_count(), 1);
        assert_eq!(cart.subtotal(), Money::from_cents(1000));

        let again = cart.remove_item(&change.line_id);
        assert_eq!(again, cart);
    }

    #[test]
    fn test_find_line() {
        let jersey = LineCandidate {
            variation: Variation::none().with_color("Navy").with_size("M"),
            ..candidate(7, 1, 4)
        };
        let (cart, _) = Cart::new().add_item(jersey);
        let found = cart.find_line(
            ProductId::new(7),
            &Variation::none().with_color("Navy").with_size("M"),
        );
        assert!(found.is_some());
        assert!(cart.find_line(ProductId::new(7), &Variation::none()).is_none());
    }

    #[test]
    fn test_from_lines_normalises() {
        let (cart, _) = Cart::new().add_item(candidate(1, 2, 3));
        let line = cart.lines()[0].clone();
        let tampered = CartLine {
            line_id: LineId::new("bogus"),
            quantity: 2,
            ..line.clone()
        };
        let zero = CartLine {
            quantity: 0,
            ..candidate(2, 1, 1).into_line(1)
        };

        let rebuilt = Cart::from_lines(vec![line, tampered, zero]);
        assert_eq!(rebuilt.unique_line_count(), 1);
        assert_eq!(rebuilt.grand_quantity(), 3);
        assert_eq!(rebuilt.lines()[0].line_id.as_str(), "1");
    }

    #[test]
    fn test_decode_rebuilds_totals() {
        let (cart, _) = Cart::new().add_item(candidate(1, 2, 3));
        let mut json = serde_json::to_value(&cart).unwrap();
        json["grandQuantity"] = serde_json::json!(99);
        json["subtotal"] = serde_json::json!("0");

        let decoded: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, cart);
    }
}
