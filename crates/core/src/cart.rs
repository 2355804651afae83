//! Shopping cart state machine.
//!
//! The cart is a plain value: an ordered list of line items plus a reducer.
//! Mutations go through [`Cart::apply`] with a [`CartAction`], which returns
//! a [`CartChange`] describing what happened so callers can notify the user.
//! Totals are always recomputed from the lines, never stored.
//!
//! The whole cart serializes as a single serde blob; that blob is what the
//! storefront persists under one session key. Callers loading a blob that
//! fails to deserialize fall back to `Cart::default()` - a corrupt cart is
//! discarded, not surfaced as an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// One product entry in the cart with its own quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog product this line refers to.
    pub product_id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Unit price snapshotted when the line was created.
    pub unit_price: Price,
    /// Product category, for display grouping.
    #[serde(default)]
    pub category: Option<String>,
    /// Product image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Package weight label (e.g. "500g").
    #[serde(default)]
    pub weight: Option<String>,
    /// Units of this product in the cart. Always >= 1 while present.
    pub quantity: u32,
}

impl CartLine {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.times(self.quantity)
    }
}

/// A cart mutation.
///
/// The reducer shape keeps every mutation in one place and makes the
/// semantics testable without any storage attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CartAction {
    /// Merge a line into the cart, summing quantities for an existing
    /// product or appending a new line.
    Add {
        /// The line to merge; `line.quantity` is the amount to add.
        line: CartLine,
    },
    /// Set a line's quantity. A value of zero or less removes the line.
    SetQuantity {
        /// Product whose line to change.
        product_id: ProductId,
        /// New quantity; `<= 0` removes the line.
        quantity: i32,
    },
    /// Remove a line unconditionally.
    Remove {
        /// Product whose line to remove.
        product_id: ProductId,
    },
    /// Empty the cart.
    Clear,
}

/// What a [`CartAction`] did, with enough payload to describe the change to
/// the user (the "added to cart" / "removed from cart" notifications).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartChange {
    /// A line was added or merged; `quantity` is the line's new quantity.
    Added {
        product_id: ProductId,
        name: String,
        quantity: u32,
    },
    /// A line's quantity was set to a new value.
    QuantityChanged {
        product_id: ProductId,
        name: String,
        quantity: u32,
    },
    /// A line was removed.
    Removed { product_id: ProductId, name: String },
    /// The cart was emptied.
    Cleared,
    /// The action targeted a line that does not exist.
    Noop,
}

/// The shopping cart: an insertion-ordered list of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// The line items, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Apply a mutation and report what changed.
    pub fn apply(&mut self, action: CartAction) -> CartChange {
        match action {
            CartAction::Add { line } => self.add(line),
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => self.set_quantity(product_id, quantity),
            CartAction::Remove { product_id } => self.remove(product_id),
            CartAction::Clear => {
                self.lines.clear();
                CartChange::Cleared
            }
        }
    }

    fn add(&mut self, line: CartLine) -> CartChange {
        if line.quantity == 0 {
            return CartChange::Noop;
        }

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
            return CartChange::Added {
                product_id: existing.product_id,
                name: existing.name.clone(),
                quantity: existing.quantity,
            };
        }

        let change = CartChange::Added {
            product_id: line.product_id,
            name: line.name.clone(),
            quantity: line.quantity,
        };
        self.lines.push(line);
        change
    }

    fn set_quantity(&mut self, product_id: ProductId, quantity: i32) -> CartChange {
        let Some(pos) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return CartChange::Noop;
        };

        match u32::try_from(quantity) {
            Ok(new_quantity) if new_quantity > 0 => {
                let Some(line) = self.lines.get_mut(pos) else {
                    return CartChange::Noop;
                };
                line.quantity = new_quantity;
                CartChange::QuantityChanged {
                    product_id: line.product_id,
                    name: line.name.clone(),
                    quantity: line.quantity,
                }
            }
            // Zero or negative removes the line.
            _ => {
                let line = self.lines.remove(pos);
                CartChange::Removed {
                    product_id: line.product_id,
                    name: line.name,
                }
            }
        }
    }

    fn remove(&mut self, product_id: ProductId) -> CartChange {
        let Some(pos) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return CartChange::Noop;
        };

        let line = self.lines.remove(pos);
        CartChange::Removed {
            product_id: line.product_id,
            name: line.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i32, name: &str, price: &str, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: name.to_owned(),
            unit_price: Price::parse(price).unwrap(),
            category: None,
            image_url: None,
            weight: None,
            quantity,
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_add_appends_new_line() {
        let mut cart = Cart::default();
        let change = cart.apply(CartAction::Add {
            line: line(1, "Pão de Queijo", "10.00", 3),
        });

        assert!(matches!(change, CartChange::Added { quantity: 3, .. }));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), dec("30.00"));
    }

    #[test]
    fn test_add_same_product_merges_quantities() {
        let mut cart = Cart::default();
        cart.apply(CartAction::Add {
            line: line(1, "Pão de Queijo", "10.00", 2),
        });
        let change = cart.apply(CartAction::Add {
            line: line(1, "Pão de Queijo", "10.00", 5),
        });

        // One line with q1+q2, not two lines.
        assert_eq!(cart.lines().len(), 1);
        assert!(matches!(change, CartChange::Added { quantity: 7, .. }));
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::default();
        cart.apply(CartAction::Add {
            line: line(1, "Lasanha", "25.00", 1),
        });
        let change = cart.apply(CartAction::SetQuantity {
            product_id: ProductId::new(1),
            quantity: 0,
        });

        assert!(matches!(change, CartChange::Removed { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_negative_removes() {
        let mut cart = Cart::default();
        cart.apply(CartAction::Add {
            line: line(1, "Lasanha", "25.00", 2),
        });
        let change = cart.apply(CartAction::SetQuantity {
            product_id: ProductId::new(1),
            quantity: -3,
        });

        assert!(matches!(change, CartChange::Removed { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_updates_totals() {
        let mut cart = Cart::default();
        cart.apply(CartAction::Add {
            line: line(1, "Lasanha", "25.00", 1),
        });
        let change = cart.apply(CartAction::SetQuantity {
            product_id: ProductId::new(1),
            quantity: 4,
        });

        assert!(matches!(change, CartChange::QuantityChanged { quantity: 4, .. }));
        assert_eq!(cart.subtotal(), dec("100.00"));
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_remove_missing_line_is_noop() {
        let mut cart = Cart::default();
        let change = cart.apply(CartAction::Remove {
            product_id: ProductId::new(99),
        });
        assert!(matches!(change, CartChange::Noop));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::default();
        cart.apply(CartAction::Add {
            line: line(1, "A", "1.00", 1),
        });
        cart.apply(CartAction::Add {
            line: line(2, "B", "2.00", 1),
        });

        let change = cart.apply(CartAction::Clear);
        assert!(matches!(change, CartChange::Cleared));
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_totals_hold_over_mixed_sequences() {
        let mut cart = Cart::default();
        cart.apply(CartAction::Add {
            line: line(1, "A", "10.00", 3),
        });
        cart.apply(CartAction::Add {
            line: line(2, "B", "25.00", 1),
        });
        cart.apply(CartAction::Add {
            line: line(3, "C", "7.50", 2),
        });
        cart.apply(CartAction::SetQuantity {
            product_id: ProductId::new(3),
            quantity: 1,
        });
        cart.apply(CartAction::Remove {
            product_id: ProductId::new(2),
        });

        // Remaining: 3 x 10.00 + 1 x 7.50
        assert_eq!(cart.subtotal(), dec("37.50"));
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::default();
        for id in [3, 1, 2] {
            cart.apply(CartAction::Add {
                line: line(id, &format!("P{id}"), "1.00", 1),
            });
        }
        let ids: Vec<i32> = cart.lines().iter().map(|l| l.product_id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::default();
        cart.apply(CartAction::Add {
            line: line(1, "Pão de Queijo", "10.00", 3),
        });

        let blob = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&blob).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_empty() {
        // Callers use unwrap_or_default on deserialization failure.
        let cart: Cart = serde_json::from_str("{\"lines\": \"nonsense\"}").unwrap_or_default();
        assert!(cart.is_empty());
    }
}
