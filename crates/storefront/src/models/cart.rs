//! Cart model.
//!
//! A cart is an ordered list of line items keyed by product ID. Two
//! invariants hold for every `Cart` value, including ones decoded from
//! storage:
//!
//! - at most one line item per product ID
//! - every quantity is at least 1

use serde::{Deserialize, Serialize};

use francine_core::{Price, ProductId};

/// One product entry in the cart with its quantity.
///
/// Serialized as `{id, name, price, qty}`, the format the cart has always
/// been persisted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier, unique within the cart.
    pub id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Unit price at the time it was added.
    #[serde(rename = "price")]
    pub unit_price: Price,
    /// Number of units, never zero.
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl LineItem {
    /// Price of this line (`unit_price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Ordered collection of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of a product.
    ///
    /// An existing line for `id` has its quantity bumped; otherwise a new
    /// line with quantity 1 is appended. Name and price of an existing line
    /// are left as they were when it was first added.
    pub fn add(&mut self, id: ProductId, name: impl Into<String>, unit_price: Price) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(LineItem {
                id,
                name: name.into(),
                unit_price,
                quantity: 1,
            });
        }
    }

    /// Remove the line for `id`, returning it if it was present.
    pub fn remove(&mut self, id: &ProductId) -> Option<LineItem> {
        let pos = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up the line for `id`.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Σ(unit price × quantity).
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Σ(quantity).
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

impl From<Vec<LineItem>> for Cart {
    /// Build a cart from raw lines, restoring the invariants: zero-quantity
    /// lines are dropped and duplicate IDs are merged into the first
    /// occurrence.
    fn from(raw: Vec<LineItem>) -> Self {
        let mut items: Vec<LineItem> = Vec::with_capacity(raw.len());
        for item in raw.into_iter().filter(|item| item.quantity > 0) {
            if let Some(existing) = items.iter_mut().find(|line| line.id == item.id) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                items.push(item);
            }
        }
        Self { items }
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
