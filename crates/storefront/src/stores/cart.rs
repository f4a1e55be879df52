//! Persisted shopping cart.

use francine_core::{Price, ProductId};

use crate::models::Cart;
use crate::storage::{Storage, StorageError, keys, load_json, save_json};

/// The shopping cart, persisted under [`keys::CART`].
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    cart: Cart,
}

impl<S: Storage> CartStore<S> {
    /// Restore the cart from storage.
    ///
    /// An absent, unreadable or malformed value yields an empty cart; the
    /// problem is logged, never returned.
    pub fn load(storage: S) -> Self {
        let cart = match load_json::<Cart, _>(&storage, keys::CART) {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable cart");
                Cart::new()
            }
        };
        tracing::debug!(lines = cart.len(), "Cart loaded");
        Self { storage, cart }
    }

    /// Current cart contents.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add one unit of a product and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be written; the in-memory
    /// cart is then unchanged.
    pub fn add(
        &mut self,
        id: ProductId,
        name: impl Into<String>,
        unit_price: Price,
    ) -> Result<&Cart, StorageError> {
        let mut next = self.cart.clone();
        next.add(id, name, unit_price);
        self.commit(next)
    }

    /// Remove a product's line and persist. Removing an absent ID is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be written.
    pub fn remove(&mut self, id: &ProductId) -> Result<&Cart, StorageError> {
        if self.cart.get(id).is_none() {
            return Ok(&self.cart);
        }
        let mut next = self.cart.clone();
        next.remove(id);
        self.commit(next)
    }

    /// Empty the cart and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty cart cannot be written.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.commit(Cart::new()).map(|_| ())
    }

    /// Σ(unit price × quantity).
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Σ(quantity).
    #[must_use]
    pub fn count(&self) -> u64 {
        self.cart.count()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    fn commit(&mut self, next: Cart) -> Result<&Cart, StorageError> {
        save_json(&self.storage, keys::CART, &next)?;
        self.cart = next;
        Ok(&self.cart)
    }
}
