//! Saved carts: freezing, loading (replace) and merging into the live cart.

use smallvec::smallvec;

use crate::{
    cart::{Cart, CartLineItem},
    errors::LedgerError,
    events::{Events, LedgerEvent},
    history::HistorySnapshot,
    inventory::InventoryPool,
    ledger::CartLedger,
    products::ProductId,
    saved::{SavedCart, SavedCartId},
};

impl CartLedger {
    /// Freeze the live cart into a new saved cart. The cart itself is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EmptyCart`] when there is nothing to save.
    pub fn save_cart(&mut self, name: &str) -> Result<Events, LedgerError> {
        if self.cart.is_empty() {
            return Err(LedgerError::EmptyCart);
        }

        let saved = SavedCart::new(name, self.cart.items().to_vec());
        let cart = saved.id;

        self.saved_carts.push(saved);

        Ok(smallvec![LedgerEvent::CartSaved { cart }])
    }

    /// Delete a saved cart.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::SavedCartNotFound`] for an unknown id.
    pub fn delete_saved_cart(&mut self, cart: SavedCartId) -> Result<Events, LedgerError> {
        let index = self
            .saved_carts
            .iter()
            .position(|saved| saved.id == cart)
            .ok_or(LedgerError::SavedCartNotFound(cart))?;

        self.saved_carts.remove(index);

        if self.last_loaded == Some(cart) {
            self.last_loaded = None;
        }

        Ok(smallvec![LedgerEvent::SavedCartDeleted { cart }])
    }

    /// Replace the live cart with a saved cart's contents.
    ///
    /// Loading the cart that was last loaded, while the live cart still holds
    /// the same units per product, is a no-op reported as
    /// [`LedgerEvent::AlreadyLoaded`]. A non-empty live cart is pushed onto
    /// the history first so the replacement can be undone.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::SavedCartNotFound`]: unknown id.
    /// - [`LedgerError::InsufficientInventory`]: the pool, with the live cart
    ///   returned to it, cannot cover the saved quantities. Nothing changes.
    pub fn load_cart(&mut self, cart: SavedCartId) -> Result<Events, LedgerError> {
        let saved = self
            .saved_cart(cart)
            .ok_or(LedgerError::SavedCartNotFound(cart))?;

        if self.last_loaded == Some(cart) && self.cart.quantities() == saved.quantities() {
            return Ok(smallvec![LedgerEvent::AlreadyLoaded { cart }]);
        }

        let mut scratch = self.pool.clone();

        for item in self.cart.iter() {
            scratch.release(item.product, item.quantity);
        }

        reserve_all(&mut scratch, saved.items())?;

        let replacement = Cart::with_items(
            saved
                .items()
                .iter()
                .map(CartLineItem::duplicate)
                .collect::<Vec<_>>(),
        );

        let products = distinct_products(saved.items());

        if !self.cart.is_empty() {
            self.history.push(HistorySnapshot {
                cart: self.cart.clone(),
                pool: self.pool.clone(),
                last_loaded: self.last_loaded,
            });
        }

        let mut events: Events = smallvec![LedgerEvent::CartLoaded { cart }];

        self.commit(replacement, scratch, &mut events);
        self.last_loaded = Some(cart);

        for product in products {
            self.fulfil_watch(product, &mut events);
        }

        Ok(events)
    }

    /// Merge a saved cart's items into the live cart without replacing it.
    ///
    /// Items are visited in stored order. Each is reserved only if the pool
    /// covers its whole quantity, merging into the first line holding the same
    /// product or appending a new line; the rest are skipped and counted.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::SavedCartNotFound`]: unknown id.
    /// - [`LedgerError::InsufficientInventory`]: every item was skipped.
    pub fn add_cart_items(&mut self, cart: SavedCartId) -> Result<Events, LedgerError> {
        let saved = self
            .saved_cart(cart)
            .ok_or(LedgerError::SavedCartNotFound(cart))?;

        let mut pool = self.pool.clone();
        let mut merged = self.cart.clone();
        let mut added = Vec::new();
        let mut first_shortfall = None;
        let mut skipped = 0;

        for item in saved.items() {
            if !pool.reserve(item.product, item.quantity) {
                skipped += 1;

                if first_shortfall.is_none() {
                    first_shortfall = Some(LedgerError::InsufficientInventory {
                        product: item.product,
                        required: item.quantity,
                        available: pool.available(item.product),
                    });
                }

                continue;
            }

            if let Some(existing) = merged.find_product_mut(item.product) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                merged.push(item.duplicate());
            }

            added.push(item.product);
        }

        if added.is_empty()
            && let Some(error) = first_shortfall
        {
            return Err(error);
        }

        let mut events: Events = smallvec![LedgerEvent::CartItemsMerged {
            cart,
            added: added.len(),
            skipped,
        }];

        self.commit(merged, pool, &mut events);

        for product in added {
            self.fulfil_watch(product, &mut events);
        }

        Ok(events)
    }
}

/// Reserve every item's quantity from `pool`, aggregated per product in
/// first-appearance order.
fn reserve_all(pool: &mut InventoryPool, items: &[CartLineItem]) -> Result<(), LedgerError> {
    let required = crate::cart::quantities(items);

    for product in distinct_products(items) {
        let units = required.get(&product).copied().unwrap_or(0);

        if !pool.reserve(product, units) {
            return Err(LedgerError::InsufficientInventory {
                product,
                required: units,
                available: pool.available(product),
            });
        }
    }

    Ok(())
}

fn distinct_products(items: &[CartLineItem]) -> Vec<ProductId> {
    let mut products: Vec<ProductId> = Vec::with_capacity(items.len());

    for item in items {
        if !products.contains(&item.product) {
            products.push(item.product);
        }
    }

    products
}
