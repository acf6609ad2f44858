//! Inventory reservation: adding, updating, removing and parking cart lines.

use rusty_money::{Money, iso::Currency};
use smallvec::smallvec;

use crate::{
    cart::{CartLineItem, LineItemId},
    errors::LedgerError,
    events::{Events, LedgerEvent},
    ledger::CartLedger,
    products::ProductId,
    saved::{SavedForLaterItem, SavedItemId},
};

impl CartLedger {
    /// Reserve one unit of `product` into the cart.
    ///
    /// A line with the same product and variant is incremented, otherwise a
    /// new line with quantity 1 is appended. A watch on the product is
    /// dropped as fulfilled.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::OutOfStock`]: no units are available.
    /// - [`LedgerError::CurrencyMismatch`] / [`LedgerError::InvalidPrice`]: bad unit price.
    pub fn add_to_cart(
        &mut self,
        product: ProductId,
        unit_price: Money<'static, Currency>,
        variant: Option<&str>,
    ) -> Result<Events, LedgerError> {
        self.check_price(&unit_price)?;

        let mut pool = self.pool.clone();

        if !pool.reserve(product, 1) {
            return Err(LedgerError::OutOfStock(product));
        }

        let mut cart = self.cart.clone();

        let (line, quantity) = if let Some(existing) = cart.find_mut(product, variant) {
            existing.quantity = existing.quantity.saturating_add(1);
            (existing.id, existing.quantity)
        } else {
            let line = CartLineItem::new(product, 1, unit_price, variant.map(str::to_string));
            let id = line.id;
            cart.push(line);
            (id, 1)
        };

        let mut events: Events = smallvec![LedgerEvent::AddedToCart {
            line,
            product,
            quantity,
        }];

        self.commit(cart, pool, &mut events);
        self.fulfil_watch(product, &mut events);

        Ok(events)
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::LineItemNotFound`]: unknown line.
    /// - [`LedgerError::InvalidQuantity`]: `quantity` is zero.
    /// - [`LedgerError::InventoryLimitExceeded`]: `quantity` exceeds the pool
    ///   plus the line's current quantity.
    pub fn update_quantity(
        &mut self,
        line: LineItemId,
        quantity: u32,
    ) -> Result<Events, LedgerError> {
        let current = self
            .cart
            .get(line)
            .ok_or(LedgerError::LineItemNotFound(line))?;

        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity(quantity));
        }

        let product = current.product;
        let available = self.pool.available(product).saturating_add(current.quantity);

        if quantity > available {
            return Err(LedgerError::InventoryLimitExceeded {
                product,
                requested: quantity,
                available,
            });
        }

        let mut cart = self.cart.clone();
        let mut pool = self.pool.clone();

        if let Some(item) = cart.get_mut(line) {
            item.quantity = quantity;
        }

        pool.set(product, available - quantity);

        let mut events: Events = smallvec![LedgerEvent::QuantityUpdated { line, quantity }];

        self.commit(cart, pool, &mut events);

        Ok(events)
    }

    /// Remove a line and return its full quantity to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::LineItemNotFound`] for an unknown line.
    pub fn remove_from_cart(&mut self, line: LineItemId) -> Result<Events, LedgerError> {
        let mut cart = self.cart.clone();
        let removed = cart.remove(line).ok_or(LedgerError::LineItemNotFound(line))?;

        let mut pool = self.pool.clone();
        pool.release(removed.product, removed.quantity);

        let mut events: Events = smallvec![LedgerEvent::RemovedFromCart {
            line,
            product: removed.product,
            quantity: removed.quantity,
        }];

        self.commit(cart, pool, &mut events);

        Ok(events)
    }

    /// Remove every line, returning all reserved units.
    pub fn clear_cart(&mut self) -> Events {
        let mut cart = self.cart.clone();
        let mut pool = self.pool.clone();

        for item in cart.take_items() {
            pool.release(item.product, item.quantity);
        }

        let mut events: Events = smallvec![LedgerEvent::CartCleared];

        self.commit(cart, pool, &mut events);

        events
    }

    /// Park a cart line in saved-for-later, returning its units to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::LineItemNotFound`] for an unknown line.
    pub fn move_to_saved_for_later(&mut self, line: LineItemId) -> Result<Events, LedgerError> {
        let mut cart = self.cart.clone();
        let removed = cart.remove(line).ok_or(LedgerError::LineItemNotFound(line))?;

        let mut pool = self.pool.clone();
        pool.release(removed.product, removed.quantity);

        let saved = SavedForLaterItem::from(removed);

        let mut events: Events = smallvec![LedgerEvent::SavedForLater {
            line,
            item: saved.id,
        }];

        self.commit(cart, pool, &mut events);
        self.saved_for_later.push(saved);

        Ok(events)
    }

    /// Move a saved-for-later item back into the cart, reserving its quantity again.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::SavedItemNotFound`]: unknown saved item.
    /// - [`LedgerError::InsufficientInventory`]: the pool can no longer cover
    ///   the saved quantity.
    pub fn move_back_to_cart(&mut self, item: SavedItemId) -> Result<Events, LedgerError> {
        let saved = self
            .saved_item(item)
            .ok_or(LedgerError::SavedItemNotFound(item))?;

        let mut pool = self.pool.clone();

        if !pool.reserve(saved.product, saved.quantity) {
            return Err(LedgerError::InsufficientInventory {
                product: saved.product,
                required: saved.quantity,
                available: pool.available(saved.product),
            });
        }

        let product = saved.product;
        let mut cart = self.cart.clone();

        let line = if let Some(existing) = cart.find_mut(product, saved.variant.as_deref()) {
            existing.quantity = existing.quantity.saturating_add(saved.quantity);
            existing.id
        } else {
            let line = CartLineItem::from(saved);
            let id = line.id;
            cart.push(line);
            id
        };

        let mut events: Events = smallvec![LedgerEvent::MovedBackToCart { item, line }];

        self.commit(cart, pool, &mut events);
        self.saved_for_later.retain(|saved| saved.id != item);
        self.fulfil_watch(product, &mut events);

        Ok(events)
    }

    /// Discard a saved-for-later item.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::SavedItemNotFound`] for an unknown item.
    pub fn remove_saved_for_later(&mut self, item: SavedItemId) -> Result<Events, LedgerError> {
        let index = self
            .saved_for_later
            .iter()
            .position(|saved| saved.id == item)
            .ok_or(LedgerError::SavedItemNotFound(item))?;

        self.saved_for_later.remove(index);

        Ok(smallvec![LedgerEvent::SavedForLaterRemoved { item }])
    }
}
