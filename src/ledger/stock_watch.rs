//! Stock watch: watching sold-out products and reacting to inventory changes.

use rusty_money::{Money, iso::Currency};
use smallvec::smallvec;

use crate::{
    errors::LedgerError,
    events::{Events, LedgerEvent},
    inventory::InventoryPool,
    ledger::CartLedger,
    products::ProductId,
    watch::StockWatchEntry,
};

impl CartLedger {
    /// Start watching a sold-out product.
    ///
    /// Watching a product twice is not an error; it reports
    /// [`LedgerEvent::AlreadyWatching`] and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidWatchTarget`] if the product has stock,
    /// or a price error if `last_known_price` is negative or in another
    /// currency.
    pub fn watch(
        &mut self,
        product: ProductId,
        display_name: &str,
        last_known_price: Money<'static, Currency>,
    ) -> Result<Events, LedgerError> {
        if self.watch.contains(product) {
            return Ok(smallvec![LedgerEvent::AlreadyWatching { product }]);
        }

        self.check_price(&last_known_price)?;

        let available = self.pool.available(product);

        if available > 0 {
            return Err(LedgerError::InvalidWatchTarget(product));
        }

        self.watch.push(StockWatchEntry {
            product,
            display_name: display_name.to_string(),
            last_known_price,
            available,
        });

        Ok(smallvec![LedgerEvent::Watching { product }])
    }

    /// Stop watching a product.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::WatchNotFound`] if the product is not watched.
    pub fn unwatch(&mut self, product: ProductId) -> Result<Events, LedgerError> {
        self.watch
            .remove(product)
            .ok_or(LedgerError::WatchNotFound(product))?;

        Ok(smallvec![LedgerEvent::Unwatched { product }])
    }

    /// Adopt an externally updated pool, e.g. after a catalog refresh.
    ///
    /// Emits one [`LedgerEvent::BackInStock`] per watched product whose
    /// availability went from zero to positive. Watches stay in place. Undo
    /// history is dropped, since its snapshots hold the previous stock.
    pub fn on_inventory_changed(&mut self, pool: InventoryPool) -> Events {
        let mut events = Events::new();
        let cart = self.cart.clone();

        self.commit(cart, pool, &mut events);
        self.history.clear();

        events
    }

    /// Add `units` of `product` to the pool from outside the cart.
    ///
    /// Drops undo history like [`CartLedger::on_inventory_changed`].
    pub fn restock(&mut self, product: ProductId, units: u32) -> Events {
        let mut pool = self.pool.clone();
        pool.release(product, units);

        let mut events: Events = smallvec![LedgerEvent::Restocked {
            product,
            available: pool.available(product),
        }];
        let cart = self.cart.clone();

        self.commit(cart, pool, &mut events);
        self.history.clear();

        events
    }

    /// Drop the watch on a product the shopper just reserved.
    pub(crate) fn fulfil_watch(&mut self, product: ProductId, events: &mut Events) {
        if self.watch.remove(product).is_some() {
            events.push(LedgerEvent::WatchFulfilled { product });
        }
    }
}
