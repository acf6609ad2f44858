//! Cart/Inventory Ledger
//!
//! The live cart, the inventory pool and the views derived from them, held as
//! one value. Every operation validates against a tentative copy of the cart
//! and pool and commits both together, so for every product
//! `pool.available(p) + cart.reserved(p)` only changes through explicit
//! inventory updates or checkout.

use rusty_money::{Money, iso::Currency};
use smallvec::smallvec;

use crate::{
    cart::Cart,
    errors::LedgerError,
    events::{Events, LedgerEvent},
    history::History,
    inventory::InventoryPool,
    orders::Order,
    products::ProductId,
    saved::{SavedCart, SavedCartId, SavedForLaterItem, SavedItemId},
    watch::StockWatch,
};

mod actions;
mod checkout;
mod reservation;
mod saved_carts;
mod stock_watch;

pub use actions::LedgerAction;

/// Cart, inventory pool and derived collections for one shopper.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLedger {
    currency: &'static Currency,
    cart: Cart,
    pool: InventoryPool,
    saved_for_later: Vec<SavedForLaterItem>,
    saved_carts: Vec<SavedCart>,
    watch: StockWatch,
    history: History,
    orders: Vec<Order>,
    last_loaded: Option<SavedCartId>,
}

impl CartLedger {
    /// Create a ledger with an empty cart over the given pool.
    #[must_use]
    pub fn new(pool: InventoryPool, currency: &'static Currency) -> Self {
        Self::with_history(pool, currency, History::default())
    }

    /// Create a ledger with a custom undo history.
    #[must_use]
    pub fn with_history(
        pool: InventoryPool,
        currency: &'static Currency,
        history: History,
    ) -> Self {
        Self {
            currency,
            cart: Cart::new(),
            pool,
            saved_for_later: Vec::new(),
            saved_carts: Vec::new(),
            watch: StockWatch::new(),
            history,
            orders: Vec::new(),
            last_loaded: None,
        }
    }

    /// Currency every price in the ledger is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The live cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The inventory pool.
    pub fn pool(&self) -> &InventoryPool {
        &self.pool
    }

    /// Units of `product` that can still be reserved.
    pub fn available(&self, product: ProductId) -> u32 {
        self.pool.available(product)
    }

    /// Units of `product` known to the ledger: available plus reserved.
    pub fn units_known(&self, product: ProductId) -> u32 {
        self.pool
            .available(product)
            .saturating_add(self.cart.reserved(product))
    }

    /// Items parked for later, oldest first.
    pub fn saved_for_later(&self) -> &[SavedForLaterItem] {
        &self.saved_for_later
    }

    /// Get a saved-for-later item by id.
    pub fn saved_item(&self, id: SavedItemId) -> Option<&SavedForLaterItem> {
        self.saved_for_later.iter().find(|item| item.id == id)
    }

    /// Saved carts, oldest first.
    pub fn saved_carts(&self) -> &[SavedCart] {
        &self.saved_carts
    }

    /// Get a saved cart by id.
    pub fn saved_cart(&self, id: SavedCartId) -> Option<&SavedCart> {
        self.saved_carts.iter().find(|cart| cart.id == id)
    }

    /// The stock watch list.
    pub fn watch_list(&self) -> &StockWatch {
        &self.watch
    }

    /// Undo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Placed orders, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Saved cart most recently loaded into the live cart.
    pub fn last_loaded(&self) -> Option<SavedCartId> {
        self.last_loaded
    }

    /// Subtotal of the live cart.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::TotalOverflow`] if the total does not fit.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, LedgerError> {
        crate::cart::total_price(self.cart.items(), self.currency).ok_or(LedgerError::TotalOverflow)
    }

    /// Undo the most recent cart replacement.
    ///
    /// Reports [`LedgerEvent::NothingToUndo`] when the history is empty.
    pub fn undo(&mut self) -> Events {
        let Some(snapshot) = self.history.pop() else {
            return smallvec![LedgerEvent::NothingToUndo];
        };

        let mut events: Events = smallvec![LedgerEvent::Undone];

        self.commit(snapshot.cart, snapshot.pool, &mut events);
        self.last_loaded = snapshot.last_loaded;

        events
    }

    /// Replace the cart and pool as one pair, reporting watched products that
    /// came back into stock.
    fn commit(&mut self, cart: Cart, pool: InventoryPool, events: &mut Events) {
        for entry in self.watch.sync(&self.pool, &pool) {
            events.push(LedgerEvent::BackInStock {
                product: entry.product,
                display_name: entry.display_name,
                available: entry.available,
            });
        }

        self.cart = cart;
        self.pool = pool;
    }

    fn check_price(&self, price: &Money<'static, Currency>) -> Result<(), LedgerError> {
        if price.currency() != self.currency {
            return Err(LedgerError::CurrencyMismatch(
                price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let minor = price.to_minor_units();

        if minor < 0 {
            return Err(LedgerError::InvalidPrice(minor));
        }

        Ok(())
    }

    pub(crate) fn restore_parts(
        &mut self,
        saved_for_later: Vec<SavedForLaterItem>,
        saved_carts: Vec<SavedCart>,
        watch: StockWatch,
        orders: Vec<Order>,
    ) {
        self.saved_for_later = saved_for_later;
        self.saved_carts = saved_carts;
        self.watch = watch;
        self.orders = orders;
        self.last_loaded = None;
        self.history.clear();
    }

    pub(crate) fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub(crate) fn pool_mut(&mut self) -> &mut InventoryPool {
        &mut self.pool
    }
}
