//! Checkout

use jiff::Timestamp;
use smallvec::smallvec;

use crate::{
    cart::{Cart, total_price},
    errors::LedgerError,
    events::{Events, LedgerEvent},
    ledger::CartLedger,
    orders::{Order, OrderId},
};

impl CartLedger {
    /// Turn the live cart into an order.
    ///
    /// The reserved units are sold: the cart is emptied without returning
    /// them to the pool. Undo history is dropped, since its snapshots still
    /// count the sold units.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::EmptyCart`]: nothing to check out.
    /// - [`LedgerError::TotalOverflow`]: the order total does not fit.
    pub fn checkout(&mut self) -> Result<Events, LedgerError> {
        if self.cart.is_empty() {
            return Err(LedgerError::EmptyCart);
        }

        let total =
            total_price(self.cart.items(), self.currency).ok_or(LedgerError::TotalOverflow)?;

        let order = Order {
            id: OrderId::generate(),
            created_at: Timestamp::now(),
            items: self.cart.items().to_vec(),
            total,
        };

        let mut events: Events = smallvec![LedgerEvent::OrderPlaced { order: order.id }];
        let pool = self.pool.clone();

        self.commit(Cart::new(), pool, &mut events);
        self.orders.push(order);
        self.history.clear();
        self.last_loaded = None;

        Ok(events)
    }
}
