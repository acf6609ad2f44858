//! Ledger Events
//!
//! Every committed ledger operation reports what happened as a list of events.
//! A presentation layer decides how (or whether) to surface them.

use smallvec::SmallVec;

use crate::{
    cart::LineItemId,
    orders::OrderId,
    products::ProductId,
    saved::{SavedCartId, SavedItemId},
};

/// Events produced by a single operation.
pub type Events = SmallVec<[LedgerEvent; 2]>;

/// Something observable that happened to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A unit was added, either as a new line or merged into an existing one.
    AddedToCart {
        /// Line that received the unit
        line: LineItemId,
        /// Product added
        product: ProductId,
        /// Line quantity after the add
        quantity: u32,
    },

    /// A line's quantity was set.
    QuantityUpdated {
        /// Line updated
        line: LineItemId,
        /// New quantity
        quantity: u32,
    },

    /// A line was removed and its units returned to the pool.
    RemovedFromCart {
        /// Line removed
        line: LineItemId,
        /// Product whose units were returned
        product: ProductId,
        /// Units returned
        quantity: u32,
    },

    /// Every line was removed.
    CartCleared,

    /// A line was parked in saved-for-later.
    SavedForLater {
        /// Cart line that was removed
        line: LineItemId,
        /// New saved-for-later item
        item: SavedItemId,
    },

    /// A saved-for-later item was moved back into the cart.
    MovedBackToCart {
        /// Saved item consumed
        item: SavedItemId,
        /// Line that received the units
        line: LineItemId,
    },

    /// A saved-for-later item was discarded.
    SavedForLaterRemoved {
        /// Saved item removed
        item: SavedItemId,
    },

    /// The live cart was frozen into a saved cart.
    CartSaved {
        /// New saved cart
        cart: SavedCartId,
    },

    /// A saved cart was deleted.
    SavedCartDeleted {
        /// Deleted saved cart
        cart: SavedCartId,
    },

    /// A saved cart replaced the live cart.
    CartLoaded {
        /// Saved cart loaded
        cart: SavedCartId,
    },

    /// The saved cart is already loaded with identical content; nothing changed.
    AlreadyLoaded {
        /// Saved cart requested
        cart: SavedCartId,
    },

    /// A saved cart's items were merged into the live cart.
    CartItemsMerged {
        /// Saved cart merged
        cart: SavedCartId,
        /// Saved items reserved into the cart
        added: usize,
        /// Saved items skipped for lack of stock
        skipped: usize,
    },

    /// The most recent cart replacement was undone.
    Undone,

    /// Undo was requested with an empty history.
    NothingToUndo,

    /// A product was added to the watch list.
    Watching {
        /// Watched product
        product: ProductId,
    },

    /// The product was already on the watch list; nothing changed.
    AlreadyWatching {
        /// Watched product
        product: ProductId,
    },

    /// A product was removed from the watch list by the shopper.
    Unwatched {
        /// Product no longer watched
        product: ProductId,
    },

    /// A watched product was added to the cart, so the watch was dropped.
    WatchFulfilled {
        /// Product no longer watched
        product: ProductId,
    },

    /// A watched product went from zero to positive availability.
    BackInStock {
        /// Restocked product
        product: ProductId,
        /// Name from the watch entry
        display_name: String,
        /// Units now available
        available: u32,
    },

    /// Units were added to the pool from outside the cart.
    Restocked {
        /// Restocked product
        product: ProductId,
        /// Units available after the restock
        available: u32,
    },

    /// Checkout completed and the cart was emptied.
    OrderPlaced {
        /// New order
        order: OrderId,
    },
}
