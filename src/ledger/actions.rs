//! Ledger actions
//!
//! Every mutating operation as a value, so callers can thread the ledger
//! through `(state, action) -> (state, events)`.

use rusty_money::{Money, iso::Currency};

use crate::{
    cart::LineItemId,
    errors::LedgerError,
    events::Events,
    inventory::InventoryPool,
    ledger::CartLedger,
    products::ProductId,
    saved::{SavedCartId, SavedItemId},
};

/// A mutating ledger operation.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerAction {
    /// See [`CartLedger::add_to_cart`].
    AddToCart {
        /// Product to add
        product: ProductId,
        /// Price of one unit
        unit_price: Money<'static, Currency>,
        /// Optional variant label
        variant: Option<String>,
    },

    /// See [`CartLedger::update_quantity`].
    UpdateQuantity {
        /// Line to update
        line: LineItemId,
        /// New quantity
        quantity: u32,
    },

    /// See [`CartLedger::remove_from_cart`].
    RemoveFromCart {
        /// Line to remove
        line: LineItemId,
    },

    /// See [`CartLedger::clear_cart`].
    ClearCart,

    /// See [`CartLedger::move_to_saved_for_later`].
    MoveToSavedForLater {
        /// Line to park
        line: LineItemId,
    },

    /// See [`CartLedger::move_back_to_cart`].
    MoveBackToCart {
        /// Saved item to restore
        item: SavedItemId,
    },

    /// See [`CartLedger::remove_saved_for_later`].
    RemoveSavedForLater {
        /// Saved item to discard
        item: SavedItemId,
    },

    /// See [`CartLedger::save_cart`].
    SaveCart {
        /// Name for the saved cart
        name: String,
    },

    /// See [`CartLedger::delete_saved_cart`].
    DeleteSavedCart {
        /// Saved cart to delete
        cart: SavedCartId,
    },

    /// See [`CartLedger::load_cart`].
    LoadCart {
        /// Saved cart to load
        cart: SavedCartId,
    },

    /// See [`CartLedger::add_cart_items`].
    AddCartItems {
        /// Saved cart to merge
        cart: SavedCartId,
    },

    /// See [`CartLedger::undo`].
    Undo,

    /// See [`CartLedger::watch`].
    Watch {
        /// Product to watch
        product: ProductId,
        /// Name shown in notifications
        display_name: String,
        /// Current price
        last_known_price: Money<'static, Currency>,
    },

    /// See [`CartLedger::unwatch`].
    Unwatch {
        /// Product to stop watching
        product: ProductId,
    },

    /// See [`CartLedger::on_inventory_changed`].
    InventoryChanged {
        /// Replacement pool
        pool: InventoryPool,
    },

    /// See [`CartLedger::restock`].
    Restock {
        /// Product restocked
        product: ProductId,
        /// Units added
        units: u32,
    },

    /// See [`CartLedger::checkout`].
    Checkout,
}

impl CartLedger {
    /// Apply `action` in place.
    ///
    /// # Errors
    ///
    /// Returns the operation's [`LedgerError`]; the ledger is unchanged on error.
    pub fn dispatch(&mut self, action: LedgerAction) -> Result<Events, LedgerError> {
        match action {
            LedgerAction::AddToCart {
                product,
                unit_price,
                variant,
            } => self.add_to_cart(product, unit_price, variant.as_deref()),
            LedgerAction::UpdateQuantity { line, quantity } => {
                self.update_quantity(line, quantity)
            }
            LedgerAction::RemoveFromCart { line } => self.remove_from_cart(line),
            LedgerAction::ClearCart => Ok(self.clear_cart()),
            LedgerAction::MoveToSavedForLater { line } => self.move_to_saved_for_later(line),
            LedgerAction::MoveBackToCart { item } => self.move_back_to_cart(item),
            LedgerAction::RemoveSavedForLater { item } => self.remove_saved_for_later(item),
            LedgerAction::SaveCart { name } => self.save_cart(&name),
            LedgerAction::DeleteSavedCart { cart } => self.delete_saved_cart(cart),
            LedgerAction::LoadCart { cart } => self.load_cart(cart),
            LedgerAction::AddCartItems { cart } => self.add_cart_items(cart),
            LedgerAction::Undo => Ok(self.undo()),
            LedgerAction::Watch {
                product,
                display_name,
                last_known_price,
            } => self.watch(product, &display_name, last_known_price),
            LedgerAction::Unwatch { product } => self.unwatch(product),
            LedgerAction::InventoryChanged { pool } => Ok(self.on_inventory_changed(pool)),
            LedgerAction::Restock { product, units } => Ok(self.restock(product, units)),
            LedgerAction::Checkout => self.checkout(),
        }
    }

    /// Apply `action` to a copy of the ledger, returning the new state and its events.
    ///
    /// # Errors
    ///
    /// Returns the operation's [`LedgerError`].
    pub fn apply(&self, action: LedgerAction) -> Result<(Self, Events), LedgerError> {
        let mut next = self.clone();
        let events = next.dispatch(action)?;

        Ok((next, events))
    }
}
