//! Ledger Errors

use thiserror::Error;

use crate::{
    cart::LineItemId,
    products::ProductId,
    saved::{SavedCartId, SavedItemId},
};

/// Reasons a ledger operation was rejected.
///
/// A rejected operation never mutates the ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No units of the product are available to add.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    /// The requested quantity exceeds what is available for this line.
    #[error("requested {requested} of product {product}, but only {available} can be reserved")]
    InventoryLimitExceeded {
        /// Product on the line
        product: ProductId,
        /// Quantity requested
        requested: u32,
        /// Units available for the line (pool plus current quantity)
        available: u32,
    },

    /// Not enough stock to satisfy a saved cart or saved-for-later item.
    #[error("insufficient inventory for product {product}: need {required}, have {available}")]
    InsufficientInventory {
        /// First product found short
        product: ProductId,
        /// Units needed
        required: u32,
        /// Units available
        available: u32,
    },

    /// Only out-of-stock products can be watched.
    #[error("product {0} is in stock and cannot be watched")]
    InvalidWatchTarget(ProductId),

    /// Quantities must be at least one.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    /// Prices must not be negative.
    #[error("unit price must not be negative, got {0} minor units")]
    InvalidPrice(i64),

    /// A price was given in a currency other than the ledger's.
    #[error("price has currency {0}, but the ledger uses {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// The operation needs a non-empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Totals overflowed the money representation.
    #[error("cart total overflowed")]
    TotalOverflow,

    /// No cart line has this id.
    #[error("line item {0} not found")]
    LineItemNotFound(LineItemId),

    /// No saved-for-later item has this id.
    #[error("saved item {0} not found")]
    SavedItemNotFound(SavedItemId),

    /// No saved cart has this id.
    #[error("saved cart {0} not found")]
    SavedCartNotFound(SavedCartId),

    /// The product is not on the watch list.
    #[error("product {0} is not being watched")]
    WatchNotFound(ProductId),
}
