//! Shopfront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLineItem, LineItemId},
    catalog::{Catalog, CatalogError},
    errors::LedgerError,
    events::{Events, LedgerEvent},
    history::{DEFAULT_HISTORY_DEPTH, History, HistorySnapshot},
    inventory::InventoryPool,
    ledger::{CartLedger, LedgerAction},
    orders::{Order, OrderId},
    pricing::{PriceError, parse_price},
    products::{Product, ProductId, ProductIdError, Variant},
    saved::{SavedCart, SavedCartId, SavedForLaterItem, SavedItemId},
    snapshot::{HydrationReport, SnapshotError, UserSnapshot},
    watch::{StockWatch, StockWatchEntry},
};
