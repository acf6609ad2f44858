//! Shopfront
//!
//! Cart/inventory ledger for a client-side storefront: a live cart, the
//! inventory pool it reserves from, and the saved-for-later, saved cart and
//! stock watch views kept consistent with both.

pub mod cart;
pub mod catalog;
pub mod errors;
pub mod events;
pub mod history;
pub mod inventory;
pub mod ledger;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod saved;
pub mod snapshot;
pub mod uuids;
pub mod watch;
