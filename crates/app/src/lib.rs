//! Storefront application: auth, remote persistence and background sync
//! around the shopfront ledger.

pub mod auth;
pub mod config;
pub mod observability;
pub mod persistence;
pub mod storefront;
