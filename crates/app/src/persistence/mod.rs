//! Remote persistence mirror

mod errors;
pub mod rest;
mod service;

pub use errors::SyncError;
pub use rest::RestPersistence;
pub use service::*;
