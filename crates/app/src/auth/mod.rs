//! Authentication

mod errors;
mod models;
pub mod rest;
mod service;

pub use errors::*;
pub use models::*;
pub use rest::RestAuthProvider;
pub use service::*;
