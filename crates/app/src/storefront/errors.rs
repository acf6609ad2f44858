//! Storefront errors.

use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("authentication failed")]
    Auth(#[from] AuthError),

    #[error("sync worker stopped unexpectedly")]
    SyncWorker(#[from] tokio::task::JoinError),
}
