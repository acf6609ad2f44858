//! Sync errors.

use thiserror::Error;

/// A call to the remote persistence service failed.
///
/// Local state stays the source of truth until the next successful sync.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-2xx response or unexpected body.
    #[error("unexpected response from persistence service: {0}")]
    UnexpectedResponse(String),
}
