//! Auth errors.

use thiserror::Error;

/// Errors raised by an authentication provider.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-2xx response or unexpected body.
    #[error("unexpected response from auth provider: {0}")]
    UnexpectedResponse(String),
}
