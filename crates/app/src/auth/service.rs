//! Auth provider trait.

use async_trait::async_trait;
use mockall::automock;

use crate::auth::{AuthError, Credentials, Session, User};

#[automock]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign in with an existing account.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Create an account and sign in to it.
    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The signed-in user, if any.
    async fn current_user(&self) -> Option<User>;
}
