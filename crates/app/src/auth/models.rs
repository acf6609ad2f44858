//! Auth data models.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use jiff::Timestamp;
use shopfront::uuids::TypedUuid;
use zeroize::Zeroizing;

/// User id
pub type UserId = TypedUuid<User>;

/// A signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
}

/// Email/password credentials. The password is wiped from memory on drop.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: Zeroizing<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated session.
#[derive(Clone)]
pub struct Session {
    pub user: User,

    /// Bearer token for the hosted backend.
    pub access_token: Zeroizing<String>,

    pub expires_at: Option<Timestamp>,
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
