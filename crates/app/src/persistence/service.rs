//! Persistence service trait.

use async_trait::async_trait;
use mockall::automock;
use shopfront::snapshot::UserSnapshot;

use crate::{auth::Session, persistence::SyncError};

/// Durable mirror of each user's storefront state.
///
/// Writes replace everything stored for the user; the last writer wins.
#[automock]
#[async_trait]
pub trait PersistenceService: Send + Sync {
    /// Load everything stored for the session's user. Unknown users load as empty.
    async fn load_all(&self, session: &Session) -> Result<UserSnapshot, SyncError>;

    /// Replace everything stored for the session's user with `snapshot`.
    async fn replace_all(&self, session: &Session, snapshot: &UserSnapshot) -> Result<(), SyncError>;
}
