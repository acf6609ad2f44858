//! Notifications surfaced to the presentation layer.

use shopfront::{errors::LedgerError, events::LedgerEvent, products::ProductId};

/// Something the shopper may want to hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A ledger operation succeeded with this event.
    Ledger(LedgerEvent),

    /// A ledger operation was rejected; nothing changed.
    Rejected(LedgerError),

    /// The mirrored cart was restored at sign-in.
    CartRestored {
        /// Lines reserved again
        restored: usize,
        /// Products whose lines could not be reserved
        dropped: Vec<ProductId>,
    },

    /// Local state was written to the backend.
    Synced,

    /// Writing to or reading from the backend failed; local state is kept.
    SyncFailed(String),
}
