//! History / Undo Stack

use std::collections::VecDeque;

use crate::{cart::Cart, inventory::InventoryPool, saved::SavedCartId};

/// Default number of snapshots retained.
pub const DEFAULT_HISTORY_DEPTH: usize = 20;

/// State captured before a destructive cart replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    /// Cart before the replacement
    pub cart: Cart,

    /// Pool before the replacement
    pub pool: InventoryPool,

    /// Saved cart that was last loaded before the replacement
    pub last_loaded: Option<SavedCartId>,
}

/// Bounded stack of snapshots; the oldest is dropped once full.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    snapshots: VecDeque<HistorySnapshot>,
    depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_depth(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    /// Create a stack retaining at most `depth` snapshots (at least one).
    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            depth: depth.max(1),
        }
    }

    /// Push a snapshot, evicting the oldest when full.
    pub fn push(&mut self, snapshot: HistorySnapshot) {
        if self.snapshots.len() == self.depth {
            self.snapshots.pop_front();
        }

        self.snapshots.push_back(snapshot);
    }

    /// Pop the most recent snapshot.
    pub fn pop(&mut self) -> Option<HistorySnapshot> {
        self.snapshots.pop_back()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Maximum number of snapshots retained.
    pub fn depth(&self) -> usize {
        self.depth
    }
}
