//! Debounced, fire-and-forget sync of snapshots to the persistence service.

use std::{sync::Arc, time::Duration};

use shopfront::snapshot::UserSnapshot;
use tokio::{sync::watch, task::JoinHandle, time::sleep};
use tracing::{debug, warn};

use crate::{
    auth::Session,
    persistence::PersistenceService,
    storefront::{Notifier, notifications::Notification},
};

/// Handle to the background task writing one user's snapshots.
#[derive(Debug)]
pub(crate) struct SyncHandle {
    sender: watch::Sender<Option<UserSnapshot>>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    pub(crate) fn spawn(
        session: Session,
        persistence: Arc<dyn PersistenceService>,
        debounce: Duration,
        notifier: Notifier,
    ) -> Self {
        let (sender, receiver) = watch::channel(None);

        let task = tokio::spawn(run(session, persistence, receiver, debounce, notifier));

        Self { sender, task }
    }

    /// Queue `snapshot`, superseding any snapshot not yet written.
    pub(crate) fn schedule(&self, snapshot: UserSnapshot) {
        self.sender.send_replace(Some(snapshot));
    }

    /// Write any pending snapshot immediately and stop the task.
    pub(crate) async fn flush(self) -> Result<(), tokio::task::JoinError> {
        drop(self.sender);

        self.task.await
    }
}

async fn run(
    session: Session,
    persistence: Arc<dyn PersistenceService>,
    mut receiver: watch::Receiver<Option<UserSnapshot>>,
    debounce: Duration,
    notifier: Notifier,
) {
    let user = session.user.id;

    while receiver.changed().await.is_ok() {
        // Wait for a quiet period; a closed channel flushes right away.
        loop {
            tokio::select! {
                () = sleep(debounce) => break,
                changed = receiver.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        let pending = receiver.borrow_and_update().clone();

        let Some(snapshot) = pending else {
            continue;
        };

        match persistence.replace_all(&session, &snapshot).await {
            Ok(()) => {
                debug!(%user, "storefront state synced");
                notifier.send(Notification::Synced);
            }
            Err(error) => {
                warn!(%user, %error, "storefront sync failed");
                notifier.send(Notification::SyncFailed(error.to_string()));
            }
        }
    }

    debug!(%user, "sync worker stopped");
}
