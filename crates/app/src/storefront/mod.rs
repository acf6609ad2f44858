//! Storefront session
//!
//! Owns the shopper's [`CartLedger`], applies actions to it, and mirrors every
//! change to the persistence service in the background while a user is signed
//! in. Local state is authoritative: sync failures are reported, never rolled
//! back.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::Duration,
};

use shopfront::{
    errors::LedgerError,
    events::Events,
    ledger::{CartLedger, LedgerAction},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::{
    auth::{AuthError, AuthProvider, Credentials, Session, User},
    persistence::PersistenceService,
};

mod errors;
mod notifications;
mod sync;

pub use errors::StorefrontError;
pub use notifications::Notification;

use sync::SyncHandle;

/// Sends notifications to whoever holds the receiver, if anyone still does.
#[derive(Debug, Clone)]
pub(crate) struct Notifier(UnboundedSender<Notification>);

impl Notifier {
    pub(crate) fn send(&self, notification: Notification) {
        // A dropped receiver means nobody is listening any more.
        let _sent = self.0.send(notification);
    }
}

/// A shopper's storefront: the ledger plus auth and background sync.
pub struct Storefront {
    ledger: CartLedger,
    initial: CartLedger,
    auth: Arc<dyn AuthProvider>,
    persistence: Arc<dyn PersistenceService>,
    notifier: Notifier,
    debounce: Duration,
    session: Option<Session>,
    sync: Option<SyncHandle>,
}

impl Debug for Storefront {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Storefront")
            .field("ledger", &self.ledger)
            .field("session", &self.session)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Create a signed-out storefront over `ledger`.
    ///
    /// Signing out resets the ledger to this initial state.
    pub fn new(
        ledger: CartLedger,
        auth: Arc<dyn AuthProvider>,
        persistence: Arc<dyn PersistenceService>,
        debounce: Duration,
    ) -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let storefront = Self {
            initial: ledger.clone(),
            ledger,
            auth,
            persistence,
            notifier: Notifier(sender),
            debounce,
            session: None,
            sync: None,
        };

        (storefront, receiver)
    }

    /// The current ledger state.
    pub fn ledger(&self) -> &CartLedger {
        &self.ledger
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    /// Apply `action` to the ledger.
    ///
    /// Events and rejections are also sent as notifications. When signed in,
    /// a successful action schedules a sync of the new state.
    ///
    /// # Errors
    ///
    /// Returns the action's [`LedgerError`]; the ledger is unchanged on error.
    pub fn dispatch(&mut self, action: LedgerAction) -> Result<Events, LedgerError> {
        match self.ledger.dispatch(action) {
            Ok(events) => {
                for event in &events {
                    self.notifier.send(Notification::Ledger(event.clone()));
                }

                self.schedule_sync();

                Ok(events)
            }
            Err(error) => {
                self.notifier.send(Notification::Rejected(error.clone()));

                Err(error)
            }
        }
    }

    /// Sign in, restore the mirrored state and start syncing.
    ///
    /// A failed load keeps the local state and reports
    /// [`Notification::SyncFailed`]; signing in still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Auth`] if the credentials are rejected.
    pub async fn sign_in(&mut self, credentials: &Credentials) -> Result<User, StorefrontError> {
        self.stop_sync().await?;

        let session = self.auth.sign_in(credentials).await?;

        self.restore(&session).await;

        Ok(self.start(session))
    }

    /// Create an account, sign in to it and start syncing the current state.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Auth`] if the account cannot be created.
    pub async fn sign_up(&mut self, credentials: &Credentials) -> Result<User, StorefrontError> {
        self.stop_sync().await?;

        let session = self.auth.sign_up(credentials).await?;
        let user = self.start(session);

        self.schedule_sync();

        Ok(user)
    }

    /// Flush pending changes, end the session and reset to the initial state.
    ///
    /// The local session and ledger are reset even when flushing or the
    /// provider call fails.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Auth`] if nobody is signed in or the
    /// provider fails to end the session, and
    /// [`StorefrontError::SyncWorker`] if the sync worker panicked.
    pub async fn sign_out(&mut self) -> Result<(), StorefrontError> {
        let Some(session) = self.session.take() else {
            return Err(AuthError::NotSignedIn.into());
        };

        let flushed = self.stop_sync().await;
        let ended = self.auth.sign_out().await;

        self.ledger = self.initial.clone();

        if let Err(error) = &ended {
            warn!(user = %session.user.id, %error, "provider failed to end session");
        }

        info!(user = %session.user.id, "signed out");

        flushed?;
        ended?;

        Ok(())
    }

    /// Ask the auth provider who is signed in.
    pub async fn current_user(&self) -> Option<User> {
        self.auth.current_user().await
    }

    async fn restore(&mut self, session: &Session) {
        let snapshot = match self.persistence.load_all(session).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(user = %session.user.id, %error, "failed to load storefront state");
                self.notifier.send(Notification::SyncFailed(error.to_string()));

                return;
            }
        };

        if snapshot.is_empty() {
            return;
        }

        match self.ledger.hydrate(&snapshot) {
            Ok(report) => {
                info!(
                    user = %session.user.id,
                    restored = report.restored,
                    dropped = report.dropped.len(),
                    discarded = report.discarded,
                    "restored storefront state"
                );
                self.notifier.send(Notification::CartRestored {
                    restored: report.restored,
                    dropped: report.dropped,
                });
            }
            Err(error) => {
                warn!(user = %session.user.id, %error, "stored storefront state rejected");
                self.notifier.send(Notification::SyncFailed(error.to_string()));
            }
        }
    }

    fn start(&mut self, session: Session) -> User {
        let user = session.user.clone();

        self.sync = Some(SyncHandle::spawn(
            session.clone(),
            Arc::clone(&self.persistence),
            self.debounce,
            self.notifier.clone(),
        ));
        self.session = Some(session);

        info!(user = %user.id, "signed in");

        user
    }

    fn schedule_sync(&self) {
        if let Some(sync) = &self.sync {
            sync.schedule(self.ledger.snapshot());
        }
    }

    async fn stop_sync(&mut self) -> Result<(), StorefrontError> {
        if let Some(sync) = self.sync.take() {
            sync.flush().await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{Currency, GBP},
    };
    use shopfront::{
        events::LedgerEvent, inventory::InventoryPool, products::ProductId,
        snapshot::UserSnapshot,
    };
    use testresult::TestResult;
    use uuid::Uuid;
    use zeroize::Zeroizing;

    use super::*;
    use crate::{
        auth::{MockAuthProvider, UserId},
        persistence::{MockPersistenceService, SyncError},
    };

    const DEBOUNCE: Duration = Duration::from_millis(500);

    fn price() -> Money<'static, Currency> {
        Money::from_minor(1_250, GBP)
    }

    fn ledger() -> CartLedger {
        CartLedger::new(InventoryPool::from([(1, 3), (2, 1)]), GBP)
    }

    fn session() -> Session {
        Session {
            user: User {
                id: UserId::from_uuid(Uuid::now_v7()),
                email: "shopper@example.com".to_string(),
            },
            access_token: Zeroizing::new("jwt".to_string()),
            expires_at: None,
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("shopper@example.com", "hunter2")
    }

    fn signing_in(session: Session) -> MockAuthProvider {
        let mut auth = MockAuthProvider::new();

        auth.expect_sign_in()
            .once()
            .return_once(move |_| Ok(session));

        auth
    }

    fn add(product: u64) -> LedgerAction {
        LedgerAction::AddToCart {
            product: ProductId::new(product),
            unit_price: price(),
            variant: None,
        }
    }

    fn drain(receiver: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
        let mut notifications = Vec::new();

        while let Ok(notification) = receiver.try_recv() {
            notifications.push(notification);
        }

        notifications
    }

    #[tokio::test]
    async fn signed_out_dispatch_notifies_without_syncing() -> TestResult {
        let mut persistence = MockPersistenceService::new();
        persistence.expect_load_all().never();
        persistence.expect_replace_all().never();

        let (mut storefront, mut receiver) = Storefront::new(
            ledger(),
            Arc::new(MockAuthProvider::new()),
            Arc::new(persistence),
            DEBOUNCE,
        );

        storefront.dispatch(add(2))?;
        let rejected = storefront.dispatch(add(2));

        assert_eq!(rejected, Err(LedgerError::OutOfStock(ProductId::new(2))));

        let notifications = drain(&mut receiver);

        assert!(matches!(
            notifications.first(),
            Some(Notification::Ledger(LedgerEvent::AddedToCart { .. }))
        ));
        assert_eq!(
            notifications.last(),
            Some(&Notification::Rejected(LedgerError::OutOfStock(
                ProductId::new(2)
            )))
        );
        assert_eq!(storefront.ledger().cart().unit_count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn sign_in_restores_mirrored_cart() -> TestResult {
        let mut remote = ledger();
        remote.add_to_cart(ProductId::new(1), price(), None)?;
        remote.add_to_cart(ProductId::new(1), price(), None)?;
        let snapshot = remote.snapshot();

        let mut persistence = MockPersistenceService::new();
        persistence
            .expect_load_all()
            .once()
            .return_once(move |_| Ok(snapshot));
        persistence.expect_replace_all().never();

        let (mut storefront, mut receiver) = Storefront::new(
            ledger(),
            Arc::new(signing_in(session())),
            Arc::new(persistence),
            DEBOUNCE,
        );

        let user = storefront.sign_in(&credentials()).await?;

        assert_eq!(user.email, "shopper@example.com");
        assert_eq!(storefront.user(), Some(&user));
        assert_eq!(storefront.ledger().cart().unit_count(), 2);
        assert_eq!(storefront.ledger().available(ProductId::new(1)), 1);
        assert_eq!(
            drain(&mut receiver),
            vec![Notification::CartRestored {
                restored: 1,
                dropped: Vec::new(),
            }]
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_load_keeps_local_state() -> TestResult {
        let mut persistence = MockPersistenceService::new();
        persistence
            .expect_load_all()
            .once()
            .return_once(|_| Err(SyncError::UnexpectedResponse("boom".to_string())));
        persistence.expect_replace_all().never();

        let (mut storefront, mut receiver) = Storefront::new(
            ledger(),
            Arc::new(signing_in(session())),
            Arc::new(persistence),
            DEBOUNCE,
        );

        storefront.dispatch(add(1))?;
        drain(&mut receiver);

        storefront.sign_in(&credentials()).await?;

        assert_eq!(storefront.ledger().cart().unit_count(), 1);
        assert!(matches!(
            drain(&mut receiver).as_slice(),
            [Notification::SyncFailed(_)]
        ));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_credentials_leave_storefront_signed_out() {
        let mut auth = MockAuthProvider::new();
        auth.expect_sign_in()
            .once()
            .return_once(|_| Err(AuthError::InvalidCredentials));

        let mut persistence = MockPersistenceService::new();
        persistence.expect_load_all().never();

        let (mut storefront, _receiver) =
            Storefront::new(ledger(), Arc::new(auth), Arc::new(persistence), DEBOUNCE);

        let result = storefront.sign_in(&credentials()).await;

        assert!(matches!(
            result,
            Err(StorefrontError::Auth(AuthError::InvalidCredentials))
        ));
        assert!(storefront.user().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_changes_are_written_once() -> TestResult {
        let mut persistence = MockPersistenceService::new();
        persistence
            .expect_load_all()
            .once()
            .return_once(|_| Ok(UserSnapshot::default()));
        persistence
            .expect_replace_all()
            .once()
            .withf(|_, snapshot| snapshot.cart_items.len() == 2)
            .return_once(|_, _| Ok(()));

        let (mut storefront, mut receiver) = Storefront::new(
            ledger(),
            Arc::new(signing_in(session())),
            Arc::new(persistence),
            DEBOUNCE,
        );

        storefront.sign_in(&credentials()).await?;

        storefront.dispatch(add(1))?;
        storefront.dispatch(add(1))?;
        storefront.dispatch(add(2))?;

        tokio::time::sleep(DEBOUNCE * 2).await;

        let notifications = drain(&mut receiver);

        assert_eq!(notifications.last(), Some(&Notification::Synced));
        assert_eq!(
            notifications
                .iter()
                .filter(|n| **n == Notification::Synced)
                .count(),
            1
        );

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn sync_failure_is_reported_and_state_kept() -> TestResult {
        let mut persistence = MockPersistenceService::new();
        persistence
            .expect_load_all()
            .once()
            .return_once(|_| Ok(UserSnapshot::default()));
        persistence
            .expect_replace_all()
            .once()
            .return_once(|_, _| Err(SyncError::UnexpectedResponse("offline".to_string())));

        let (mut storefront, mut receiver) = Storefront::new(
            ledger(),
            Arc::new(signing_in(session())),
            Arc::new(persistence),
            DEBOUNCE,
        );

        storefront.sign_in(&credentials()).await?;
        storefront.dispatch(add(1))?;

        tokio::time::sleep(DEBOUNCE * 2).await;

        assert!(matches!(
            drain(&mut receiver).last(),
            Some(Notification::SyncFailed(_))
        ));
        assert_eq!(storefront.ledger().cart().unit_count(), 1);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn sign_out_flushes_pending_changes_and_resets() -> TestResult {
        let mut auth = signing_in(session());
        auth.expect_sign_out().once().return_once(|| Ok(()));

        let mut persistence = MockPersistenceService::new();
        persistence
            .expect_load_all()
            .once()
            .return_once(|_| Ok(UserSnapshot::default()));
        persistence
            .expect_replace_all()
            .once()
            .withf(|_, snapshot| snapshot.cart_items.len() == 1)
            .return_once(|_, _| Ok(()));

        let (mut storefront, _receiver) =
            Storefront::new(ledger(), Arc::new(auth), Arc::new(persistence), DEBOUNCE);

        storefront.sign_in(&credentials()).await?;
        storefront.dispatch(add(1))?;
        storefront.sign_out().await?;

        assert!(storefront.user().is_none());
        assert!(storefront.ledger().cart().is_empty());
        assert_eq!(storefront.ledger().available(ProductId::new(1)), 3);

        Ok(())
    }

    #[tokio::test]
    async fn failed_provider_sign_out_still_resets_locally() -> TestResult {
        let mut auth = signing_in(session());
        auth.expect_sign_out()
            .once()
            .return_once(|| Err(AuthError::UnexpectedResponse("503".to_string())));

        let mut persistence = MockPersistenceService::new();
        persistence
            .expect_load_all()
            .once()
            .return_once(|_| Ok(UserSnapshot::default()));
        persistence
            .expect_replace_all()
            .once()
            .return_once(|_, _| Ok(()));

        let (mut storefront, _receiver) =
            Storefront::new(ledger(), Arc::new(auth), Arc::new(persistence), DEBOUNCE);

        storefront.sign_in(&credentials()).await?;
        storefront.dispatch(add(1))?;

        assert!(matches!(
            storefront.sign_out().await,
            Err(StorefrontError::Auth(AuthError::UnexpectedResponse(_)))
        ));
        assert!(storefront.user().is_none());
        assert!(storefront.ledger().cart().is_empty());
        assert_eq!(storefront.ledger().available(ProductId::new(1)), 3);

        Ok(())
    }

    #[tokio::test]
    async fn sign_out_requires_a_session() {
        let (mut storefront, _receiver) = Storefront::new(
            ledger(),
            Arc::new(MockAuthProvider::new()),
            Arc::new(MockPersistenceService::new()),
            DEBOUNCE,
        );

        assert!(matches!(
            storefront.sign_out().await,
            Err(StorefrontError::Auth(AuthError::NotSignedIn))
        ));
    }
}
