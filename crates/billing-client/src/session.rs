//! # Session Manager
//!
//! Owns the login state and is the only writer of the [`SessionStore`].
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Session States                                  │
//! │                                                                         │
//! │                      login()                                           │
//! │  Unauthenticated ───────────────► Authenticating                       │
//! │        ▲   ▲                        │        │                          │
//! │        │   │          server error  │        │ token + user stored      │
//! │        │   └────────────────────────┘        ▼                          │
//! │        │                                Authenticated(Session)         │
//! │        │   logout() / invalidate()           │                          │
//! │        └─────────────────────────────────────┘                          │
//! │                                                                         │
//! │  A failed login also clears the store, so memory and disk agree.      │
//! │  restore_session(): Unauthenticated ──► Authenticated                  │
//! │  when a token and user are already on disk (not re-validated).         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use billing_core::validation::validate_required;
use billing_core::SessionUser;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::gateway::BillingApi;
use crate::store::{Session, SessionStore};

/// Where the session manager currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated(Session),
}

/// Login, logout and session restore.
pub struct SessionManager {
    store: SessionStore,
    api: Arc<dyn BillingApi>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new(store: SessionStore, api: Arc<dyn BillingApi>) -> Self {
        SessionManager {
            store,
            api,
            state: RwLock::new(SessionState::Unauthenticated),
        }
    }

    /// Exchanges credentials for a session.
    ///
    /// ## Flow
    /// 1. Blank username or password → `Required`, nothing sent
    /// 2. Another login running → `LoginInProgress`
    /// 3. `POST /auth/login`; on success token + user are persisted
    /// 4. Any failure leaves the manager Unauthenticated and the store
    ///    cleared, including a previous session's token
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<SessionUser> {
        validate_required("Username", username)?;
        validate_required("Password", password)?;

        {
            let mut state = self.state.write().await;
            if matches!(*state, SessionState::Authenticating) {
                return Err(ClientError::LoginInProgress);
            }
            *state = SessionState::Authenticating;
        }

        debug!(username = username.trim(), "Logging in");
        let result = self.api.login(username.trim(), password).await;

        let mut state = self.state.write().await;
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.clear_store("login failed");
                *state = SessionState::Unauthenticated;
                return Err(e.into());
            }
        };

        let session = Session {
            token: response.token,
            user: response.user,
        };
        if let Err(e) = self.store.save(&session) {
            warn!(error = %e, "Could not persist session");
            self.clear_store("login failed");
            *state = SessionState::Unauthenticated;
            return Err(e);
        }

        info!(user_id = session.user.id, role = %session.user.role, "Logged in");
        let user = session.user.clone();
        *state = SessionState::Authenticated(session);
        Ok(user)
    }

    /// Resumes a persisted session without asking the server.
    ///
    /// A stale token surfaces later as `AuthExpired` on the first call.
    pub async fn restore_session(&self) -> ClientResult<Option<SessionUser>> {
        let mut state = self.state.write().await;
        if let SessionState::Authenticated(session) = &*state {
            return Ok(Some(session.user.clone()));
        }

        match self.store.load()? {
            Some(session) => {
                info!(user_id = session.user.id, "Restored session");
                let user = session.user.clone();
                *state = SessionState::Authenticated(session);
                Ok(Some(user))
            }
            None => {
                debug!("No persisted session");
                Ok(None)
            }
        }
    }

    /// Ends the session. Always ends Unauthenticated.
    pub async fn logout(&self) {
        self.end_session("logout").await;
        info!("Logged out");
    }

    /// Ends the session after the server rejected the token.
    pub async fn invalidate(&self) {
        self.end_session("invalidated").await;
        warn!("Session expired, login required");
    }

    async fn end_session(&self, reason: &str) {
        let mut state = self.state.write().await;
        self.clear_store(reason);
        *state = SessionState::Unauthenticated;
    }

    fn clear_store(&self, reason: &str) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, reason, "Failed to clear session store");
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<SessionUser> {
        match &*self.state.read().await {
            SessionState::Authenticated(session) => Some(session.user.clone()),
            _ => None,
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(*self.state.read().await, SessionState::Authenticated(_))
    }

    /// The store this manager writes to.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::store::{KeyValueStore, MemoryStore, TOKEN_KEY};
    use crate::testing::{cashier, FakeApi};
    use billing_core::ValidationError;
    use std::time::Duration;

    fn manager(api: Arc<FakeApi>) -> (SessionManager, SessionStore) {
        let store = SessionStore::in_memory();
        (SessionManager::new(store.clone(), api), store)
    }

    #[tokio::test]
    async fn test_login_stores_token_and_user() {
        let api = Arc::new(FakeApi::default());
        let (manager, store) = manager(api.clone());

        let user = manager.login(" asha ", "pw").await.unwrap();
        assert_eq!(user, cashier());
        assert!(manager.is_authenticated().await);
        assert_eq!(store.token(), Some("jwt-fake".to_string()));
        assert_eq!(store.load().unwrap().map(|s| s.user), Some(cashier()));
    }

    #[tokio::test]
    async fn test_blank_credentials_never_sent() {
        let api = Arc::new(FakeApi::default());
        let (manager, _) = manager(api.clone());

        let err = manager.login("asha", "  ").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::Required { .. })
        ));
        assert_eq!(api.login_calls(), 0);
        assert_eq!(manager.state().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_failed_login_returns_to_unauthenticated() {
        let api = Arc::new(FakeApi::default());
        api.set_login(Err(ApiError::Http {
            status: 400,
            message: Some("Invalid username or password".into()),
        }));
        let (manager, store) = manager(api.clone());

        let err = manager.login("asha", "wrong").await.unwrap_err();
        assert_eq!(err.display_message(), "Invalid username or password");
        assert_eq!(manager.state().await, SessionState::Unauthenticated);
        assert_eq!(store.token(), None);
    }

    #[tokio::test]
    async fn test_failed_relogin_drops_previous_session() {
        let api = Arc::new(FakeApi::default());
        let (manager, store) = manager(api.clone());
        manager.login("asha", "pw").await.unwrap();
        assert_eq!(store.token(), Some("jwt-fake".to_string()));

        api.set_login(Err(ApiError::Http {
            status: 400,
            message: Some("Invalid username or password".into()),
        }));
        assert!(manager.login("ravi", "wrong").await.is_err());

        assert_eq!(manager.state().await, SessionState::Unauthenticated);
        assert_eq!(store.token(), None);
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(manager.restore_session().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_login_rejected() {
        let api = Arc::new(FakeApi::with_delays(Duration::from_secs(1), Duration::ZERO));
        let (manager, _) = manager(api.clone());

        let (first, second) = tokio::join!(manager.login("asha", "pw"), manager.login("asha", "pw"));
        assert!(first.is_ok());
        assert!(matches!(second, Err(ClientError::LoginInProgress)));
        assert_eq!(api.login_calls(), 1);
    }

    #[tokio::test]
    async fn test_restore_session_trusts_store() {
        let api = Arc::new(FakeApi::default());
        let (manager, store) = manager(api.clone());
        assert_eq!(manager.restore_session().await.unwrap(), None);

        store
            .save(&Session {
                token: "persisted".into(),
                user: cashier(),
            })
            .unwrap();

        assert_eq!(manager.restore_session().await.unwrap(), Some(cashier()));
        assert_eq!(manager.current_user().await, Some(cashier()));
        assert_eq!(api.login_calls(), 0);
    }

    #[tokio::test]
    async fn test_logout_clears_store() {
        let api = Arc::new(FakeApi::default());
        let (manager, store) = manager(api);
        manager.login("asha", "pw").await.unwrap();

        manager.logout().await;
        assert!(!manager.is_authenticated().await);
        assert_eq!(store.load().unwrap(), None);
    }

    /// Store whose removals always fail.
    struct BrokenStore(MemoryStore);

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> ClientResult<Option<String>> {
            self.0.get(key)
        }
        fn set(&self, key: &str, value: &str) -> ClientResult<()> {
            self.0.set(key, value)
        }
        fn remove(&self, _key: &str) -> ClientResult<()> {
            Err(ClientError::Store("disk unplugged".into()))
        }
    }

    #[tokio::test]
    async fn test_logout_survives_store_failure() {
        let store = SessionStore::new(BrokenStore(MemoryStore::new()));
        let manager = SessionManager::new(store.clone(), Arc::new(FakeApi::default()));
        manager.login("asha", "pw").await.unwrap();

        manager.invalidate().await;
        assert_eq!(manager.state().await, SessionState::Unauthenticated);
        assert_eq!(manager.current_user().await, None);
        assert!(store.token().is_some());
    }

    #[tokio::test]
    async fn test_token_only_is_not_a_session() {
        let backend = MemoryStore::new();
        backend.set(TOKEN_KEY, "orphan").unwrap();
        let manager = SessionManager::new(SessionStore::new(backend), Arc::new(FakeApi::default()));

        assert_eq!(manager.restore_session().await.unwrap(), None);
        assert!(!manager.is_authenticated().await);
    }
}
