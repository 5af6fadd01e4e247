//! # Application Context
//!
//! The long-lived objects every command needs, built once at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          AppContext                                     │
//! │                                                                         │
//! │  config ─────► ClientConfig (file + env)                               │
//! │  store ──────► SessionStore over session.json                          │
//! │  api ────────► ApiClient (reads store for the bearer token)            │
//! │  session ────► SessionManager (writes store)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::{anyhow, bail};
use billing_client::{ApiClient, BillingApi, ClientConfig, ClientError, SessionManager, SessionStore};
use billing_core::SessionUser;
use tracing::{debug, warn};

pub struct AppContext {
    pub config: ClientConfig,
    pub api: Arc<dyn BillingApi>,
    pub session: Arc<SessionManager>,
}

impl AppContext {
    pub fn build(config: ClientConfig) -> anyhow::Result<Self> {
        let store = match config.session_path() {
            Some(path) => {
                debug!(?path, "Using session file");
                SessionStore::file(path)
            }
            None => {
                warn!("No data directory available, session will not be remembered");
                SessionStore::in_memory()
            }
        };

        let api: Arc<dyn BillingApi> = Arc::new(ApiClient::new(&config, store.clone())?);
        Ok(Self::from_parts(config, store, api))
    }

    /// Assembles a context around an existing API implementation.
    pub fn from_parts(config: ClientConfig, store: SessionStore, api: Arc<dyn BillingApi>) -> Self {
        let session = Arc::new(SessionManager::new(store, Arc::clone(&api)));
        AppContext {
            config,
            api,
            session,
        }
    }

    /// Restores the saved session or fails with a hint to log in.
    pub async fn require_login(&self) -> anyhow::Result<SessionUser> {
        match self.session.restore_session().await.map_err(user_facing)? {
            Some(user) => Ok(user),
            None => bail!("Not logged in. Run `register login --username <name>` first."),
        }
    }

    /// Ends the session when the server rejected the token.
    pub async fn handle_error(&self, err: ClientError) -> anyhow::Error {
        if let ClientError::Api(api) = &err {
            if api.is_auth_expired() {
                self.session.invalidate().await;
                return anyhow!("Session expired. Please log in again.");
            }
        }
        user_facing(err)
    }
}

/// Converts a client error into the text the cashier should see.
pub fn user_facing(err: ClientError) -> anyhow::Error {
    anyhow!(err.display_message())
}
