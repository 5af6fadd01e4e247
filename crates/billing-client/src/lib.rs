//! # billing-client: I/O Layer for the Billing Client
//!
//! Everything that leaves the process lives here: the HTTP gateway to the
//! billing backend, the persisted session, and the submission workflow
//! that ties the pure [`billing_core::BillComposer`] to the network.
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ClientConfig ──► SessionStore (FileStore)                            │
//! │                         │                                               │
//! │                         ├──► ApiClient (reads token per request)       │
//! │                         │         │                                     │
//! │                         └──► SessionManager (only writer)              │
//! │                                   │                                     │
//! │   ProductLookup ◄── ApiClient     │                                     │
//! │                                   ▼                                     │
//! │   SubmissionWorkflow ◄── ApiClient + SessionManager + Navigator        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use billing_client::{ApiClient, ClientConfig, SessionManager, SessionStore};
//!
//! # async fn demo() -> billing_client::ClientResult<()> {
//! let config = ClientConfig::load_or_default(None);
//! let store = SessionStore::in_memory();
//! let api = Arc::new(ApiClient::new(&config, store.clone())?);
//! let session = SessionManager::new(store, api);
//!
//! let user = session.login("owner", "secret").await?;
//! println!("Hello, {}", user.full_name);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod lookup;
pub mod session;
pub mod store;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ClientConfig;
pub use error::{ApiError, ApiErrorKind, ClientError, ClientResult};
pub use gateway::{ApiClient, BillingApi, LoginResponse};
pub use lookup::ProductLookup;
pub use session::{SessionManager, SessionState};
pub use store::{FileStore, KeyValueStore, MemoryStore, Session, SessionStore};
pub use workflow::{Navigator, SubmissionState, SubmissionWorkflow};
