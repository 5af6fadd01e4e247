//! # Client Error Types
//!
//! Error types for everything in billing-client.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Validation    │  │      API        │  │      Workflow           │ │
//! │  │  (billing-core) │  │   (ApiError)    │  │                         │ │
//! │  │                 │  │                 │  │  NotAuthenticated       │ │
//! │  │  EmptyBill      │  │  Network        │  │  LoginInProgress        │ │
//! │  │  InvalidPrice   │  │  Http           │  │  SubmissionInFlight     │ │
//! │  │  ...            │  │  AuthExpired    │  │  AlreadySubmitted       │ │
//! │  │                 │  │  InvalidResponse│  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  Configuration  │  │  Session Store  │                              │
//! │  │                 │  │                 │                              │
//! │  │  InvalidConfig  │  │  Store          │                              │
//! │  │  ConfigLoad...  │  │                 │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billing_core::ValidationError;
use thiserror::Error;

/// Message shown when a bill submission fails without a server message.
pub const DEFAULT_SUBMIT_FAILURE: &str = "Failed to create bill";

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

// =============================================================================
// API Error
// =============================================================================

/// Coarse classification of an API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No response was received.
    NetworkError,
    /// A response arrived but was a failure or could not be decoded.
    HttpError,
}

/// A failed call to the billing backend, normalized.
///
/// ## Mapping
/// ```text
/// request never answered        → Network
/// 401                           → AuthExpired   (HttpError kind)
/// any other non-2xx             → Http          (HttpError kind)
/// 2xx with an undecodable body  → InvalidResponse (HttpError kind)
/// ```
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Transport failure: refused connection, DNS, timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a failure status.
    #[error("Request failed with status {status}{}", suffix(.message))]
    Http {
        status: u16,
        message: Option<String>,
    },

    /// The server rejected the bearer token.
    #[error("Session expired{}", suffix(.message))]
    AuthExpired { message: Option<String> },

    /// The server answered with success but the body did not decode.
    #[error("Invalid response (status {status}): {reason}")]
    InvalidResponse { status: u16, reason: String },
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Network(_) => ApiErrorKind::NetworkError,
            ApiError::Http { .. } | ApiError::AuthExpired { .. } | ApiError::InvalidResponse { .. } => {
                ApiErrorKind::HttpError
            }
        }
    }

    /// HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network(_) => None,
            ApiError::Http { status, .. } => Some(*status),
            ApiError::AuthExpired { .. } => Some(401),
            ApiError::InvalidResponse { status, .. } => Some(*status),
        }
    }

    /// The `message` field from the server's error body, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } | ApiError::AuthExpired { message } => {
                message.as_deref()
            }
            ApiError::Network(_) | ApiError::InvalidResponse { .. } => None,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthExpired { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.as_u16() == 401 => ApiError::AuthExpired { message: None },
            Some(status) => ApiError::Http {
                status: status.as_u16(),
                message: None,
            },
            None => ApiError::Network(err.to_string()),
        }
    }
}

// =============================================================================
// Client Error
// =============================================================================

/// Every failure a billing-client operation can return.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Cashier input failed validation. Nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The operation needs a logged-in user.
    #[error("Not logged in")]
    NotAuthenticated,

    /// A login attempt is already running.
    #[error("Login already in progress")]
    LoginInProgress,

    /// A submission for this bill is already in flight.
    #[error("Bill submission already in progress")]
    SubmissionInFlight,

    /// This bill has already been created.
    #[error("Bill already submitted")]
    AlreadySubmitted,

    /// Session store read or write failed.
    #[error("Session store error: {0}")]
    Store(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

impl ClientError {
    /// Text to show the cashier for this error.
    ///
    /// Server-supplied messages win over the generic description.
    pub fn display_message(&self) -> String {
        match self {
            ClientError::Api(api) => api
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| api.to_string()),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Store(format!("Invalid JSON: {}", err))
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidConfig(format!("Invalid base URL: {}", err))
    }
}
