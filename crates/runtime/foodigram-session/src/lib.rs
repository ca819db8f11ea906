//! # Foodigram Session
//!
//! Async client for the foodigram backend. Authentication is a cookie
//! session guarded by a CSRF token:
//!
//! ```text
//! GET  /auth/csrf/    ──> csrfToken (held, sent as X-CSRFToken)
//! POST /auth/login/   ──> session cookie + user
//! POST /auth/logout/  ──> 204
//! ```
//!
//! [`SessionClient`] speaks HTTP. [`AuthFlow`] adds the persisted
//! logged-in flag on top. Nothing here touches the deck engine.

pub mod auth;
pub mod client;
pub mod models;

pub use auth::AuthFlow;
pub use client::{SessionClient, CSRF_HEADER};
pub use models::{Follow, FollowStatus, Profile, User, UserId};

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors from talking to the backend
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request rejected with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    #[error("No CSRF token held for this session")]
    MissingCsrf,

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] foodigram_storage::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SessionError {
    /// Text suitable for showing to the user as-is
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Network(e) if e.is_timeout() => {
                "The server took too long to respond.".to_string()
            }
            SessionError::Network(_) => {
                "Could not reach the server. Check your connection.".to_string()
            }
            SessionError::Rejected { detail, .. } if !detail.is_empty() => detail.clone(),
            SessionError::Rejected { status, .. } => format!("Request failed ({status})."),
            SessionError::MissingCsrf => "Your session expired. Please try again.".to_string(),
            SessionError::Decode(_) => "Unexpected response from the server.".to_string(),
            SessionError::Storage(_) => "Could not save your session on this device.".to_string(),
            SessionError::InvalidUrl(_) => "The server address is invalid.".to_string(),
        }
    }

    /// HTTP status for rejections
    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
