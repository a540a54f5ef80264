//! API-specific error types

use freeagent_common::{AuthError, WireError};
use thiserror::Error;

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status the operation does not accept
    #[error("{url} returned status {status}: {body}")]
    Status { status: u16, url: String, body: String },

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] WireError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status for rejected responses
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the session
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
