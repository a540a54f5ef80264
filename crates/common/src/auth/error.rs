//! Authentication error type

use thiserror::Error;

use crate::security::KeychainError;

/// Errors raised while obtaining credentials or managing the OAuth session
#[derive(Debug, Error)]
pub enum AuthError {
    /// No secret is stored and none could be prompted for
    #[error("credential missing for {service}/{account}")]
    CredentialMissing { service: String, account: String },

    /// Stored token blob could not be decoded
    #[error("stored token is malformed: {0}")]
    MalformedStoredToken(String),

    /// The interactive authorization-code grant failed
    #[error("authorization failed: {0}")]
    AuthorizationFailed(String),

    /// A token could not be encoded for storage
    #[error("failed to encode token for storage: {0}")]
    TokenEncoding(String),

    /// The refresh grant failed
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// No usable session; `authenticate()` must run again
    ///
    /// `source` holds the failure that moved the manager into this state,
    /// when the error is raised by that failure.
    #[error("authentication required: {reason}")]
    AuthenticationRequired {
        reason: String,
        #[source]
        source: Option<Box<AuthError>>,
    },

    /// Keychain access failed
    #[error(transparent)]
    Keychain(#[from] KeychainError),

    /// Interactive prompt failed
    #[error("prompt failed: {0}")]
    Prompt(String),
}

impl AuthError {
    /// Build a `CredentialMissing` error for the slot
    #[must_use]
    pub fn credential_missing(service: &str, account: &str) -> Self {
        Self::CredentialMissing { service: service.to_string(), account: account.to_string() }
    }

    /// Build an `AuthenticationRequired` error without an underlying cause
    #[must_use]
    pub fn authentication_required(reason: impl Into<String>) -> Self {
        Self::AuthenticationRequired { reason: reason.into(), source: None }
    }
}
