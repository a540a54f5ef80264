//! Session source for the API client
//!
//! The API client never touches tokens directly; it asks an
//! [`AccessTokenProvider`] for a session and hands a rejected session back
//! for exactly one refresh.

use freeagent_common::{AuthError, Session, TokenManager};

/// Trait for providing authenticated sessions
///
/// This trait allows dependency injection and testing with mock providers.
pub trait AccessTokenProvider: Send + Sync {
    /// Current session, authorizing or refreshing as needed
    fn session(&self) -> Result<Session, AuthError>;

    /// Replace a session the server rejected
    fn refresh_session(&self, rejected: &Session) -> Result<Session, AuthError>;
}

impl AccessTokenProvider for TokenManager {
    fn session(&self) -> Result<Session, AuthError> {
        TokenManager::session(self)
    }

    fn refresh_session(&self, rejected: &Session) -> Result<Session, AuthError> {
        TokenManager::refresh_session(self, rejected)
    }
}
