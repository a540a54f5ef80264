//! Token manager with lazy load and on-demand refresh
//!
//! Manages the OAuth token lifecycle:
//! - Token retrieval from the credential store on first use (no network)
//! - Interactive authorization-code grant when nothing is stored
//! - Proactive refresh when the token expires within the threshold
//! - Reactive refresh after the API rejects a session
//!
//! ```text
//! Unauthenticated ──load/authorize──► Authenticated ──refresh ok──► Authenticated
//!        ▲                                  │
//!        └────────── logout ────────────────┤ refresh failed
//!                                           ▼
//!                                        Failed ──authenticate──► Authenticated
//! ```
//!
//! All state lives behind a single mutex and the refresh grant runs while it
//! is held, so concurrent callers that detect expiry trigger one exchange and
//! all observe its outcome.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::credentials::CredentialStore;
use super::error::AuthError;
use super::state::{generate_state, parse_redirect, validate_state};
use super::traits::OAuthClientTrait;
use super::types::OAuthToken;

/// Default proactive refresh threshold in seconds
pub const DEFAULT_REFRESH_THRESHOLD_SECS: i64 = 60;

/// Immutable credentials for one authenticated request
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    access_token: String,
    token_type: String,
}

impl Session {
    fn from_token(token: &OAuthToken) -> Self {
        Self { access_token: token.access_token.clone(), token_type: token.token_type.clone() }
    }

    /// Value of the `Authorization` header
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

#[derive(Debug, Clone)]
enum TokenState {
    Unauthenticated,
    Authenticated(OAuthToken),
    Failed(String),
}

/// Owner of the OAuth token and producer of [`Session`]s
pub struct TokenManager {
    oauth_client: Arc<dyn OAuthClientTrait>,
    store: CredentialStore,
    state: Mutex<TokenState>,
    refresh_threshold_seconds: i64,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("store", &self.store)
            .field("refresh_threshold_seconds", &self.refresh_threshold_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Create a new token manager
    ///
    /// # Arguments
    /// * `oauth_client` - Provider used for code exchange and refresh
    /// * `store` - Credential store holding client credentials and the token
    /// * `refresh_threshold_seconds` - Refresh tokens this many seconds before
    ///   expiry
    #[must_use]
    pub fn new(
        oauth_client: Arc<dyn OAuthClientTrait>,
        store: CredentialStore,
        refresh_threshold_seconds: i64,
    ) -> Self {
        Self {
            oauth_client,
            store,
            state: Mutex::new(TokenState::Unauthenticated),
            refresh_threshold_seconds,
        }
    }

    /// Current session, loading, authorizing or refreshing as needed
    ///
    /// # Errors
    /// - `AuthError::AuthenticationRequired` while in the failed state or when
    ///   a refresh fails
    /// - `AuthError::AuthorizationFailed` when the interactive grant fails
    /// - `AuthError::CredentialMissing` / `AuthError::Keychain` from the store
    pub fn session(&self) -> Result<Session, AuthError> {
        let mut state = self.state.lock();

        let token = match state.clone() {
            TokenState::Failed(reason) => return Err(AuthError::authentication_required(reason)),
            TokenState::Authenticated(token) => token,
            TokenState::Unauthenticated => {
                if let Some(token) = self.store.load_token()? {
                    info!("Loaded stored OAuth token");
                    *state = TokenState::Authenticated(token.clone());
                    token
                } else {
                    let token = self.authorize_interactively()?;
                    *state = TokenState::Authenticated(token.clone());
                    return Ok(Session::from_token(&token));
                }
            }
        };

        if token.is_expired(self.refresh_threshold_seconds) {
            debug!(
                seconds_until_expiry = ?token.seconds_until_expiry(),
                "Access token expired or about to expire"
            );
            return self.refresh_locked(&mut state, &token);
        }

        Ok(Session::from_token(&token))
    }

    /// Refresh after the API rejected `rejected`
    ///
    /// If another caller already replaced the rejected token, the current
    /// token is returned without a second exchange.
    ///
    /// # Errors
    /// Returns `AuthError::AuthenticationRequired` when no token is held, the
    /// manager is in the failed state, or the refresh grant fails
    pub fn refresh_session(&self, rejected: &Session) -> Result<Session, AuthError> {
        let mut state = self.state.lock();

        let token = match &*state {
            TokenState::Failed(reason) => {
                return Err(AuthError::authentication_required(reason.clone()));
            }
            TokenState::Unauthenticated => {
                return Err(AuthError::authentication_required(
                    "no session to refresh".to_string(),
                ));
            }
            TokenState::Authenticated(token) => token.clone(),
        };

        if token.access_token != rejected.access_token {
            debug!("Token already refreshed by another caller");
            return Ok(Session::from_token(&token));
        }

        self.refresh_locked(&mut state, &token)
    }

    /// Run the interactive authorization-code grant unconditionally
    ///
    /// Recovers from the failed state.
    ///
    /// # Errors
    /// Returns `AuthError::AuthorizationFailed` or a credential store error
    pub fn authenticate(&self) -> Result<Session, AuthError> {
        let mut state = self.state.lock();
        let token = self.authorize_interactively()?;
        *state = TokenState::Authenticated(token.clone());
        Ok(Session::from_token(&token))
    }

    /// Delete the stored token and forget the in-memory one
    ///
    /// # Errors
    /// Returns `AuthError::Keychain` if the stored token cannot be deleted
    pub fn logout(&self) -> Result<(), AuthError> {
        let mut state = self.state.lock();
        self.store.clear_token()?;
        *state = TokenState::Unauthenticated;
        info!("Logged out");
        Ok(())
    }

    /// Whether a token is currently held in memory
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.lock(), TokenState::Authenticated(_))
    }

    /// Whether a refresh failed and `authenticate()` is required
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(*self.state.lock(), TokenState::Failed(_))
    }

    /// Copy of the in-memory token
    #[must_use]
    pub fn current_token(&self) -> Option<OAuthToken> {
        match &*self.state.lock() {
            TokenState::Authenticated(token) => Some(token.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    fn refresh_locked(
        &self,
        state: &mut TokenState,
        token: &OAuthToken,
    ) -> Result<Session, AuthError> {
        let Some(refresh_token) = token.refresh_token.as_deref() else {
            warn!("No refresh token available");
            return Err(Self::fail(state, "no refresh token available".to_string()));
        };

        let credentials = match self.store.client_credentials() {
            Ok(credentials) => credentials,
            Err(e) => return Err(Self::fail(state, e.to_string())),
        };

        info!("Refreshing access token");
        match self.oauth_client.refresh(&credentials, refresh_token) {
            Ok(response) => {
                let next = token.refreshed(response);
                *state = TokenState::Authenticated(next.clone());
                self.store.save_token(&next)?;
                info!("Access token refreshed");
                Ok(Session::from_token(&next))
            }
            Err(e) => {
                error!(error = %e, "Token refresh failed");
                let cause = AuthError::RefreshFailed(e.to_string());
                let reason = cause.to_string();
                *state = TokenState::Failed(reason.clone());
                Err(AuthError::AuthenticationRequired { reason, source: Some(Box::new(cause)) })
            }
        }
    }

    fn fail(state: &mut TokenState, reason: String) -> AuthError {
        *state = TokenState::Failed(reason.clone());
        AuthError::authentication_required(reason)
    }

    fn authorize_interactively(&self) -> Result<OAuthToken, AuthError> {
        let credentials = self.store.client_credentials()?;
        let expected_state = generate_state();
        let auth_url = self.oauth_client.authorization_url(&credentials.client_id, &expected_state);

        info!("Starting interactive authorization");
        let redirect = self.store.prompt_authorization(&auth_url)?;
        let params = parse_redirect(&redirect).map_err(AuthError::AuthorizationFailed)?;

        if let Some(error) = params.error {
            let message = match params.error_description {
                Some(description) => format!("{error}: {description}"),
                None => error,
            };
            warn!(error = %message, "Authorization denied by provider");
            return Err(AuthError::AuthorizationFailed(message));
        }

        match params.state.as_deref() {
            Some(received) if validate_state(&expected_state, received) => {}
            _ => {
                warn!("Authorization state mismatch");
                return Err(AuthError::AuthorizationFailed("state mismatch".to_string()));
            }
        }

        let code = params
            .code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AuthError::AuthorizationFailed("missing authorization code".into()))?;

        let response = self
            .oauth_client
            .exchange_code(&credentials, &code)
            .map_err(|e| AuthError::AuthorizationFailed(e.to_string()))?;

        let token = OAuthToken::from_response(response);
        self.store.save_token(&token)?;
        info!("Authorization complete");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::token_manager.
    use std::time::Duration;

    use chrono::Utc;

    use super::*;
    use crate::security::KeychainTrait;
    use crate::testing::{MockKeychainProvider, MockOAuthClient, ScriptedPrompt};

    struct Harness {
        keychain: MockKeychainProvider,
        oauth: MockOAuthClient,
        prompt: ScriptedPrompt,
        manager: TokenManager,
    }

    fn harness(prompt: ScriptedPrompt) -> Harness {
        let keychain = MockKeychainProvider::new();
        keychain.set_secret("freeagent", "client_id", "id").unwrap();
        keychain.set_secret("freeagent", "client_secret", "secret").unwrap();
        let oauth = MockOAuthClient::new();
        let store =
            CredentialStore::new(Arc::new(keychain.clone()), Arc::new(prompt.clone()), "freeagent");
        let manager = TokenManager::new(Arc::new(oauth.clone()), store, 60);
        Harness { keychain, oauth, prompt, manager }
    }

    fn stored_token(keychain: &MockKeychainProvider, access: &str, expires_in: i64) {
        let token = OAuthToken {
            access_token: access.to_string(),
            refresh_token: Some("stored-refresh".to_string()),
            expires_at: Some(Utc::now() + chrono::Duration::seconds(expires_in)),
            token_type: "Bearer".to_string(),
            scope: None,
        };
        keychain
            .set_secret("freeagent_token", "oauth2_token", &serde_json::to_string(&token).unwrap())
            .unwrap();
    }

    fn persisted(keychain: &MockKeychainProvider) -> OAuthToken {
        let blob = keychain.get_secret("freeagent_token", "oauth2_token").unwrap();
        serde_json::from_str(&blob).unwrap()
    }

    /// Validates `TokenManager::session` for the stored valid token scenario.
    ///
    /// Assertions:
    /// - Ensures the stored access token is used.
    /// - Ensures no exchange, refresh or prompt happens.
    #[test]
    fn stored_valid_token_needs_no_network() {
        let h = harness(ScriptedPrompt::new());
        stored_token(&h.keychain, "stored-access", 3600);

        let session = h.manager.session().unwrap();

        assert_eq!(session.authorization_header(), "Bearer stored-access");
        assert_eq!(h.oauth.exchange_count(), 0);
        assert_eq!(h.oauth.refresh_count(), 0);
        assert_eq!(h.prompt.authorize_prompts(), 0);
    }

    #[test]
    fn expired_stored_token_is_refreshed_once() {
        let h = harness(ScriptedPrompt::new());
        stored_token(&h.keychain, "stale", 10);

        let session = h.manager.session().unwrap();
        let again = h.manager.session().unwrap();

        assert_eq!(h.oauth.refresh_count(), 1);
        assert_eq!(h.oauth.last_refresh_token().as_deref(), Some("stored-refresh"));
        assert_eq!(session, again);
        assert_ne!(session.access_token(), "stale");
        assert_eq!(persisted(&h.keychain).access_token, session.access_token());
    }

    /// Validates `TokenManager::refresh_session` for the carried refresh token
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures the refreshed token keeps the previous refresh token.
    /// - Ensures the new token is persisted.
    #[test]
    fn refresh_keeps_previous_refresh_token() {
        let h = harness(ScriptedPrompt::new());
        stored_token(&h.keychain, "first", 3600);
        let rejected = h.manager.session().unwrap();

        let session = h.manager.refresh_session(&rejected).unwrap();

        let saved = persisted(&h.keychain);
        assert_eq!(saved.access_token, session.access_token());
        assert_eq!(saved.refresh_token.as_deref(), Some("stored-refresh"));
    }

    #[test]
    fn missing_token_runs_interactive_grant() {
        let h = harness(ScriptedPrompt::new().with_authorization_code("auth-code"));

        let session = h.manager.session().unwrap();

        assert_eq!(h.prompt.authorize_prompts(), 1);
        assert_eq!(h.oauth.exchange_count(), 1);
        assert_eq!(h.oauth.last_code().as_deref(), Some("auth-code"));
        assert_eq!(persisted(&h.keychain).access_token, session.access_token());
    }

    #[test]
    fn malformed_stored_token_leads_to_interactive_grant() {
        let h = harness(ScriptedPrompt::new().with_authorization_code("auth-code"));
        h.keychain.set_secret("freeagent_token", "oauth2_token", "garbage").unwrap();

        let session = h.manager.session().unwrap();

        assert_eq!(h.oauth.exchange_count(), 1);
        assert_eq!(persisted(&h.keychain).access_token, session.access_token());
    }

    #[test]
    fn state_mismatch_fails_authorization() {
        let h = harness(
            ScriptedPrompt::new().with_redirect("https://localhost/?code=abc&state=forged"),
        );

        let result = h.manager.session();

        assert!(matches!(result, Err(AuthError::AuthorizationFailed(ref m)) if m.contains("state")));
        assert_eq!(h.oauth.exchange_count(), 0);
    }

    #[test]
    fn provider_error_fails_authorization() {
        let h = harness(ScriptedPrompt::new().with_redirect(
            "https://localhost/?error=access_denied&error_description=denied",
        ));

        let result = h.manager.session();

        assert!(
            matches!(result, Err(AuthError::AuthorizationFailed(ref m)) if m.contains("access_denied"))
        );
    }

    /// Validates `TokenManager::refresh_session` for the failed refresh
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures the failure is reported as `AuthenticationRequired` with the
    ///   `RefreshFailed` cause as its source.
    /// - Ensures later calls fail without further network calls.
    /// - Ensures `authenticate()` recovers.
    #[test]
    fn failed_refresh_requires_authentication() {
        let h = harness(ScriptedPrompt::new().with_authorization_code("auth-code"));
        stored_token(&h.keychain, "first", 3600);
        let rejected = h.manager.session().unwrap();
        h.oauth.set_should_fail_refresh(true);

        match h.manager.refresh_session(&rejected) {
            Err(AuthError::AuthenticationRequired { source: Some(cause), .. }) => {
                assert!(matches!(*cause, AuthError::RefreshFailed(_)));
            }
            other => panic!("expected AuthenticationRequired with a cause, got {other:?}"),
        }
        assert!(h.manager.is_failed());
        assert!(matches!(h.manager.session(), Err(AuthError::AuthenticationRequired { .. })));
        assert!(matches!(
            h.manager.refresh_session(&rejected),
            Err(AuthError::AuthenticationRequired { .. })
        ));
        assert_eq!(h.oauth.refresh_count(), 1);

        let session = h.manager.authenticate().unwrap();
        assert!(h.manager.is_authenticated());
        assert_eq!(h.manager.session().unwrap(), session);
    }

    #[test]
    fn refresh_without_refresh_token_fails() {
        let h = harness(ScriptedPrompt::new());
        let token = OAuthToken {
            access_token: "no-refresh".to_string(),
            refresh_token: None,
            expires_at: None,
            token_type: "Bearer".to_string(),
            scope: None,
        };
        h.manager.store().save_token(&token).unwrap();
        let rejected = h.manager.session().unwrap();

        assert!(matches!(
            h.manager.refresh_session(&rejected),
            Err(AuthError::AuthenticationRequired { .. })
        ));
        assert_eq!(h.oauth.refresh_count(), 0);
    }

    #[test]
    fn stale_rejection_returns_current_session() {
        let h = harness(ScriptedPrompt::new());
        stored_token(&h.keychain, "first", 3600);
        let rejected = h.manager.session().unwrap();

        let refreshed = h.manager.refresh_session(&rejected).unwrap();
        let late = h.manager.refresh_session(&rejected).unwrap();

        assert_eq!(refreshed, late);
        assert_eq!(h.oauth.refresh_count(), 1);
    }

    /// Validates `TokenManager::refresh_session` for the concurrent callers
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures only one refresh exchange happens.
    /// - Ensures every caller observes the same new session.
    #[test]
    fn concurrent_refreshes_perform_one_exchange() {
        let h = harness(ScriptedPrompt::new());
        stored_token(&h.keychain, "first", 3600);
        h.oauth.set_refresh_delay(Duration::from_millis(50));
        let rejected = h.manager.session().unwrap();

        let sessions: Vec<Session> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| h.manager.refresh_session(&rejected).unwrap()))
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        assert_eq!(h.oauth.refresh_count(), 1);
        assert!(sessions.iter().all(|session| session == &sessions[0]));
    }

    #[test]
    fn logout_clears_token() {
        let h = harness(ScriptedPrompt::new());
        stored_token(&h.keychain, "first", 3600);
        h.manager.session().unwrap();

        h.manager.logout().unwrap();

        assert!(!h.manager.is_authenticated());
        assert!(h.manager.current_token().is_none());
        assert!(!h.keychain.secret_exists("freeagent_token", "oauth2_token"));
    }

    #[test]
    fn session_debug_redacts_token() {
        let h = harness(ScriptedPrompt::new());
        stored_token(&h.keychain, "very-secret-access", 3600);

        let session = h.manager.session().unwrap();

        assert!(!format!("{session:?}").contains("very-secret-access"));
    }
}
