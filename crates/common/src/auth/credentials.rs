//! Credential storage
//!
//! The client id, client secret and the current OAuth token are kept in the
//! keychain. Client credentials live under `(app_name, "client_id")` and
//! `(app_name, "client_secret")`; the token is a single compact JSON blob
//! under `("<app_name>_token", "oauth2_token")`.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::AuthError;
use super::prompt::{Prompt, PromptError};
use super::types::OAuthToken;
use crate::security::{KeychainError, KeychainTrait};

/// Keychain account holding the OAuth client id
pub const CLIENT_ID_ACCOUNT: &str = "client_id";
/// Keychain account holding the OAuth client secret
pub const CLIENT_SECRET_ACCOUNT: &str = "client_secret";
/// Keychain account holding the serialized token
pub const TOKEN_ACCOUNT: &str = "oauth2_token";

/// One secret slot in the keychain
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub service: String,
    pub account: String,
    pub secret: String,
}

impl Credential {
    #[must_use]
    pub fn new(
        service: impl Into<String>,
        account: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self { service: service.into(), account: account.into(), secret: secret.into() }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("service", &self.service)
            .field("account", &self.account)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// OAuth client id and secret, passed to each grant
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), client_secret: client_secret.into() }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Keychain-backed store for client credentials and the OAuth token
#[derive(Clone)]
pub struct CredentialStore {
    keychain: Arc<dyn KeychainTrait>,
    prompt: Arc<dyn Prompt>,
    app_name: String,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore").field("app_name", &self.app_name).finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Create a store for `app_name`
    ///
    /// # Arguments
    /// * `keychain` - Secret storage
    /// * `prompt` - Used when a client credential has never been stored
    /// * `app_name` - Keychain service for client credentials; the token lives
    ///   under `<app_name>_token`
    #[must_use]
    pub fn new(
        keychain: Arc<dyn KeychainTrait>,
        prompt: Arc<dyn Prompt>,
        app_name: impl Into<String>,
    ) -> Self {
        Self { keychain, prompt, app_name: app_name.into() }
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Keychain service holding the token blob
    #[must_use]
    pub fn token_service(&self) -> String {
        format!("{}_token", self.app_name)
    }

    /// Return the stored secret, or prompt for it and persist the answer
    ///
    /// A stored secret is returned unchanged and the prompt is not consulted.
    ///
    /// # Errors
    /// - `AuthError::CredentialMissing` when nothing is stored and the prompt
    ///   is non-interactive or the answer is empty
    /// - `AuthError::Keychain` when the keychain cannot be read or written
    /// - `AuthError::Prompt` when the terminal interaction fails
    pub fn get_or_prompt(
        &self,
        service: &str,
        account: &str,
        prompt_text: &str,
    ) -> Result<String, AuthError> {
        match self.keychain.get_secret(service, account) {
            Ok(secret) => {
                debug!(service = %service, account = %account, "Using stored credential");
                return Ok(secret);
            }
            Err(KeychainError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let answer = match self.prompt.secret(prompt_text) {
            Ok(answer) => answer.trim().to_string(),
            Err(PromptError::NonInteractive) => {
                return Err(AuthError::credential_missing(service, account));
            }
            Err(PromptError::Io(e)) => return Err(AuthError::Prompt(e)),
        };

        if answer.is_empty() {
            return Err(AuthError::credential_missing(service, account));
        }

        let credential = Credential::new(service, account, answer);
        self.store(&credential)?;
        Ok(credential.secret)
    }

    /// Persist one secret slot
    ///
    /// # Errors
    /// Returns `AuthError::Keychain` if the write fails
    pub fn store(&self, credential: &Credential) -> Result<(), AuthError> {
        self.keychain.set_secret(&credential.service, &credential.account, &credential.secret)?;
        info!(service = %credential.service, account = %credential.account, "Stored credential");
        Ok(())
    }

    /// Client id and secret, prompting for any that were never stored
    ///
    /// # Errors
    /// See [`Self::get_or_prompt`]
    pub fn client_credentials(&self) -> Result<ClientCredentials, AuthError> {
        let client_id =
            self.get_or_prompt(&self.app_name, CLIENT_ID_ACCOUNT, "FreeAgent OAuth client id")?;
        let client_secret = self.get_or_prompt(
            &self.app_name,
            CLIENT_SECRET_ACCOUNT,
            "FreeAgent OAuth client secret",
        )?;
        Ok(ClientCredentials { client_id, client_secret })
    }

    /// Show the authorization URL and collect the pasted redirect URL
    ///
    /// # Errors
    /// Returns `AuthError::AuthenticationRequired` when no user can answer,
    /// `AuthError::Prompt` when the terminal interaction fails
    pub fn prompt_authorization(&self, auth_url: &str) -> Result<String, AuthError> {
        self.prompt.authorize(auth_url).map_err(|e| match e {
            PromptError::NonInteractive => AuthError::authentication_required(
                "interactive authorization is not available".to_string(),
            ),
            PromptError::Io(e) => AuthError::Prompt(e),
        })
    }

    /// Persist the whole token as a compact JSON blob
    ///
    /// # Errors
    /// Returns `AuthError::TokenEncoding` if the token cannot be encoded,
    /// `AuthError::Keychain` if the write fails
    pub fn save_token(&self, token: &OAuthToken) -> Result<(), AuthError> {
        let blob =
            serde_json::to_string(token).map_err(|e| AuthError::TokenEncoding(e.to_string()))?;
        self.keychain.set_secret(&self.token_service(), TOKEN_ACCOUNT, &blob)?;
        debug!(service = %self.token_service(), "Saved OAuth token");
        Ok(())
    }

    /// Load the stored token
    ///
    /// A blob that fails to decode is logged, deleted and reported as absent.
    ///
    /// # Errors
    /// Returns `AuthError::Keychain` for keychain failures other than a
    /// missing entry
    pub fn load_token(&self) -> Result<Option<OAuthToken>, AuthError> {
        let service = self.token_service();
        let blob = match self.keychain.get_secret(&service, TOKEN_ACCOUNT) {
            Ok(blob) => blob,
            Err(KeychainError::NotFound) => {
                debug!(service = %service, "No stored OAuth token");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match Self::decode_token(&blob) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!(service = %service, error = %e, "Discarding malformed stored token");
                if let Err(e) = self.keychain.delete_secret(&service, TOKEN_ACCOUNT) {
                    warn!(service = %service, error = %e, "Failed to delete malformed token");
                }
                Ok(None)
            }
        }
    }

    /// Delete the stored token (idempotent)
    ///
    /// # Errors
    /// Returns `AuthError::Keychain` if the delete fails
    pub fn clear_token(&self) -> Result<(), AuthError> {
        self.keychain.delete_secret(&self.token_service(), TOKEN_ACCOUNT)?;
        info!(service = %self.token_service(), "Cleared stored OAuth token");
        Ok(())
    }

    fn decode_token(blob: &str) -> Result<OAuthToken, AuthError> {
        let token: OAuthToken = serde_json::from_str(blob)
            .map_err(|e| AuthError::MalformedStoredToken(e.to_string()))?;
        if token.access_token.is_empty() {
            return Err(AuthError::MalformedStoredToken("empty access token".to_string()));
        }
        Ok(token)
    }
}
