//! Mock implementations of common traits
//!
//! In-memory stand-ins for the keychain, the OAuth provider and the
//! interactive prompt. All mocks are cheap to clone and clones share state,
//! so a test can hand one copy to the code under test and inspect another.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::auth::{
    parse_redirect, ClientCredentials, OAuthClientError, OAuthClientTrait, OAuthError, Prompt,
    PromptError, TokenResponse,
};
use crate::security::{KeychainError, KeychainTrait};

type SlotKey = (String, String);

#[derive(Debug, Default)]
struct KeychainState {
    secrets: HashMap<SlotKey, String>,
    writes: HashMap<SlotKey, usize>,
    read_failure: Option<String>,
    delete_failure: Option<String>,
}

/// In-memory keychain
///
/// # Examples
///
/// ```
/// use freeagent_common::security::KeychainTrait;
/// use freeagent_common::testing::MockKeychainProvider;
///
/// let keychain = MockKeychainProvider::new();
/// keychain.set_secret("freeagent", "client_id", "abc").unwrap();
/// assert_eq!(keychain.get_secret("freeagent", "client_id").unwrap(), "abc");
/// assert_eq!(keychain.write_count("freeagent", "client_id"), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockKeychainProvider {
    state: Arc<Mutex<KeychainState>>,
}

impl MockKeychainProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes to a slot
    #[must_use]
    pub fn write_count(&self, service: &str, account: &str) -> usize {
        self.state.lock().writes.get(&slot(service, account)).copied().unwrap_or(0)
    }

    /// Make every subsequent read fail with `AccessFailed(message)`
    pub fn fail_reads(&self, message: &str) {
        self.state.lock().read_failure = Some(message.to_string());
    }

    /// Make every subsequent delete fail with `AccessFailed(message)`
    pub fn fail_deletes(&self, message: &str) {
        self.state.lock().delete_failure = Some(message.to_string());
    }

    /// Number of stored secrets
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().secrets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn slot(service: &str, account: &str) -> SlotKey {
    (service.to_string(), account.to_string())
}

impl KeychainTrait for MockKeychainProvider {
    fn get_secret(&self, service: &str, account: &str) -> Result<String, KeychainError> {
        let state = self.state.lock();
        if let Some(message) = &state.read_failure {
            return Err(KeychainError::AccessFailed(message.clone()));
        }
        state.secrets.get(&slot(service, account)).cloned().ok_or(KeychainError::NotFound)
    }

    fn set_secret(&self, service: &str, account: &str, value: &str) -> Result<(), KeychainError> {
        let mut state = self.state.lock();
        state.secrets.insert(slot(service, account), value.to_string());
        *state.writes.entry(slot(service, account)).or_insert(0) += 1;
        Ok(())
    }

    fn delete_secret(&self, service: &str, account: &str) -> Result<(), KeychainError> {
        let mut state = self.state.lock();
        if let Some(message) = &state.delete_failure {
            return Err(KeychainError::AccessFailed(message.clone()));
        }
        state.secrets.remove(&slot(service, account));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct OAuthState {
    exchange_count: usize,
    refresh_count: usize,
    last_code: Option<String>,
    last_refresh_token: Option<String>,
    last_client_id: Option<String>,
    should_fail_exchange: bool,
    should_fail_refresh: bool,
    refresh_response: Option<TokenResponse>,
    refresh_delay: Option<Duration>,
}

/// Mock OAuth provider that counts calls
///
/// Exchanges return `access-<n>` / `refresh-<n>` tokens valid for an hour.
/// Refreshes return `refreshed-<n>` without a new refresh token unless a
/// response is configured.
#[derive(Debug, Clone, Default)]
pub struct MockOAuthClient {
    state: Arc<Mutex<OAuthState>>,
}

impl MockOAuthClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of authorization-code exchanges performed
    #[must_use]
    pub fn exchange_count(&self) -> usize {
        self.state.lock().exchange_count
    }

    /// Number of refresh grants performed
    #[must_use]
    pub fn refresh_count(&self) -> usize {
        self.state.lock().refresh_count
    }

    #[must_use]
    pub fn last_code(&self) -> Option<String> {
        self.state.lock().last_code.clone()
    }

    #[must_use]
    pub fn last_refresh_token(&self) -> Option<String> {
        self.state.lock().last_refresh_token.clone()
    }

    #[must_use]
    pub fn last_client_id(&self) -> Option<String> {
        self.state.lock().last_client_id.clone()
    }

    pub fn set_should_fail_exchange(&self, fail: bool) {
        self.state.lock().should_fail_exchange = fail;
    }

    pub fn set_should_fail_refresh(&self, fail: bool) {
        self.state.lock().should_fail_refresh = fail;
    }

    /// Response returned by every subsequent refresh
    pub fn set_refresh_response(&self, response: TokenResponse) {
        self.state.lock().refresh_response = Some(response);
    }

    /// Sleep this long inside each refresh to widen race windows
    pub fn set_refresh_delay(&self, delay: Duration) {
        self.state.lock().refresh_delay = Some(delay);
    }

    fn invalid_grant() -> OAuthClientError {
        OAuthClientError::OAuthError(OAuthError {
            error: "invalid_grant".to_string(),
            error_description: Some("mock failure".to_string()),
        })
    }
}

impl OAuthClientTrait for MockOAuthClient {
    fn authorization_url(&self, client_id: &str, state: &str) -> String {
        format!("https://auth.example.test/approve_app?client_id={client_id}&state={state}")
    }

    fn exchange_code(
        &self,
        credentials: &ClientCredentials,
        code: &str,
    ) -> Result<TokenResponse, OAuthClientError> {
        let mut state = self.state.lock();
        state.exchange_count += 1;
        state.last_code = Some(code.to_string());
        state.last_client_id = Some(credentials.client_id.clone());

        if state.should_fail_exchange {
            return Err(Self::invalid_grant());
        }

        let n = state.exchange_count;
        Ok(TokenResponse {
            access_token: format!("access-{n}"),
            refresh_token: Some(format!("refresh-{n}")),
            token_type: Some("bearer".to_string()),
            expires_in: Some(3600),
            scope: None,
        })
    }

    fn refresh(
        &self,
        _credentials: &ClientCredentials,
        refresh_token: &str,
    ) -> Result<TokenResponse, OAuthClientError> {
        let delay = {
            let mut state = self.state.lock();
            state.refresh_count += 1;
            state.last_refresh_token = Some(refresh_token.to_string());
            state.refresh_delay
        };

        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        let state = self.state.lock();
        if state.should_fail_refresh {
            return Err(Self::invalid_grant());
        }

        Ok(state.refresh_response.clone().unwrap_or_else(|| TokenResponse {
            access_token: format!("refreshed-{}", state.refresh_count),
            refresh_token: None,
            token_type: Some("bearer".to_string()),
            expires_in: Some(3600),
            scope: None,
        }))
    }

    fn redirect_uri(&self) -> &str {
        "https://localhost/"
    }
}

#[derive(Debug, Clone)]
enum AuthorizeReply {
    /// Echo the state from the authorization URL alongside this code
    Code(String),
    /// Return this redirect verbatim
    Redirect(String),
}

#[derive(Debug, Default)]
struct PromptState {
    secrets: VecDeque<String>,
    authorize_reply: Option<AuthorizeReply>,
    secret_prompts: usize,
    authorize_prompts: usize,
    last_auth_url: Option<String>,
}

/// Prompt with pre-recorded answers
///
/// Secrets are answered in order; once exhausted the prompt behaves like a
/// non-interactive one.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    state: Arc<Mutex<PromptState>>,
}

impl ScriptedPrompt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue answers for `secret()`
    #[must_use]
    pub fn with_secrets<I, S>(self, secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.lock().secrets.extend(secrets.into_iter().map(Into::into));
        self
    }

    /// Answer `authorize()` with a redirect carrying `code` and the state
    /// found in the authorization URL
    #[must_use]
    pub fn with_authorization_code(self, code: &str) -> Self {
        self.state.lock().authorize_reply = Some(AuthorizeReply::Code(code.to_string()));
        self
    }

    /// Answer `authorize()` with a fixed redirect URL
    #[must_use]
    pub fn with_redirect(self, redirect: &str) -> Self {
        self.state.lock().authorize_reply = Some(AuthorizeReply::Redirect(redirect.to_string()));
        self
    }

    #[must_use]
    pub fn secret_prompts(&self) -> usize {
        self.state.lock().secret_prompts
    }

    #[must_use]
    pub fn authorize_prompts(&self) -> usize {
        self.state.lock().authorize_prompts
    }

    #[must_use]
    pub fn last_auth_url(&self) -> Option<String> {
        self.state.lock().last_auth_url.clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn secret(&self, _prompt_text: &str) -> Result<String, PromptError> {
        let mut state = self.state.lock();
        state.secret_prompts += 1;
        state.secrets.pop_front().ok_or(PromptError::NonInteractive)
    }

    fn authorize(&self, auth_url: &str) -> Result<String, PromptError> {
        let mut state = self.state.lock();
        state.authorize_prompts += 1;
        state.last_auth_url = Some(auth_url.to_string());

        match state.authorize_reply.clone() {
            Some(AuthorizeReply::Redirect(redirect)) => Ok(redirect),
            Some(AuthorizeReply::Code(code)) => {
                let echoed = parse_redirect(auth_url)
                    .map_err(PromptError::Io)?
                    .state
                    .unwrap_or_default();
                Ok(format!(
                    "https://localhost/?code={}&state={}",
                    urlencoding::encode(&code),
                    urlencoding::encode(&echoed)
                ))
            }
            None => Err(PromptError::NonInteractive),
        }
    }
}
