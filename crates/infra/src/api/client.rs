//! Authenticated FreeAgent API client
//!
//! Every request carries the current session's `Authorization` header. A 401
//! hands the rejected session back to the token provider for one refresh and
//! the request is sent once more; nothing else is retried.

use std::sync::Arc;
use std::time::Duration;

use freeagent_common::wire::{envelope, WireRecord};
use freeagent_common::{AuthError, Session};
use freeagent_core::AuthenticatedClient;
use freeagent_domain::constants::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, PRODUCTION_API_BASE_URL,
};
use freeagent_domain::{FreeAgentConfig, FreeAgentError};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use tracing::{debug, info, instrument, warn};

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::http::{json_headers, HttpClient};

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., "https://api.freeagent.com/v2/")
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: PRODUCTION_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&FreeAgentConfig> for ApiClientConfig {
    fn from(config: &FreeAgentConfig) -> Self {
        Self {
            base_url: config.base_url(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Status and raw body of one exchange
struct RawResponse {
    status: StatusCode,
    body: String,
}

/// API client with session handling
pub struct ApiClient {
    http_client: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the HTTP client cannot be built
    pub fn new(
        config: ApiClientConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .default_headers(json_headers())
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        let base_url = if config.base_url.ends_with('/') {
            config.base_url
        } else {
            format!("{}/", config.base_url)
        };

        Ok(Self { http_client, auth, base_url })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base URL
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET <base><path>`; any 2xx is success
    ///
    /// # Errors
    ///
    /// `ApiError::Status` for non-2xx responses, `ApiError::Decode` if the body
    /// is not a JSON object
    #[instrument(skip(self))]
    pub fn get(&self, path: &str) -> Result<WireRecord, ApiError> {
        let url = self.url_for(path);
        let response = self.execute(Method::GET, &url, None)?;

        if !response.status.is_success() {
            return Err(Self::status_error(&url, response));
        }

        let record = Self::decode_body(&response.body)?;
        debug!(path = %path, "GET request successful");
        Ok(record)
    }

    /// `PUT <url>` with `{root_key: body}`; only 200 is success
    ///
    /// # Errors
    ///
    /// `ApiError::Status` for any other status
    #[instrument(skip(self, body))]
    pub fn put(&self, url: &str, root_key: &str, body: WireRecord) -> Result<(), ApiError> {
        let payload = envelope(root_key, body);
        let response = self.execute(Method::PUT, url, Some(&payload))?;

        if response.status != StatusCode::OK {
            return Err(Self::status_error(url, response));
        }

        info!(url = %url, "PUT request successful");
        Ok(())
    }

    /// `POST <base><path>` with `{root_key: body}`; 200 and 201 are success
    ///
    /// An empty success body yields an empty record.
    ///
    /// # Errors
    ///
    /// `ApiError::Status` for any other status, `ApiError::Decode` for a body
    /// that is not a JSON object
    #[instrument(skip(self, body))]
    pub fn post(
        &self,
        path: &str,
        root_key: &str,
        body: WireRecord,
    ) -> Result<WireRecord, ApiError> {
        let url = self.url_for(path);
        let payload = envelope(root_key, body);
        let response = self.execute(Method::POST, &url, Some(&payload))?;

        if !matches!(response.status, StatusCode::OK | StatusCode::CREATED) {
            return Err(Self::status_error(&url, response));
        }

        let record = Self::decode_body(&response.body)?;
        info!(path = %path, status = %response.status, "POST request successful");
        Ok(record)
    }

    /// Send with the current session, refreshing once on 401
    fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&WireRecord>,
    ) -> Result<RawResponse, ApiError> {
        let session = self.auth.session()?;
        let response = self.send_once(method.clone(), url, body, &session)?;

        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        warn!(%method, url = %url, "Session rejected, refreshing token");
        let session = self.auth.refresh_session(&session)?;
        self.send_once(method, url, body, &session)
    }

    fn send_once(
        &self,
        method: Method,
        url: &str,
        body: Option<&WireRecord>,
        session: &Session,
    ) -> Result<RawResponse, ApiError> {
        let mut request = self
            .http_client
            .request(method, url)
            .header(AUTHORIZATION, session.authorization_header());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http_client.send(request).map_err(Self::map_domain_error)?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {e}")))?;

        Ok(RawResponse { status, body })
    }

    fn decode_body(body: &str) -> Result<WireRecord, ApiError> {
        if body.trim().is_empty() {
            return Ok(WireRecord::new());
        }
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn status_error(url: &str, response: RawResponse) -> ApiError {
        debug!(url = %url, status = %response.status, "Request rejected");
        ApiError::Status {
            status: response.status.as_u16(),
            url: url.to_string(),
            body: response.body,
        }
    }

    fn map_domain_error(err: FreeAgentError) -> ApiError {
        match err {
            FreeAgentError::Config(message) => ApiError::Config(message),
            FreeAgentError::Auth(message) => {
                ApiError::Auth(AuthError::authentication_required(message))
            }
            other => ApiError::Network(other.to_string()),
        }
    }
}

impl AuthenticatedClient for ApiClient {
    fn get(&self, path: &str) -> freeagent_domain::Result<WireRecord> {
        Ok(Self::get(self, path)?)
    }

    fn put(&self, url: &str, root_key: &str, body: WireRecord) -> freeagent_domain::Result<()> {
        Ok(Self::put(self, url, root_key, body)?)
    }

    fn post(
        &self,
        path: &str,
        root_key: &str,
        body: WireRecord,
    ) -> freeagent_domain::Result<WireRecord> {
        Ok(Self::post(self, path, root_key, body)?)
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the authentication provider
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if required fields are missing or client creation fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let auth =
            self.auth.ok_or_else(|| ApiError::Config("Auth provider not set".to_string()))?;

        ApiClient::new(config, auth)
    }
}

#[cfg(test)]
mod tests {
    use freeagent_common::testing::{MockKeychainProvider, MockOAuthClient, ScriptedPrompt};
    use freeagent_common::{CredentialStore, OAuthToken, TokenManager};

    use super::*;

    fn token_manager() -> Arc<TokenManager> {
        let store = CredentialStore::new(
            Arc::new(MockKeychainProvider::new()),
            Arc::new(ScriptedPrompt::new()),
            "freeagent",
        );
        store
            .save_token(&OAuthToken {
                access_token: "stored".to_string(),
                refresh_token: None,
                expires_at: None,
                token_type: "Bearer".to_string(),
                scope: None,
            })
            .unwrap();
        Arc::new(TokenManager::new(Arc::new(MockOAuthClient::new()), store, 60))
    }

    fn client(base_url: &str) -> ApiClient {
        let config = ApiClientConfig { base_url: base_url.to_string(), ..Default::default() };
        ApiClient::new(config, token_manager()).unwrap()
    }

    #[test]
    fn test_base_url_is_normalised() {
        let client = client("https://api.sandbox.freeagent.com/v2");

        assert_eq!(client.base_url(), "https://api.sandbox.freeagent.com/v2/");
        assert_eq!(
            client.url_for("/categories"),
            "https://api.sandbox.freeagent.com/v2/categories"
        );
        assert_eq!(
            client.url_for("bank_accounts?view=paypal_accounts"),
            "https://api.sandbox.freeagent.com/v2/bank_accounts?view=paypal_accounts"
        );
    }

    #[test]
    fn test_config_from_freeagent_config() {
        let config = ApiClientConfig::from(&FreeAgentConfig::sandbox());

        assert_eq!(config.base_url, "https://api.sandbox.freeagent.com/v2/");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_pattern() {
        let client = ApiClient::builder().auth(token_manager()).build();

        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url(), "https://api.freeagent.com/v2/");
    }

    #[test]
    fn test_builder_missing_auth() {
        let result = ApiClient::builder().build();

        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_empty_body_decodes_to_empty_record() {
        assert!(ApiClient::decode_body("").unwrap().is_empty());
        assert!(ApiClient::decode_body("  \n").unwrap().is_empty());
        assert!(matches!(ApiClient::decode_body("[1, 2]"), Err(ApiError::Decode(_))));
    }
}
