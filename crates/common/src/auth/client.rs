//! OAuth 2.0 client for the FreeAgent authorization server
//!
//! Handles the provider side of the authorization-code grant:
//! - Browser authorization URL building
//! - Authorization code exchange
//! - Token refresh
//!
//! Requests are blocking; client credentials travel in the form body.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::debug;

use super::credentials::ClientCredentials;
use super::traits::OAuthClientTrait;
use super::types::{OAuthConfig, OAuthError, TokenResponse};

/// Default timeout for token endpoint requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for OAuth client operations
#[derive(Debug)]
pub enum OAuthClientError {
    /// HTTP request failed
    RequestFailed(reqwest::Error),

    /// OAuth server returned an error
    OAuthError(OAuthError),

    /// Token endpoint answered with a status that carries no OAuth error body
    UnexpectedStatus { status: u16, body: String },

    /// Failed to parse response
    ParseError(String),

    /// No refresh token available
    NoRefreshToken,
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "HTTP request failed: {e}"),
            Self::OAuthError(e) => write!(f, "OAuth error: {e}"),
            Self::UnexpectedStatus { status, body } => {
                write!(f, "Token endpoint returned {status}: {body}")
            }
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::NoRefreshToken => write!(f, "No refresh token available"),
        }
    }
}

impl std::error::Error for OAuthClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RequestFailed(e) => Some(e),
            Self::OAuthError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

/// Blocking OAuth 2.0 client
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    client: Client,
}

impl OAuthClient {
    /// Create a new OAuth client with the default request timeout
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed
    pub fn new(config: OAuthConfig) -> Result<Self, OAuthClientError> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    /// Create a new OAuth client with an explicit request timeout
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed
    pub fn with_timeout(config: OAuthConfig, timeout: Duration) -> Result<Self, OAuthClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { config, client })
    }

    /// Get a reference to the OAuth configuration
    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    fn request_token(
        &self,
        grant_type: &str,
        params: Vec<(&str, String)>,
    ) -> Result<TokenResponse, OAuthClientError> {
        let url = self.config.token_url();
        debug!(url = %url, grant_type = %grant_type, "Requesting token");

        let response = self.client.post(&url).form(&params).send()?;
        Self::parse_token_response(response)
    }

    fn parse_token_response(response: Response) -> Result<TokenResponse, OAuthClientError> {
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "Token endpoint rejected the request");
            return Err(serde_json::from_str::<OAuthError>(&body).map_or_else(
                |_| OAuthClientError::UnexpectedStatus { status: status.as_u16(), body },
                OAuthClientError::OAuthError,
            ));
        }

        serde_json::from_str(&body).map_err(|e| OAuthClientError::ParseError(e.to_string()))
    }
}

impl OAuthClientTrait for OAuthClient {
    fn authorization_url(&self, client_id: &str, state: &str) -> String {
        let params = [
            ("response_type", "code"),
            ("client_id", client_id),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("scope", self.config.scope()),
            ("state", state),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.config.authorization_url(), query_string)
    }

    fn exchange_code(
        &self,
        credentials: &ClientCredentials,
        code: &str,
    ) -> Result<TokenResponse, OAuthClientError> {
        let params = vec![
            ("grant_type", "authorization_code".to_string()),
            ("code", code.to_string()),
            ("redirect_uri", self.config.redirect_uri.clone()),
            ("client_id", credentials.client_id.clone()),
            ("client_secret", credentials.client_secret.clone()),
        ];
        self.request_token("authorization_code", params)
    }

    fn refresh(
        &self,
        credentials: &ClientCredentials,
        refresh_token: &str,
    ) -> Result<TokenResponse, OAuthClientError> {
        if refresh_token.is_empty() {
            return Err(OAuthClientError::NoRefreshToken);
        }

        let params = vec![
            ("grant_type", "refresh_token".to_string()),
            ("refresh_token", refresh_token.to_string()),
            ("client_id", credentials.client_id.clone()),
            ("client_secret", credentials.client_secret.clone()),
        ];
        self.request_token("refresh_token", params)
    }

    fn redirect_uri(&self) -> &str {
        &self.config.redirect_uri
    }
}
