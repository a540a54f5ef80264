//! OAuth 2.0 types and structures
//!
//! Defines the token persisted between runs, the raw token endpoint response,
//! the provider configuration and the provider's error payload.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default token type when the provider omits one
const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// OAuth 2.0 access and refresh tokens with expiry metadata
///
/// Persisted as a single compact JSON blob. The whole value is replaced on
/// refresh; it is never mutated field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// Access token presented as `Authorization: Bearer ...`
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Absolute expiration timestamp (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Token type (normally "Bearer")
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Granted scope, if the provider reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    DEFAULT_TOKEN_TYPE.to_string()
}

impl OAuthToken {
    /// Build a token from a token endpoint response received now
    ///
    /// `expires_at` is computed as `now + expires_in` when the provider
    /// reports a positive lifetime.
    #[must_use]
    pub fn from_response(response: TokenResponse) -> Self {
        Self::from_response_at(response, Utc::now())
    }

    /// Build a token from a response received at `now`
    #[must_use]
    pub fn from_response_at(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let expires_at = response
            .expires_in
            .filter(|seconds| *seconds > 0)
            .map(|seconds| now + chrono::Duration::seconds(seconds));

        let token_type = response
            .token_type
            .filter(|value| !value.is_empty())
            .unwrap_or_else(default_token_type);

        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at,
            token_type,
            scope: response.scope,
        }
    }

    /// Build the token that replaces `self` after a refresh
    ///
    /// Providers may omit the refresh token from refresh responses; the
    /// previous one stays valid in that case and is carried over.
    #[must_use]
    pub fn refreshed(&self, response: TokenResponse) -> Self {
        let mut next = Self::from_response(response);
        if next.refresh_token.is_none() {
            next.refresh_token.clone_from(&self.refresh_token);
        }
        next
    }

    /// Check if the access token is expired or will expire within the given
    /// threshold
    ///
    /// Tokens without an expiry timestamp are treated as valid.
    #[must_use]
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        self.is_expired_at(Utc::now(), threshold_seconds)
    }

    /// Same as [`Self::is_expired`], evaluated at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, threshold_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => now + chrono::Duration::seconds(threshold_seconds) >= expires_at,
            None => false,
        }
    }

    /// Get seconds until token expiration
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - Utc::now()).num_seconds())
    }
}

/// OAuth token response from the token endpoint
///
/// Standard OAuth 2.0 token response format (RFC 6749 section 5.1).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl From<TokenResponse> for OAuthToken {
    fn from(response: TokenResponse) -> Self {
        Self::from_response(response)
    }
}

/// OAuth configuration for the FreeAgent authorization server
///
/// Client credentials are not part of the configuration; they are looked up
/// in the credential store when a grant actually runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    /// API base URL, always ending with `/`
    pub base_url: String,

    /// Redirect URI registered for the application
    pub redirect_uri: String,
}

impl OAuthConfig {
    /// Create a new OAuth configuration
    ///
    /// A trailing `/` is appended to `base_url` when missing.
    #[must_use]
    pub fn new(base_url: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url, redirect_uri: redirect_uri.into() }
    }

    /// Browser authorization endpoint
    #[must_use]
    pub fn authorization_url(&self) -> String {
        format!("{}approve_app", self.base_url)
    }

    /// Token endpoint for code exchange and refresh grants
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}token_endpoint", self.base_url)
    }

    /// Scope requested during authorization (the API base URL)
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.base_url
    }
}

/// OAuth error response from the authorization server
///
/// Standard OAuth 2.0 error response format (RFC 6749 section 5.2).
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}
