//! Traits for OAuth provider operations
//!
//! Abstracts the token endpoint so the token manager can be exercised against
//! an in-memory provider.

use super::client::OAuthClientError;
use super::credentials::ClientCredentials;
use super::types::TokenResponse;

/// Trait for OAuth client operations
///
/// This trait abstracts OAuth operations to enable testing with mock
/// implementations.
pub trait OAuthClientTrait: Send + Sync {
    /// Build the browser authorization URL for `client_id` and `state`
    fn authorization_url(&self, client_id: &str, state: &str) -> String;

    /// Exchange an authorization code for tokens
    ///
    /// # Errors
    /// Returns error if the token endpoint rejects the code or the response
    /// cannot be parsed
    fn exchange_code(
        &self,
        credentials: &ClientCredentials,
        code: &str,
    ) -> Result<TokenResponse, OAuthClientError>;

    /// Obtain a new access token with a refresh token
    ///
    /// # Errors
    /// Returns error if the refresh token is invalid/revoked or the request
    /// fails
    fn refresh(
        &self,
        credentials: &ClientCredentials,
        refresh_token: &str,
    ) -> Result<TokenResponse, OAuthClientError>;

    /// Get the configured redirect URI
    fn redirect_uri(&self) -> &str;
}
