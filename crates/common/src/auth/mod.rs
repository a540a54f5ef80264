//! OAuth 2.0 session management for the FreeAgent API
//!
//! # Features
//!
//! - **Authorization-code grant**: browser approval with CSRF state checking,
//!   the redirect URL is pasted back through a [`Prompt`]
//! - **Lazy token load**: a stored token is used without any network call
//! - **Refresh**: proactive near expiry, reactive after a rejected request,
//!   serialized so concurrent callers share one exchange
//! - **Keychain storage**: client credentials and the token live in the
//!   platform keychain via [`crate::security::KeychainTrait`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  TokenManager   │  Session lifecycle (single lock)
//! └────────┬────────┘
//!          │
//!          ├──► OAuthClient        (token endpoint, blocking HTTP)
//!          └──► CredentialStore    (client id/secret + token blob)
//!                    │
//!                    ├──► KeychainTrait  (platform or in-memory storage)
//!                    └──► Prompt         (terminal, scripted, or refusing)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use freeagent_common::auth::{
//!     CredentialStore, OAuthClient, OAuthConfig, TerminalPrompt, TokenManager,
//! };
//! use freeagent_common::security::KeychainProvider;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OAuthConfig::new("https://api.freeagent.com/v2/", "https://localhost/");
//!     let store = CredentialStore::new(
//!         Arc::new(KeychainProvider::new()),
//!         Arc::new(TerminalPrompt),
//!         "freeagent",
//!     );
//!     let manager = TokenManager::new(Arc::new(OAuthClient::new(config)?), store, 60);
//!
//!     let session = manager.session()?;
//!     let _header = session.authorization_header();
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod prompt;
pub mod state;
pub mod token_manager;
pub mod traits;
pub mod types;

pub use client::{OAuthClient, OAuthClientError};
pub use credentials::{ClientCredentials, Credential, CredentialStore};
pub use error::AuthError;
#[cfg(feature = "platform")]
pub use prompt::TerminalPrompt;
pub use prompt::{NonInteractivePrompt, Prompt, PromptError};
pub use state::{generate_state, parse_redirect, validate_state, RedirectParams};
pub use token_manager::{Session, TokenManager, DEFAULT_REFRESH_THRESHOLD_SECS};
pub use traits::OAuthClientTrait;
pub use types::{OAuthConfig, OAuthError, OAuthToken, TokenResponse};
