//! Shared building blocks for the FreeAgent client crates.
//!
//! # Modules
//!
//! - [`auth`]: OAuth 2.0 authorization-code and refresh flows, credential
//!   storage and the token manager that hands out authenticated sessions
//! - [`security`]: keychain abstraction over the platform secret store
//! - [`wire`]: conversion of typed records into JSON-safe wire payloads
//! - [`testing`]: in-memory fakes for the keychain, OAuth provider and prompt
//!
//! # Feature Flags
//!
//! - `platform` (default): OS keychain via `keyring` and terminal prompts via
//!   `dialoguer`
//! - `test-utils`: exposes [`testing`] to downstream crates

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod security;
pub mod wire;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::{
    AuthError, ClientCredentials, Credential, CredentialStore, NonInteractivePrompt, OAuthClient,
    OAuthClientError, OAuthClientTrait, OAuthConfig, OAuthToken, Prompt, PromptError, Session,
    TokenManager, TokenResponse,
};
pub use security::{KeychainError, KeychainTrait};
#[cfg(feature = "platform")]
pub use security::KeychainProvider;
pub use wire::{envelope, from_wire, to_wire, WireError, WireRecord};
