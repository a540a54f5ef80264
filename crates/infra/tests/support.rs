//! Shared fixtures for infra integration tests
//!
//! Blocking clients must be created and dropped off the async runtime, so
//! tests build them inside `spawn_blocking`.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use freeagent_common::testing::{MockKeychainProvider, MockOAuthClient, ScriptedPrompt};
use freeagent_common::{Credential, CredentialStore, OAuthToken, TokenManager};

pub const APP_NAME: &str = "freeagent";

/// Keychain holding client credentials and an access token
pub fn seeded_keychain(access_token: &str, refresh_token: Option<&str>) -> MockKeychainProvider {
    seeded_keychain_expiring(access_token, refresh_token, None)
}

/// Keychain like [`seeded_keychain`] with a token expiring `expires_in`
/// seconds from now (negative for already expired)
pub fn seeded_keychain_expiring(
    access_token: &str,
    refresh_token: Option<&str>,
    expires_in: Option<i64>,
) -> MockKeychainProvider {
    let keychain = MockKeychainProvider::new();
    let store = store(&keychain);

    store.store(&Credential::new(APP_NAME, "client_id", "client-id")).unwrap();
    store.store(&Credential::new(APP_NAME, "client_secret", "client-secret")).unwrap();
    store
        .save_token(&OAuthToken {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.map(str::to_string),
            expires_at: expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
            token_type: "Bearer".to_string(),
            scope: None,
        })
        .unwrap();

    keychain
}

pub fn store(keychain: &MockKeychainProvider) -> CredentialStore {
    CredentialStore::new(Arc::new(keychain.clone()), Arc::new(ScriptedPrompt::new()), APP_NAME)
}

/// Token manager over a seeded keychain and a mock provider
pub fn token_manager(
    keychain: &MockKeychainProvider,
    oauth: &MockOAuthClient,
) -> Arc<TokenManager> {
    Arc::new(TokenManager::new(Arc::new(oauth.clone()), store(keychain), 60))
}

/// Stored access token, if any
pub fn stored_access_token(keychain: &MockKeychainProvider) -> Option<String> {
    store(keychain).load_token().unwrap().map(|token| token.access_token)
}
