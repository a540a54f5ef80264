//! Keychain access for long-lived secrets
//!
//! Secrets are opaque strings addressed by a `(service, account)` pair. The
//! [`KeychainTrait`] abstraction lets the credential store run against the
//! platform keychain in production and an in-memory map in tests.
//!
//! ## Platform Support
//!
//! [`KeychainProvider`] delegates to the `keyring` crate: macOS Keychain,
//! Windows Credential Manager and the Linux Secret Service, depending on which
//! `keyring` backend features the final application enables.
//!
//! ## Usage
//!
//! ```no_run
//! use freeagent_common::security::{KeychainProvider, KeychainTrait};
//!
//! let keychain = KeychainProvider::new();
//! keychain.set_secret("freeagent", "client_id", "abc123")?;
//! let secret = keychain.get_secret("freeagent", "client_id")?;
//! assert_eq!(secret, "abc123");
//! # Ok::<(), freeagent_common::security::KeychainError>(())
//! ```

use thiserror::Error;
#[cfg(feature = "platform")]
use tracing::debug;

/// Trait for keychain operations
///
/// Implementations must be safe to share between threads; the token manager
/// calls into the store from whichever thread happens to need a session.
pub trait KeychainTrait: Send + Sync {
    /// Retrieve a secret
    ///
    /// # Errors
    /// Returns `KeychainError::NotFound` if nothing is stored for the pair,
    /// `KeychainError::AccessFailed` if the store cannot be read
    fn get_secret(&self, service: &str, account: &str) -> Result<String, KeychainError>;

    /// Store (or overwrite) a secret
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if the store rejects the write
    fn set_secret(&self, service: &str, account: &str, value: &str) -> Result<(), KeychainError>;

    /// Delete a secret (idempotent)
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if the store rejects the delete
    fn delete_secret(&self, service: &str, account: &str) -> Result<(), KeychainError>;

    /// Check whether a secret exists for the pair
    fn secret_exists(&self, service: &str, account: &str) -> bool {
        self.get_secret(service, account).is_ok()
    }
}

/// Keychain error types
#[derive(Debug, Error)]
pub enum KeychainError {
    /// Keychain access failed (permission denied, not available, etc.)
    #[error("Keychain access failed: {0}")]
    AccessFailed(String),

    /// Entry not found in keychain
    #[error("Entry not found")]
    NotFound,
}

/// Platform keychain provider backed by the `keyring` crate
#[cfg(feature = "platform")]
#[derive(Debug, Clone, Copy, Default)]
pub struct KeychainProvider;

#[cfg(feature = "platform")]
impl KeychainProvider {
    /// Create a new keychain provider
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn create_entry(service: &str, account: &str) -> Result<keyring::Entry, KeychainError> {
        keyring::Entry::new(service, account).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to create keychain entry: {e}"))
        })
    }
}

#[cfg(feature = "platform")]
impl KeychainTrait for KeychainProvider {
    fn get_secret(&self, service: &str, account: &str) -> Result<String, KeychainError> {
        debug!(service = %service, account = %account, "Retrieving secret from keychain");

        let entry = Self::create_entry(service, account)?;
        entry.get_password().map_err(|e| {
            if matches!(e, keyring::Error::NoEntry) {
                KeychainError::NotFound
            } else {
                KeychainError::AccessFailed(format!(
                    "Failed to retrieve secret for {service}/{account}: {e}"
                ))
            }
        })
    }

    fn set_secret(&self, service: &str, account: &str, value: &str) -> Result<(), KeychainError> {
        debug!(service = %service, account = %account, "Storing secret in keychain");

        let entry = Self::create_entry(service, account)?;
        entry.set_password(value).map_err(|e| {
            KeychainError::AccessFailed(format!(
                "Failed to store secret for {service}/{account}: {e}"
            ))
        })
    }

    fn delete_secret(&self, service: &str, account: &str) -> Result<(), KeychainError> {
        debug!(service = %service, account = %account, "Deleting secret from keychain");

        let entry = Self::create_entry(service, account)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(KeychainError::AccessFailed(format!(
                "Failed to delete secret for {service}/{account}: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for security::keychain.
    use super::*;
    use crate::testing::MockKeychainProvider;

    fn test_service_name() -> String {
        format!("FreeAgentTest.{}", uuid::Uuid::new_v4())
    }

    #[test]
    fn set_get_and_delete_secret() {
        let service = test_service_name();
        let keychain = MockKeychainProvider::new();

        keychain.set_secret(&service, "client_id", "super-secret").unwrap();
        assert!(keychain.secret_exists(&service, "client_id"));
        assert_eq!(keychain.get_secret(&service, "client_id").unwrap(), "super-secret");

        keychain.delete_secret(&service, "client_id").unwrap();
        assert!(!keychain.secret_exists(&service, "client_id"));
    }

    #[test]
    fn delete_secret_is_idempotent() {
        let service = test_service_name();
        let keychain = MockKeychainProvider::new();

        keychain.delete_secret(&service, "missing").unwrap();
        keychain.set_secret(&service, "value", "x").unwrap();
        keychain.delete_secret(&service, "value").unwrap();
        keychain.delete_secret(&service, "value").unwrap();
    }

    #[test]
    fn missing_secret_is_not_found() {
        let keychain = MockKeychainProvider::new();

        let result = keychain.get_secret(&test_service_name(), "nothing");
        assert!(matches!(result, Err(KeychainError::NotFound)));
    }

    #[test]
    fn services_are_isolated() {
        let keychain = MockKeychainProvider::new();
        let first = test_service_name();
        let second = test_service_name();

        keychain.set_secret(&first, "account", "secret").unwrap();

        assert!(matches!(keychain.get_secret(&second, "account"), Err(KeychainError::NotFound)));
    }

    /// Writes through the OS keychain and reads back with a fresh provider,
    /// so each call opens its own `keyring::Entry`.
    #[cfg(feature = "platform")]
    #[test]
    #[ignore = "requires an unlocked platform keychain"]
    fn platform_keychain_persists_between_entries() {
        let service = test_service_name();
        let writer = KeychainProvider::new();

        writer.set_secret(&service, "client_id", "persisted").unwrap();
        let stored = KeychainProvider::new().get_secret(&service, "client_id");
        writer.delete_secret(&service, "client_id").unwrap();

        assert_eq!(stored.unwrap(), "persisted");
        assert!(matches!(writer.get_secret(&service, "client_id"), Err(KeychainError::NotFound)));
    }

    #[test]
    fn overwriting_replaces_value() {
        let service = test_service_name();
        let keychain = MockKeychainProvider::new();

        keychain.set_secret(&service, "account", "one").unwrap();
        keychain.set_secret(&service, "account", "two").unwrap();

        assert_eq!(keychain.get_secret(&service, "account").unwrap(), "two");
    }
}
