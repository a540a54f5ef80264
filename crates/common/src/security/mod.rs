//! Security primitives
//!
//! Secret storage is addressed by `(service, account)` pairs and hidden behind
//! [`KeychainTrait`] so tests can swap the OS keychain for an in-memory fake.

pub mod keychain;

#[cfg(feature = "platform")]
pub use keychain::KeychainProvider;
pub use keychain::{KeychainError, KeychainTrait};
