//! Testing utilities and helpers
//!
//! - **[`mocks`]**: in-memory keychain, counting OAuth provider and scripted
//!   prompt
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use freeagent_common::auth::CredentialStore;
//! use freeagent_common::testing::{MockKeychainProvider, ScriptedPrompt};
//!
//! let keychain = MockKeychainProvider::new();
//! let prompt = ScriptedPrompt::new().with_secrets(["client-id"]);
//! let store = CredentialStore::new(Arc::new(keychain.clone()), Arc::new(prompt), "freeagent");
//!
//! let id = store.get_or_prompt("freeagent", "client_id", "Client id").unwrap();
//! assert_eq!(id, "client-id");
//! assert_eq!(keychain.write_count("freeagent", "client_id"), 1);
//! ```

pub mod mocks;

pub use mocks::{MockKeychainProvider, MockOAuthClient, ScriptedPrompt};
