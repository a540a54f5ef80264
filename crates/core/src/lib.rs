//! # FreeAgent Core
//!
//! Accounting helpers built on an authenticated request channel.
//!
//! This crate contains:
//! - The [`AuthenticatedClient`] port the helpers talk through
//! - Bank account lookup and transaction explanation
//! - Category lookup backed by a per-service cache
//! - Transaction listing
//! - File attachment encoding
//!
//! ## Architecture Principles
//! - Only depends on `freeagent-common` (wire conversion) and
//!   `freeagent-domain`
//! - No HTTP, keychain or terminal code
//! - All external dependencies via traits

pub mod api_ports;
pub mod attachment;
pub mod bank;
pub mod category;
pub mod transaction;

// Re-export specific items to avoid ambiguity
pub use api_ports::AuthenticatedClient;
pub use attachment::{attach_file, attachment_from_file, content_type_for};
pub use bank::BankService;
pub use category::CategoryService;
pub use transaction::TransactionService;
