//! # FreeAgent Domain
//!
//! Accounting records and shared definitions for the FreeAgent client.
//!
//! This crate contains:
//! - Record types exchanged with the API (explanations, transactions, bank
//!   accounts, categories)
//! - The crate-neutral error type and Result definition
//! - Client configuration
//! - API constants
//!
//! ## Architecture
//! - No dependencies on other FreeAgent crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::FreeAgentConfig;
pub use errors::{FreeAgentError, Result};
pub use types::*;
