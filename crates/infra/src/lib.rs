//! # FreeAgent Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The blocking HTTP transport and authenticated API client
//! - Configuration loading from files and environment variables
//! - Logging setup
//! - The [`FreeAgent`] facade wiring storage, tokens, transport and services
//!
//! ## Architecture
//! - Implements traits defined in `freeagent-core`
//! - Depends on `freeagent-common`, `freeagent-domain` and `freeagent-core`
//! - Contains all "impure" code (network I/O, environment, files)

pub mod api;
pub mod config;
pub mod errors;
pub mod freeagent;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{AccessTokenProvider, ApiClient, ApiClientConfig, ApiError};
pub use errors::InfraError;
pub use freeagent::FreeAgent;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::init_tracing;
