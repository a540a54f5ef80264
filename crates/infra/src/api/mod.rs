//! FreeAgent REST API client
//!
//! This module provides the blocking, authenticated client the accounting
//! services talk through.
//!
//! # Architecture
//!
//! - Uses the shared [`HttpClient`](crate::http::HttpClient) (no direct
//!   reqwest client construction)
//! - Sessions come from an [`AccessTokenProvider`], normally the
//!   `TokenManager`
//! - A 401 triggers one token refresh and one re-send
//! - Implements the `AuthenticatedClient` port from `freeagent-core`

pub mod auth;
pub mod client;
pub mod errors;

pub use auth::AccessTokenProvider;
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use errors::ApiError;
