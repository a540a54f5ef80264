//! HTTP transport

pub mod client;

pub use client::{json_headers, HttpClient, HttpClientBuilder};
