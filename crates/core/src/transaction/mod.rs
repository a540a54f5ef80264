//! Accounting transaction listing

pub mod service;

pub use service::TransactionService;
