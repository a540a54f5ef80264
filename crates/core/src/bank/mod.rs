//! Bank accounts, unexplained transactions and explanations

pub mod service;

pub use service::BankService;
