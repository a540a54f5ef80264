//! Accounting category lookup

pub mod service;

pub use service::CategoryService;
