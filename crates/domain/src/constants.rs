//! Application constants
//!
//! Centralized location for API endpoints, defaults and limits.

// API locations
pub const PRODUCTION_API_BASE_URL: &str = "https://api.freeagent.com/v2/";
pub const SANDBOX_API_BASE_URL: &str = "https://api.sandbox.freeagent.com/v2/";
pub const DEFAULT_REDIRECT_URI: &str = "https://localhost/";

// Client defaults
pub const DEFAULT_APP_NAME: &str = "freeagent";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REFRESH_THRESHOLD_SECS: i64 = 60;
pub const DEFAULT_USER_AGENT: &str = concat!("freeagent-client/", env!("CARGO_PKG_VERSION"));

// Resource paths (relative to the API base URL)
pub const BANK_ACCOUNTS_PATH: &str = "bank_accounts";
pub const BANK_TRANSACTIONS_PATH: &str = "bank_transactions";
pub const BANK_TRANSACTION_EXPLANATIONS_PATH: &str = "bank_transaction_explanations";
pub const CATEGORIES_PATH: &str = "categories";
pub const TRANSACTIONS_PATH: &str = "transactions";

// Bank account views
pub const PAYPAL_ACCOUNTS_VIEW: &str = "paypal_accounts";
pub const STANDARD_BANK_ACCOUNTS_VIEW: &str = "standard_bank_accounts";
pub const UNEXPLAINED_VIEW: &str = "unexplained";

// Envelope root keys
pub const BANK_TRANSACTION_EXPLANATION_KEY: &str = "bank_transaction_explanation";

// Attachments
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_ATTACHMENT_DESCRIPTION: &str = "Attachment";
