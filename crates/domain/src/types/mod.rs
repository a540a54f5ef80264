//! Domain types and models
//!
//! Records mirror the FreeAgent JSON resources. Money is `rust_decimal::Decimal`
//! so amounts survive the round trip exactly; dates are `chrono` values.

pub mod bank;
pub mod category;
pub mod explanation;
pub mod transaction;

pub use bank::{BankAccount, BankAccountsResponse, BankTransaction, BankTransactionsResponse};
pub use category::{Category, CategoryCache};
pub use explanation::{Attachment, ExplanationPayload};
pub use transaction::{Transaction, TransactionsResponse};

/// Id of a resource: the last segment of its URL
///
/// `https://api.freeagent.com/v2/bank_accounts/123` yields `123`.
#[must_use]
pub fn resource_id(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    trimmed.rsplit_once('/').map_or(trimmed, |(_, id)| id)
}

/// Serde helpers shared by the record types
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accept a string or a number and keep its textual form
    pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number, found {other}"
            ))),
        }
    }
}
