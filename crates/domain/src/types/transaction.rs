//! Accounting transactions

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de::string_or_number;

/// One accounting transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub url: String,
    pub dated_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub description: String,
    pub category: String,
    pub category_name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub nominal_code: String,
    pub debit_value: Decimal,
    #[serde(default)]
    pub source_item_url: Option<String>,
    #[serde(default)]
    pub foreign_currency_data: Option<Value>,
}

/// Body of `GET transactions`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionsResponse {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}
