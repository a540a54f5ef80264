//! Bank accounts and bank transactions

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::resource_id;

/// A bank, credit card or PayPal account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_primary: Option<bool>,
    #[serde(default, rename = "type")]
    pub account_type: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub current_balance: Option<Decimal>,
}

impl BankAccount {
    /// Last segment of the account URL
    #[must_use]
    pub fn id(&self) -> &str {
        resource_id(&self.url)
    }

    /// Case-insensitive name comparison
    #[must_use]
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.as_deref().is_some_and(|own| own.to_lowercase() == name.to_lowercase())
    }

    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.is_primary.unwrap_or(false)
    }
}

/// Body of `GET bank_accounts`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccountsResponse {
    #[serde(default)]
    pub bank_accounts: Vec<BankAccount>,
}

/// A line on a bank statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransaction {
    pub url: String,
    pub dated_on: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub bank_account: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub full_description: Option<String>,
    #[serde(default)]
    pub unexplained_amount: Option<Decimal>,
    #[serde(default)]
    pub is_manual: Option<bool>,
}

/// Body of `GET bank_transactions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransactionsResponse {
    #[serde(default)]
    pub bank_transactions: Vec<BankTransaction>,
}
