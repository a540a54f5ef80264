//! Bank transaction explanation payloads

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of a `bank_transaction_explanation` create or update
///
/// `category`, `dated_on` and `gross_value` are always required;
/// `bank_transaction` is required when creating a new explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationPayload {
    pub category: String,
    pub dated_on: NaiveDate,
    pub gross_value: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bank_transaction: Option<String>,
    #[serde(default)]
    pub attachment: Option<Attachment>,
    #[serde(default)]
    pub transfer_bank_account: Option<String>,
}

impl ExplanationPayload {
    #[must_use]
    pub fn new(category: impl Into<String>, dated_on: NaiveDate, gross_value: Decimal) -> Self {
        Self {
            category: category.into(),
            dated_on,
            gross_value,
            description: None,
            bank_transaction: None,
            attachment: None,
            transfer_bank_account: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_bank_transaction(mut self, url: impl Into<String>) -> Self {
        self.bank_transaction = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_transfer_bank_account(mut self, url: impl Into<String>) -> Self {
        self.transfer_bank_account = Some(url.into());
        self
    }
}

/// File attached to an explanation, base64-encoded
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub description: String,
    pub content_type: String,
    pub data: String,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("description", &self.description)
            .field("content_type", &self.content_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}
