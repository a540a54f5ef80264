//! Transaction service

use std::sync::Arc;

use chrono::NaiveDate;
use freeagent_domain::constants::TRANSACTIONS_PATH;
use freeagent_domain::{Result, Transaction, TransactionsResponse};
use tracing::debug;

use crate::api_ports::{decode, AuthenticatedClient};

/// Transaction listing service
pub struct TransactionService {
    client: Arc<dyn AuthenticatedClient>,
}

impl TransactionService {
    /// Create a new transaction service
    pub fn new(client: Arc<dyn AuthenticatedClient>) -> Self {
        Self { client }
    }

    /// Transactions in `category` (a category URL) between two dates,
    /// inclusive
    pub fn transactions(
        &self,
        category: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let path = format!(
            "{TRANSACTIONS_PATH}?category={}&from_date={}&to_date={}",
            urlencoding::encode(category),
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d"),
        );
        let response: TransactionsResponse = decode(self.client.get(&path)?)?;
        debug!(category = %category, count = response.transactions.len(), "Fetched transactions");
        Ok(response.transactions)
    }
}
