//! Bank service - account lookup and transaction explanation

use std::path::Path;
use std::sync::Arc;

use freeagent_common::wire::WireRecord;
use freeagent_domain::constants::{
    BANK_ACCOUNTS_PATH, BANK_TRANSACTIONS_PATH, BANK_TRANSACTION_EXPLANATIONS_PATH,
    BANK_TRANSACTION_EXPLANATION_KEY, PAYPAL_ACCOUNTS_VIEW, STANDARD_BANK_ACCOUNTS_VIEW,
    UNEXPLAINED_VIEW,
};
use freeagent_domain::{
    BankAccount, BankAccountsResponse, BankTransaction, BankTransactionsResponse,
    ExplanationPayload, Result,
};
use tracing::{debug, info};

use crate::api_ports::{decode, encode, AuthenticatedClient};
use crate::attachment;

/// Bank account and explanation service
pub struct BankService {
    client: Arc<dyn AuthenticatedClient>,
}

impl BankService {
    /// Create a new bank service
    pub fn new(client: Arc<dyn AuthenticatedClient>) -> Self {
        Self { client }
    }

    /// Create a bank transaction explanation
    ///
    /// With `dry_run` the payload is converted and logged but nothing is sent;
    /// the result is then `None`.
    pub fn explain_transaction(
        &self,
        payload: &ExplanationPayload,
        dry_run: bool,
    ) -> Result<Option<WireRecord>> {
        let body = encode(payload)?;
        Self::log_explanation(payload, dry_run);
        if dry_run {
            return Ok(None);
        }

        let response = self.client.post(
            BANK_TRANSACTION_EXPLANATIONS_PATH,
            BANK_TRANSACTION_EXPLANATION_KEY,
            body,
        )?;
        Ok(Some(response))
    }

    /// Update an existing explanation at `url`
    pub fn explain_update(
        &self,
        url: &str,
        payload: &ExplanationPayload,
        dry_run: bool,
    ) -> Result<()> {
        let body = encode(payload)?;
        Self::log_explanation(payload, dry_run);
        if dry_run {
            return Ok(());
        }

        self.client.put(url, BANK_TRANSACTION_EXPLANATION_KEY, body)
    }

    /// Attach a file to `payload`; see [`attachment::attach_file`]
    pub fn attach_file(
        &self,
        payload: &mut ExplanationPayload,
        path: &Path,
        description: Option<&str>,
    ) -> Result<()> {
        attachment::attach_file(payload, path, description)
    }

    /// Unexplained transactions on the bank account with this id
    pub fn unexplained_transactions(&self, account_id: &str) -> Result<Vec<BankTransaction>> {
        let path = format!(
            "{BANK_TRANSACTIONS_PATH}?bank_account={}&view={UNEXPLAINED_VIEW}",
            urlencoding::encode(account_id)
        );
        let response: BankTransactionsResponse = decode(self.client.get(&path)?)?;
        debug!(
            account_id = %account_id,
            count = response.bank_transactions.len(),
            "Fetched unexplained transactions"
        );
        Ok(response.bank_transactions)
    }

    /// Id of the PayPal account named `name` (case-insensitive)
    pub fn paypal_id(&self, name: &str) -> Result<Option<String>> {
        let accounts = self.bank_accounts(PAYPAL_ACCOUNTS_VIEW)?;
        Ok(find_by_name(&accounts, name))
    }

    /// Id of the first PayPal account
    pub fn first_paypal_id(&self) -> Result<Option<String>> {
        let accounts = self.bank_accounts(PAYPAL_ACCOUNTS_VIEW)?;
        Ok(accounts.first().map(|account| account.id().to_string()))
    }

    /// Id of the standard bank account named `name` (case-insensitive)
    pub fn account_id(&self, name: &str) -> Result<Option<String>> {
        let accounts = self.bank_accounts(STANDARD_BANK_ACCOUNTS_VIEW)?;
        Ok(find_by_name(&accounts, name))
    }

    /// Id of the primary standard bank account
    pub fn primary_account_id(&self) -> Result<Option<String>> {
        let accounts = self.bank_accounts(STANDARD_BANK_ACCOUNTS_VIEW)?;
        Ok(accounts
            .iter()
            .find(|account| account.is_primary())
            .map(|account| account.id().to_string()))
    }

    /// Bank accounts in the given view
    pub fn bank_accounts(&self, view: &str) -> Result<Vec<BankAccount>> {
        let path = format!("{BANK_ACCOUNTS_PATH}?view={view}");
        let response: BankAccountsResponse = decode(self.client.get(&path)?)?;
        Ok(response.bank_accounts)
    }

    fn log_explanation(payload: &ExplanationPayload, dry_run: bool) {
        info!(
            description = payload.description.as_deref().unwrap_or_default(),
            gross_value = %payload.gross_value,
            dry_run,
            "Explaining bank transaction"
        );
    }
}

fn find_by_name(accounts: &[BankAccount], name: &str) -> Option<String> {
    accounts
        .iter()
        .find(|account| account.name_matches(name))
        .map(|account| account.id().to_string())
}
