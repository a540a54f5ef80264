//! Ready-to-use FreeAgent client
//!
//! [`FreeAgent`] wires the pieces together: the credential store over a
//! keychain and prompt, the token manager over the OAuth client, the API
//! client over the token manager, and the accounting services over the API
//! client.

use std::sync::Arc;

use freeagent_common::auth::TerminalPrompt;
use freeagent_common::{
    CredentialStore, KeychainProvider, KeychainTrait, OAuthClient, OAuthConfig, Prompt,
    TokenManager,
};
use freeagent_core::{BankService, CategoryService, TransactionService};
use freeagent_domain::{FreeAgentConfig, FreeAgentError, Result};
use tracing::info;

use crate::api::{ApiClient, ApiClientConfig};
use crate::errors::InfraError;

/// Authenticated FreeAgent client with its accounting services
pub struct FreeAgent {
    config: FreeAgentConfig,
    tokens: Arc<TokenManager>,
    api: Arc<ApiClient>,
    bank: BankService,
    categories: CategoryService,
    transactions: TransactionService,
}

impl FreeAgent {
    /// Build a client from explicit secret storage and prompt
    ///
    /// No network or keychain access happens until the first request.
    ///
    /// # Errors
    /// Returns `FreeAgentError::Config` for an invalid configuration or if an
    /// HTTP client cannot be built
    pub fn new(
        config: FreeAgentConfig,
        keychain: Arc<dyn KeychainTrait>,
        prompt: Arc<dyn Prompt>,
    ) -> Result<Self> {
        config.validate()?;

        let oauth_config = OAuthConfig::new(config.base_url(), config.redirect_uri.clone());
        let oauth_client = OAuthClient::with_timeout(oauth_config, config.timeout())
            .map_err(|e| FreeAgentError::from(InfraError::from(e)))?;

        let store = CredentialStore::new(keychain, prompt, config.app_name.clone());
        let tokens = Arc::new(TokenManager::new(
            Arc::new(oauth_client),
            store,
            config.refresh_threshold_secs,
        ));

        let api = Arc::new(ApiClient::new(ApiClientConfig::from(&config), tokens.clone())?);

        info!(
            base_url = %config.base_url(),
            app_name = %config.app_name,
            "FreeAgent client ready"
        );

        Ok(Self {
            bank: BankService::new(api.clone()),
            categories: CategoryService::new(api.clone()),
            transactions: TransactionService::new(api.clone()),
            config,
            tokens,
            api,
        })
    }

    /// Build a client on the OS keychain and an interactive terminal prompt
    ///
    /// # Errors
    /// See [`FreeAgent::new`]
    pub fn with_platform_defaults(config: FreeAgentConfig) -> Result<Self> {
        Self::new(config, Arc::new(KeychainProvider), Arc::new(TerminalPrompt))
    }

    /// Build a client from [`crate::config::load`] on the platform defaults
    ///
    /// # Errors
    /// See [`crate::config::load`] and [`FreeAgent::new`]
    pub fn from_environment() -> Result<Self> {
        Self::with_platform_defaults(crate::config::load()?)
    }

    pub fn config(&self) -> &FreeAgentConfig {
        &self.config
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Run the interactive authorization grant now
    ///
    /// # Errors
    /// Returns `FreeAgentError::Auth` if the grant fails
    pub fn authenticate(&self) -> Result<()> {
        self.tokens.authenticate().map_err(|e| FreeAgentError::from(InfraError::from(e)))?;
        Ok(())
    }

    /// Forget the stored token
    ///
    /// # Errors
    /// Returns `FreeAgentError::Auth` if the keychain rejects the delete
    pub fn logout(&self) -> Result<()> {
        self.tokens.logout().map_err(|e| FreeAgentError::from(InfraError::from(e)))
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    pub fn bank(&self) -> &BankService {
        &self.bank
    }

    /// Category lookups; lookups fill the category cache
    pub fn categories(&mut self) -> &mut CategoryService {
        &mut self.categories
    }

    pub fn transactions(&self) -> &TransactionService {
        &self.transactions
    }
}
