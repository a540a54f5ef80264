//! Category service - cached lookup by description and nominal code
//!
//! The `categories` endpoint is fetched at most once per cache lifetime;
//! [`CategoryService::reset_cache`] forces the next lookup to fetch again.

use std::fmt::Display;
use std::sync::Arc;

use freeagent_domain::constants::CATEGORIES_PATH;
use freeagent_domain::{Category, CategoryCache, Result};
use tracing::debug;

use crate::api_ports::AuthenticatedClient;

/// Category lookup service
pub struct CategoryService {
    client: Arc<dyn AuthenticatedClient>,
    cache: CategoryCache,
}

impl CategoryService {
    /// Create a new category service with an empty cache
    pub fn new(client: Arc<dyn AuthenticatedClient>) -> Self {
        Self { client, cache: CategoryCache::new() }
    }

    /// URL of the first category whose description contains `description`
    pub fn desc_id(&mut self, description: &str) -> Result<Option<String>> {
        Ok(self.cached()?.find_by_description(description).map(|c| c.url.clone()))
    }

    /// Nominal code of the first category whose description contains
    /// `description`
    pub fn desc_nominal_code(&mut self, description: &str) -> Result<Option<String>> {
        Ok(self.cached()?.find_by_description(description).map(|c| c.nominal_code.clone()))
    }

    /// URL of the category with this nominal code
    pub fn nominal_code_id(&mut self, nominal_code: impl Display) -> Result<Option<String>> {
        let code = nominal_code.to_string();
        Ok(self.cached()?.find_by_nominal_code(&code).map(|c| c.url.clone()))
    }

    /// Drop cached categories
    pub fn reset_cache(&mut self) {
        debug!("Category cache reset");
        self.cache.reset();
    }

    pub fn cache(&self) -> &CategoryCache {
        &self.cache
    }

    fn cached(&mut self) -> Result<&CategoryCache> {
        if !self.cache.loaded {
            let groups = self.client.get(CATEGORIES_PATH)?;
            let categories = Category::from_groups(&groups)?;
            debug!(count = categories.len(), "Loaded categories");
            self.cache.fill(categories);
        }
        Ok(&self.cache)
    }
}
