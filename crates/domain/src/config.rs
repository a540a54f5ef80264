//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_APP_NAME, DEFAULT_REDIRECT_URI, DEFAULT_REFRESH_THRESHOLD_SECS, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, PRODUCTION_API_BASE_URL, SANDBOX_API_BASE_URL,
};
use crate::errors::{FreeAgentError, Result};

/// Settings for building a FreeAgent client
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeAgentConfig {
    /// Production API base URL; ignored when `sandbox` is set
    pub api_base_url: String,
    /// Talk to the sandbox API instead of production
    pub sandbox: bool,
    /// Redirect URI registered for the OAuth application
    pub redirect_uri: String,
    /// Keychain service prefix
    pub app_name: String,
    /// Request timeout for API and token calls
    pub timeout_secs: u64,
    /// Refresh the token this many seconds before it expires
    pub refresh_threshold_secs: i64,
    pub user_agent: String,
}

impl Default for FreeAgentConfig {
    fn default() -> Self {
        Self {
            api_base_url: PRODUCTION_API_BASE_URL.to_string(),
            sandbox: false,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            refresh_threshold_secs: DEFAULT_REFRESH_THRESHOLD_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FreeAgentConfig {
    /// Sandbox configuration with otherwise default settings
    #[must_use]
    pub fn sandbox() -> Self {
        Self { sandbox: true, ..Self::default() }
    }

    /// Effective API base URL, always ending with `/`
    #[must_use]
    pub fn base_url(&self) -> String {
        let base = if self.sandbox { SANDBOX_API_BASE_URL } else { self.api_base_url.as_str() };
        if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check values that would only fail later at request time
    ///
    /// # Errors
    /// Returns `FreeAgentError::Config` describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url();
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(FreeAgentError::Config(format!(
                "api_base_url must be an http(s) URL, got '{base}'"
            )));
        }
        if self.redirect_uri.trim().is_empty() {
            return Err(FreeAgentError::Config("redirect_uri must not be empty".to_string()));
        }
        if self.app_name.trim().is_empty() {
            return Err(FreeAgentError::Config("app_name must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(FreeAgentError::Config("timeout_secs must be positive".to_string()));
        }
        if self.refresh_threshold_secs < 0 {
            return Err(FreeAgentError::Config(
                "refresh_threshold_secs must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
