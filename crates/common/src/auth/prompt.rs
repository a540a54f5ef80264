//! Interactive boundary for secrets and browser authorization
//!
//! The token manager never talks to a terminal directly. It asks a [`Prompt`]
//! for a secret or for the redirect URL the user lands on after approving the
//! application, so tests and headless callers can substitute their own.

use thiserror::Error;
#[cfg(feature = "platform")]
use tracing::warn;

/// Prompt failures
#[derive(Debug, Error)]
pub enum PromptError {
    /// No user is available to answer
    #[error("prompt unavailable in non-interactive context")]
    NonInteractive,

    /// The terminal interaction itself failed
    #[error("prompt I/O failed: {0}")]
    Io(String),
}

/// Source of user-supplied secrets and authorization redirects
pub trait Prompt: Send + Sync {
    /// Ask for a secret without echoing it
    ///
    /// # Errors
    /// Returns `PromptError::NonInteractive` when no user can answer
    fn secret(&self, prompt_text: &str) -> Result<String, PromptError>;

    /// Show `auth_url` and return the redirect URL the user pastes back
    ///
    /// # Errors
    /// Returns `PromptError::NonInteractive` when no user can answer
    fn authorize(&self, auth_url: &str) -> Result<String, PromptError>;
}

/// Prompt that always refuses; for services and CI
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractivePrompt;

impl Prompt for NonInteractivePrompt {
    fn secret(&self, _prompt_text: &str) -> Result<String, PromptError> {
        Err(PromptError::NonInteractive)
    }

    fn authorize(&self, _auth_url: &str) -> Result<String, PromptError> {
        Err(PromptError::NonInteractive)
    }
}

/// Terminal prompt backed by `dialoguer`
#[cfg(feature = "platform")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

#[cfg(feature = "platform")]
impl Prompt for TerminalPrompt {
    fn secret(&self, prompt_text: &str) -> Result<String, PromptError> {
        dialoguer::Password::new()
            .with_prompt(prompt_text)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PromptError::Io(e.to_string()))
    }

    fn authorize(&self, auth_url: &str) -> Result<String, PromptError> {
        let opened = match open::that(auth_url) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Could not open browser for authorization");
                false
            }
        };

        dialoguer::Input::<String>::new()
            .with_prompt(authorize_prompt_text(auth_url, opened))
            .interact_text()
            .map_err(|e| PromptError::Io(e.to_string()))
    }
}

#[cfg(feature = "platform")]
/// Text shown while waiting for the redirect URL
///
/// The URL is always included so it can be opened by hand.
fn authorize_prompt_text(auth_url: &str, browser_opened: bool) -> String {
    let lead = if browser_opened {
        "Approve access in the browser window that just opened"
    } else {
        "Could not open a browser. Open this URL and approve access"
    };
    format!("{lead}:\n{auth_url}\nPaste the URL you were redirected to")
}
