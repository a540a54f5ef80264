//! Configuration loader
//!
//! Loads client configuration from a file and environment variables.
//!
//! ## Loading Strategy
//! 1. If `FREEAGENT_CONFIG` is set, that file is loaded (it must exist)
//! 2. Otherwise the working directory is probed for a config file
//! 3. If no file is found, defaults are used
//! 4. Environment variables override whatever the file provided
//! 5. The result is validated
//!
//! ## Environment Variables
//! - `FREEAGENT_CONFIG`: Explicit config file path
//! - `FREEAGENT_API_BASE_URL`: Production API base URL
//! - `FREEAGENT_SANDBOX`: Use the sandbox API (true/false)
//! - `FREEAGENT_REDIRECT_URI`: OAuth redirect URI
//! - `FREEAGENT_APP_NAME`: Keychain service prefix
//! - `FREEAGENT_TIMEOUT_SECS`: Request timeout in seconds
//! - `FREEAGENT_REFRESH_THRESHOLD_SECS`: Proactive refresh window in seconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./freeagent.toml`, `./freeagent.json`
//! 2. `./config.toml`, `./config.json`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use freeagent_domain::{FreeAgentConfig, FreeAgentError, Result};

pub const CONFIG_PATH_VAR: &str = "FREEAGENT_CONFIG";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["freeagent.toml", "freeagent.json", "config.toml", "config.json"];

/// Load configuration with file, default and environment layering
///
/// # Errors
/// Returns `FreeAgentError::Config` if:
/// - `FREEAGENT_CONFIG` names a missing file
/// - A config file cannot be parsed
/// - An environment override has an invalid value
/// - The resulting configuration fails validation
pub fn load() -> Result<FreeAgentConfig> {
    let mut config = match std::env::var_os(CONFIG_PATH_VAR) {
        Some(path) => load_from_file(Some(PathBuf::from(path)))?,
        None => match probe_config_paths() {
            Some(path) => load_from_file(Some(path))?,
            None => {
                tracing::debug!("No config file found, using defaults");
                FreeAgentConfig::default()
            }
        },
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Default configuration with environment overrides applied
///
/// # Errors
/// Returns `FreeAgentError::Config` if an override has an invalid value or
/// the result fails validation.
pub fn load_from_env() -> Result<FreeAgentConfig> {
    let mut config = FreeAgentConfig::default();
    apply_env_overrides(&mut config)?;
    config.validate()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the working directory for config files.
/// Supports both JSON and TOML formats (detected by file extension). Fields
/// missing from the file keep their defaults.
///
/// # Errors
/// Returns `FreeAgentError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<FreeAgentConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FreeAgentError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FreeAgentError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FreeAgentError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Apply `FREEAGENT_*` environment overrides to `config`
///
/// # Errors
/// Returns `FreeAgentError::Config` naming the variable with an invalid value
pub fn apply_env_overrides(config: &mut FreeAgentConfig) -> Result<()> {
    if let Some(url) = env_string("FREEAGENT_API_BASE_URL") {
        config.api_base_url = url;
    }
    if let Some(sandbox) = env_bool("FREEAGENT_SANDBOX")? {
        config.sandbox = sandbox;
    }
    if let Some(uri) = env_string("FREEAGENT_REDIRECT_URI") {
        config.redirect_uri = uri;
    }
    if let Some(name) = env_string("FREEAGENT_APP_NAME") {
        config.app_name = name;
    }
    if let Some(timeout) = env_parse::<u64>("FREEAGENT_TIMEOUT_SECS")? {
        config.timeout_secs = timeout;
    }
    if let Some(threshold) = env_parse::<i64>("FREEAGENT_REFRESH_THRESHOLD_SECS")? {
        config.refresh_threshold_secs = threshold;
    }
    Ok(())
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `FreeAgentError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<FreeAgentConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FreeAgentError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FreeAgentError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(FreeAgentError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the working directory for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    std::env::current_dir().ok().and_then(|cwd| probe_config_paths_in(&cwd))
}

/// Probe `dir` for the standard config file names, in order
pub fn probe_config_paths_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)).find(|path| path.exists())
}

/// Non-empty environment variable
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| {
                FreeAgentError::Config(format!("Invalid value for {key} ('{value}'): {e}"))
            })
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str) -> Result<Option<bool>> {
    let Some(value) = env_string(key) else {
        return Ok(None);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(FreeAgentError::Config(format!("Invalid boolean for {key}: '{value}'"))),
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::{const_mutex, Mutex};

    use super::*;

    static ENV_LOCK: Mutex<()> = const_mutex(());

    const OVERRIDE_VARS: [&str; 6] = [
        "FREEAGENT_API_BASE_URL",
        "FREEAGENT_SANDBOX",
        "FREEAGENT_REDIRECT_URI",
        "FREEAGENT_APP_NAME",
        "FREEAGENT_TIMEOUT_SECS",
        "FREEAGENT_REFRESH_THRESHOLD_SECS",
    ];

    fn clear_overrides() {
        for key in OVERRIDE_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock();

        for value in ["1", "true", "yes", "on", "TRUE"] {
            std::env::set_var("FREEAGENT_TEST_BOOL", value);
            assert_eq!(env_bool("FREEAGENT_TEST_BOOL").unwrap(), Some(true), "{value}");
        }
        for value in ["0", "false", "no", "off"] {
            std::env::set_var("FREEAGENT_TEST_BOOL", value);
            assert_eq!(env_bool("FREEAGENT_TEST_BOOL").unwrap(), Some(false), "{value}");
        }

        std::env::set_var("FREEAGENT_TEST_BOOL", "maybe");
        assert!(matches!(env_bool("FREEAGENT_TEST_BOOL"), Err(FreeAgentError::Config(_))));

        std::env::remove_var("FREEAGENT_TEST_BOOL");
        assert_eq!(env_bool("FREEAGENT_TEST_BOOL").unwrap(), None);
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock();
        clear_overrides();

        std::env::set_var("FREEAGENT_API_BASE_URL", "http://127.0.0.1:9000/v2");
        std::env::set_var("FREEAGENT_REDIRECT_URI", "https://example.test/callback");
        std::env::set_var("FREEAGENT_APP_NAME", "bookkeeping");
        std::env::set_var("FREEAGENT_TIMEOUT_SECS", "12");
        std::env::set_var("FREEAGENT_REFRESH_THRESHOLD_SECS", "300");

        let config = load_from_env().unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:9000/v2/");
        assert_eq!(config.redirect_uri, "https://example.test/callback");
        assert_eq!(config.app_name, "bookkeeping");
        assert_eq!(config.timeout_secs, 12);
        assert_eq!(config.refresh_threshold_secs, 300);

        clear_overrides();
    }

    #[test]
    fn test_sandbox_override_wins_over_base_url() {
        let _guard = ENV_LOCK.lock();
        clear_overrides();

        std::env::set_var("FREEAGENT_SANDBOX", "yes");
        let config = load_from_env().unwrap();

        assert!(config.sandbox);
        assert_eq!(config.base_url(), "https://api.sandbox.freeagent.com/v2/");

        clear_overrides();
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock();
        clear_overrides();

        std::env::set_var("FREEAGENT_TIMEOUT_SECS", "soon");
        let err = load_from_env().unwrap_err();

        assert!(
            matches!(&err, FreeAgentError::Config(msg) if msg.contains("FREEAGENT_TIMEOUT_SECS"))
        );

        clear_overrides();
    }

    #[test]
    fn test_load_from_env_rejects_zero_timeout() {
        let _guard = ENV_LOCK.lock();
        clear_overrides();

        std::env::set_var("FREEAGENT_TIMEOUT_SECS", "0");

        assert!(matches!(load_from_env(), Err(FreeAgentError::Config(_))));

        clear_overrides();
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let _guard = ENV_LOCK.lock();
        clear_overrides();

        std::env::set_var("FREEAGENT_APP_NAME", "  ");

        assert_eq!(load_from_env().unwrap().app_name, "freeagent");

        clear_overrides();
    }

    #[test]
    fn test_parse_config_json() {
        let path = PathBuf::from("freeagent.json");
        let config = parse_config(r#"{"app_name": "books", "sandbox": true}"#, &path).unwrap();

        assert_eq!(config.app_name, "books");
        assert!(config.sandbox);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
api_base_url = "https://api.freeagent.com/v2"
timeout_secs = 45
"#;

        let path = PathBuf::from("freeagent.toml");
        let config = parse_config(toml_content, &path).unwrap();

        assert_eq!(config.timeout_secs, 45);
        assert_eq!(config.redirect_uri, "https://localhost/");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let path = PathBuf::from("freeagent.yaml");

        assert!(matches!(parse_config("app_name: x", &path), Err(FreeAgentError::Config(_))));
    }

    #[test]
    fn test_probe_prefers_freeagent_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        assert_eq!(probe_config_paths_in(dir.path()), Some(dir.path().join("config.json")));

        std::fs::write(dir.path().join("freeagent.toml"), "").unwrap();
        assert_eq!(probe_config_paths_in(dir.path()), Some(dir.path().join("freeagent.toml")));
    }

    #[test]
    fn test_probe_empty_dir_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(probe_config_paths_in(dir.path()), None);
    }
}
