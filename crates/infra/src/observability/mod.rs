//! Logging setup
//!
//! Installs a global `tracing-subscriber` `fmt` subscriber:
//!
//! - Filtering follows `RUST_LOG` (default `info`)
//! - `FREEAGENT_LOG_FORMAT=json` switches to JSON lines
//!
//! ```no_run
//! freeagent_infra::observability::init_tracing();
//! tracing::info!("client ready");
//! ```

use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_VAR: &str = "FREEAGENT_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Format selected by `FREEAGENT_LOG_FORMAT`
    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_VAR).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(format) if format.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Install the global subscriber
///
/// Returns `false` if a subscriber was already installed; calling this more
/// than once is harmless.
pub fn init_tracing() -> bool {
    init_tracing_with(LogFormat::from_env())
}

/// Install the global subscriber with an explicit format
pub fn init_tracing_with(format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Text => builder.try_init().is_ok(),
    };

    if installed {
        tracing::debug!(?format, "Tracing initialised");
    }
    installed
}
