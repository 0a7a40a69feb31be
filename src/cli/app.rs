//! Config resolution and process setup shared by the entry point

use std::env;

use tracing_subscriber::EnvFilter;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::TimeoutParseError;
use crate::domain::timeout::Timeout;
use crate::infrastructure::XdgConfigStore;

use super::args::{Cli, ConsoleOptions};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

pub const ENV_HOST: &str = "VOICE_RELAY_HOST";
pub const ENV_PORT: &str = "VOICE_RELAY_PORT";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the tracing subscriber. Respects RUST_LOG, logs to stderr.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Config carried by CLI flags
pub fn cli_config(cli: &Cli) -> AppConfig {
    AppConfig {
        host: cli.host.clone(),
        port: cli.port,
        timeout: cli.timeout.clone(),
        partial_results: if cli.no_partial { Some(false) } else { None },
        notify: if cli.notify { Some(true) } else { None },
        ..Default::default()
    }
}

/// Config carried by environment variables. A non-numeric port is ignored.
pub fn env_config(host: Option<String>, port: Option<String>) -> AppConfig {
    AppConfig {
        host: host.map(|h| h.trim().to_string()).filter(|h| !h.is_empty()),
        port: port.and_then(|p| p.trim().parse().ok()),
        ..Default::default()
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    let env_config = env_config(env::var(ENV_HOST).ok(), env::var(ENV_PORT).ok());

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Resolve console options, rejecting a malformed timeout
pub fn console_options(config: &AppConfig) -> Result<ConsoleOptions, TimeoutParseError> {
    let timeout = match config.timeout.as_deref() {
        Some(s) => s.parse::<Timeout>()?,
        None => Timeout::default(),
    };

    Ok(ConsoleOptions {
        endpoint: config.endpoint(),
        timeout,
        recognizer: config.recognizer_options(),
        notify: config.notify_or_default(),
    })
}
