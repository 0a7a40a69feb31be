//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

use crate::domain::dispatch::Endpoint;
use crate::domain::recognition::RecognizerOptions;
use crate::domain::timeout::Timeout;

/// VoiceRelay - speak commands, relay them to a remote endpoint
#[derive(Parser, Debug)]
#[command(name = "voice-relay")]
#[command(version)]
#[command(about = "Relay recognized speech to an HTTP endpoint, gated by a 6-digit PIN")]
#[command(long_about = None)]
pub struct Cli {
    /// Endpoint host (e.g., 192.168.1.1)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Endpoint port
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Dispatch request timeout (e.g., 500ms, 10s, 1m)
    #[arg(short = 't', long, value_name = "TIME")]
    pub timeout: Option<String>,

    /// Disable partial results while listening
    #[arg(long)]
    pub no_partial: bool,

    /// Show desktop notifications on failures
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed options for the console host
#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    pub endpoint: Endpoint,
    pub timeout: Timeout,
    pub recognizer: RecognizerOptions,
    pub notify: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "host",
    "port",
    "path",
    "timeout",
    "partial_results",
    "language_free_form",
    "notify",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
