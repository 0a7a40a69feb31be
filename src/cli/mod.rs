//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! the config subcommand and the console host.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod console_app;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, ConsoleOptions};
pub use console_app::run_console;
pub use presenter::Presenter;
