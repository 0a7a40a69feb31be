//! Domain error types

use thiserror::Error;

/// Error when parsing a timeout string
#[derive(Debug, Clone, Error)]
#[error("Invalid timeout format: \"{input}\". Expected format: <number>ms, <number>s, <number>m, or <number>m<number>s (e.g., 500ms, 10s, 1m30s)")]
pub struct TimeoutParseError {
    pub input: String,
}

/// Error when PIN input is rejected.
/// A rejected input never mutates the PIN already entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PinError {
    #[error("PIN may only contain digits")]
    NonDigit,

    #[error("PIN may not be longer than 6 digits")]
    TooLong,

    #[error("PIN is already set for this session")]
    AlreadyAuthorized,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
