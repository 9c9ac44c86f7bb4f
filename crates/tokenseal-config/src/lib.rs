//! Configuration for tokenseal
//!
//! This crate owns everything the token core reads from its environment:
//! - The 128-bit symmetric [`TokenKey`] and its textual encodings
//! - [`TokenSettings`], the process-wide defaults (`token_key`, `timeout`, `refresh`)
//! - A loader merging an optional TOML file with `TOKENSEAL__*` environment overrides
//! - A write-once registry for the defaults, installed at startup
//!
//! # Example (TOML)
//!
//! ```toml
//! token_key = "000102030405060708090a0b0c0d0e0f"
//! timeout = 86400
//! refresh = 1800
//! ```

pub mod key;
pub mod loader;
pub mod settings;
pub mod shared;

pub use key::{KEY_SIZE, TokenKey};
pub use loader::load_settings;
pub use settings::{DEFAULT_REFRESH_SECS, DEFAULT_TIMEOUT_SECS, TokenSettings};

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::parse(err.to_string())
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
