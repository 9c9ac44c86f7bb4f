//! Per-call overrides of the process defaults.

use tokenseal_config::{TokenKey, TokenSettings};

/// Optional per-call configuration.
///
/// Any field left as `None` falls back to the [`TokenSettings`] the
/// service was built with.
///
/// # Example
///
/// ```ignore
/// let options = TokenOptions::default().refresh(300);
/// let token = service.generate_token(&claims, &options)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenOptions {
    /// Encryption key for this call.
    pub key: Option<TokenKey>,
    /// Absolute lifetime in seconds.
    pub timeout: Option<u64>,
    /// Staleness window in seconds.
    pub refresh: Option<u64>,
}

impl TokenOptions {
    /// Options carrying only a key.
    pub fn with_key(key: TokenKey) -> Self {
        Self {
            key: Some(key),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn key(mut self, key: TokenKey) -> Self {
        self.key = Some(key);
        self
    }

    #[must_use]
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    #[must_use]
    pub fn refresh(mut self, seconds: u64) -> Self {
        self.refresh = Some(seconds);
        self
    }

    pub fn resolve_timeout(&self, defaults: &TokenSettings) -> u64 {
        self.timeout.unwrap_or(defaults.timeout)
    }

    pub fn resolve_refresh(&self, defaults: &TokenSettings) -> u64 {
        self.refresh.unwrap_or(defaults.refresh)
    }
}
