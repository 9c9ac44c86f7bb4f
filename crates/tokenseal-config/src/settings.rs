//! Process-wide token defaults.

use serde::Deserialize;

use crate::{ConfigError, TokenKey};

/// Default absolute token lifetime: one day.
pub const DEFAULT_TIMEOUT_SECS: u64 = 86_400;

/// Default staleness window before a refresh is due: 30 minutes.
pub const DEFAULT_REFRESH_SECS: u64 = 1_800;

/// Process-wide defaults for issuing and validating tokens.
///
/// Every field can be overridden per call; see `TokenOptions` in the core
/// crate. Only `token_key` has no default, and a call that resolves no key
/// at all fails with a missing-key error.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
    /// AES-128-GCM content-encryption key.
    pub token_key: Option<TokenKey>,

    /// Absolute token lifetime in seconds, counted from creation.
    pub timeout: u64,

    /// Staleness window in seconds, counted from the last refresh.
    pub refresh: u64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            token_key: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            refresh: DEFAULT_REFRESH_SECS,
        }
    }
}

impl TokenSettings {
    /// Defaults with the given key installed.
    pub fn with_key(key: TokenKey) -> Self {
        Self {
            token_key: Some(key),
            ..Self::default()
        }
    }

    /// Sets the absolute lifetime in seconds.
    #[must_use]
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Sets the staleness window in seconds.
    #[must_use]
    pub fn refresh(mut self, seconds: u64) -> Self {
        self.refresh = seconds;
        self
    }

    /// Checks the durations are usable.
    ///
    /// A refresh window longer than the lifetime is allowed (tokens then
    /// simply expire before they ever go stale) but is logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::validation("timeout must be > 0"));
        }
        if self.refresh == 0 {
            return Err(ConfigError::validation("refresh must be > 0"));
        }
        if self.refresh >= self.timeout {
            tracing::warn!(
                timeout = self.timeout,
                refresh = self.refresh,
                "refresh window is not shorter than token timeout; tokens will expire before refresh is due"
            );
        }
        Ok(())
    }
}
