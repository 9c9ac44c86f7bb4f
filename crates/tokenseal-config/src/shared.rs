//! Write-once registry for the process-wide defaults.
//!
//! Install the loaded [`TokenSettings`] once during startup; token services
//! read them once when they are built. Nothing deeper in the call graph
//! reaches into this module.

use std::sync::OnceLock;

use crate::{ConfigError, TokenSettings};

static SHARED: OnceLock<TokenSettings> = OnceLock::new();

/// Install the process defaults. Fails if defaults were already installed.
pub fn install(settings: TokenSettings) -> Result<(), ConfigError> {
    SHARED
        .set(settings)
        .map_err(|_| ConfigError::validation("default token settings are already installed"))
}

/// The installed defaults, if any.
pub fn get() -> Option<&'static TokenSettings> {
    SHARED.get()
}
