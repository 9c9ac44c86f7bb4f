//! Settings loader: optional TOML file, then environment overrides.

use std::path::PathBuf;

use config::{Config, Environment, File};

use crate::{ConfigError, TokenSettings};

/// File read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tokenseal.toml";

/// Environment prefix, e.g. `TOKENSEAL__TOKEN_KEY`, `TOKENSEAL__TIMEOUT`.
pub const ENV_PREFIX: &str = "TOKENSEAL";

/// Load token settings.
///
/// Sources in increasing priority:
/// 1. built-in defaults
/// 2. the TOML file at `path` (or `tokenseal.toml` in the working directory), if it exists
/// 3. `TOKENSEAL__*` environment variables
pub fn load_settings(path: Option<&str>) -> Result<TokenSettings, ConfigError> {
    let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));

    let mut builder = Config::builder();
    if pathbuf.exists() {
        builder = builder.add_source(File::from(pathbuf));
    } else if path.is_some() {
        tracing::warn!(path = %pathbuf.display(), "token config file not found, using defaults");
    }

    // Values stay strings here; a hex key made only of digits must not be
    // coerced into a number before it reaches the key parser.
    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let settings: TokenSettings = builder.build()?.try_deserialize()?;
    settings.validate()?;

    if settings.token_key.is_none() {
        tracing::warn!("token_key is not configured; every call must supply its own key");
    }
    tracing::info!(
        timeout = settings.timeout,
        refresh = settings.refresh,
        "token settings loaded"
    );

    Ok(settings)
}
