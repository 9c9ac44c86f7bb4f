//! Key resolution.
//!
//! The key is looked up per call, first in the [`TokenOptions`] and then in
//! the process defaults. The resolved key is borrowed for the duration of
//! the call; nothing here copies or caches it.

use tokenseal_config::TokenSettings;

pub use tokenseal_config::{KEY_SIZE, TokenKey};

use crate::error::{TokenError, TokenResult};
use crate::options::TokenOptions;

/// Name of the configuration setting holding the key.
pub const TOKEN_KEY_SETTING: &str = "token_key";

/// Resolve the key for a call.
///
/// # Errors
///
/// Returns [`TokenError::MissingKey`] when neither the options nor the
/// defaults carry a key. This is a deployment error, not a per-request one.
pub fn resolve_key<'a>(
    options: &'a TokenOptions,
    defaults: &'a TokenSettings,
) -> TokenResult<&'a TokenKey> {
    options
        .key
        .as_ref()
        .or(defaults.token_key.as_ref())
        .ok_or_else(|| {
            tracing::error!(setting = TOKEN_KEY_SETTING, "no token key configured");
            TokenError::missing_key(TOKEN_KEY_SETTING)
        })
}

/// Generate a fresh random 128-bit key.
pub fn generate_key() -> TokenKey {
    TokenKey::generate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_call_key_wins() {
        let default_key = generate_key();
        let call_key = generate_key();
        let defaults = TokenSettings::with_key(default_key.clone());
        let options = TokenOptions::with_key(call_key.clone());

        assert_eq!(resolve_key(&options, &defaults).unwrap(), &call_key);
        assert_eq!(
            resolve_key(&TokenOptions::default(), &defaults).unwrap(),
            &default_key
        );
    }

    #[test]
    fn test_missing_key() {
        let options = TokenOptions::default();
        let settings = TokenSettings::default();
        let result = resolve_key(&options, &settings);
        assert_eq!(result, Err(TokenError::missing_key("token_key")));
    }

    #[test]
    fn test_generate_key_length() {
        assert_eq!(generate_key().as_bytes().len(), KEY_SIZE);
    }
}
