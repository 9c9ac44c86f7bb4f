//! Symmetric token key (AES-128)
//!
//! The key is an opaque 16-byte secret. It can be written in configuration
//! as 32 hex characters or as base64 (standard or url-safe alphabet, with or
//! without padding).

use std::fmt;
use std::str::FromStr;

use base64::{
    Engine,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD},
};
use rand::RngCore;
use serde::{Deserialize, Deserializer};

use crate::ConfigError;

/// Key size for AES-128 (128 bits)
pub const KEY_SIZE: usize = 16;

/// A 128-bit symmetric key used directly as the content-encryption key.
///
/// `Debug` is redacted and there is no `Display`, so the key cannot end up
/// in logs by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenKey([u8; KEY_SIZE]);

impl TokenKey {
    /// Wrap raw key bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Copy key bytes from a slice, which must be exactly [`KEY_SIZE`] long
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            ConfigError::invalid_key(format!(
                "Key must be {} bytes, got {}",
                KEY_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }

    /// Generate a new random key
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut key);
        Self(key)
    }

    /// Parse a key from a hex or base64 string
    pub fn parse(key_str: &str) -> Result<Self, ConfigError> {
        let key_str = key_str.trim();

        // Try hex first
        if key_str.len() == KEY_SIZE * 2 && key_str.bytes().all(|b| b.is_ascii_hexdigit()) {
            let bytes = hex::decode(key_str)
                .map_err(|e| ConfigError::invalid_key(format!("Invalid hex key: {e}")))?;
            return Self::from_slice(&bytes);
        }

        let bytes = [STANDARD, URL_SAFE, STANDARD_NO_PAD, URL_SAFE_NO_PAD]
            .iter()
            .find_map(|engine| engine.decode(key_str).ok())
            .ok_or_else(|| ConfigError::invalid_key("Key is neither hex nor base64"))?;

        Self::from_slice(&bytes)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Lowercase hex encoding, suitable for pasting into configuration
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for TokenKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; KEY_SIZE]> for TokenKey {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenKey(<redacted>)")
    }
}

impl<'de> Deserialize<'de> for TokenKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
