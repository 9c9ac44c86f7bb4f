//! Compact encrypted token codec.
//!
//! Tokens are JWE compact serializations using direct key agreement
//! (`"alg":"dir"`) and AES-128-GCM content encryption (`"enc":"A128GCM"`):
//!
//! ```text
//! b64u(header) . b64u(encrypted key) . b64u(iv) . b64u(ciphertext) . b64u(tag)
//! ```
//!
//! The protected header is the same for every token a deployment issues,
//! so it is stripped from the wire form and rebuilt by the receiver:
//!
//! ```text
//! b64u(encrypted key) . b64u(iv) . b64u(ciphertext) . b64u(tag)
//! ```
//!
//! With `dir` the encrypted key is empty, so every token starts with `.`.
//! The header segment is still the additional authenticated data, so a
//! receiver rebuilding a different header (other fields, other field order,
//! other whitespace) fails tag verification exactly like a wrong key does.
//!
//! ## Example
//!
//! ```ignore
//! use tokenseal::codec::TokenCodec;
//!
//! let codec = TokenCodec::new();
//! let token = codec.encode(&payload, &key)?;
//! let decoded = codec.decode(&token, &key)?;
//! assert_eq!(decoded, payload);
//! ```

use std::borrow::Cow;

use aes_gcm::{
    Aes128Gcm, Key, Nonce,
    aead::{Aead, KeyInit, Payload},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use serde::Serialize;

use crate::error::{TokenError, TokenResult};
use crate::key::TokenKey;
use crate::payload::TokenPayload;

/// IV size for AES-GCM (96 bits)
pub const IV_SIZE: usize = 12;

/// Authentication tag size for AES-GCM (128 bits)
pub const TAG_SIZE: usize = 16;

/// The canonical protected header, byte for byte.
pub const CANONICAL_HEADER_JSON: &str = r#"{"alg":"dir","enc":"A128GCM","typ":"JWT"}"#;

/// `dir` wraps no content-encryption key.
const ENCRYPTED_KEY_SEGMENT: &str = "";

// ============================================================================
// Protected Header
// ============================================================================

/// JOSE protected header.
///
/// Field declaration order is the serialization order, which must match
/// [`CANONICAL_HEADER_JSON`] for the default header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectedHeader {
    pub alg: Cow<'static, str>,
    pub enc: Cow<'static, str>,
    pub typ: Cow<'static, str>,
}

impl Default for ProtectedHeader {
    fn default() -> Self {
        Self {
            alg: Cow::Borrowed("dir"),
            enc: Cow::Borrowed("A128GCM"),
            typ: Cow::Borrowed("JWT"),
        }
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Encodes payloads into header-stripped compact tokens and back.
///
/// Holds only the base64url-encoded header segment, so it is cheap to clone
/// and safe to share across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCodec {
    header_segment: String,
}

impl Default for TokenCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCodec {
    /// Codec using the canonical `dir`/`A128GCM`/`JWT` header.
    #[must_use]
    pub fn new() -> Self {
        Self::from_header_json(CANONICAL_HEADER_JSON)
    }

    /// Codec using the serialization of `header`.
    ///
    /// # Errors
    /// Returns an error if the header cannot be serialized.
    pub fn with_header(header: &ProtectedHeader) -> TokenResult<Self> {
        let json = serde_json::to_string(header)
            .map_err(|e| TokenError::encrypt_failure(format!("invalid protected header: {e}")))?;
        Ok(Self::from_header_json(&json))
    }

    /// Codec using `json` verbatim as the protected header bytes.
    #[must_use]
    pub fn from_header_json(json: &str) -> Self {
        Self {
            header_segment: URL_SAFE_NO_PAD.encode(json.as_bytes()),
        }
    }

    /// The base64url header segment that is stripped from the wire form.
    #[must_use]
    pub fn header_segment(&self) -> &str {
        &self.header_segment
    }

    /// Encrypts `payload` under `key` with a fresh random IV.
    ///
    /// # Errors
    /// Returns [`TokenError::EncryptFailure`] if the payload cannot be
    /// serialized or sealed.
    pub fn encode(&self, payload: &TokenPayload, key: &TokenKey) -> TokenResult<String> {
        let plaintext = serde_json::to_vec(payload)
            .map_err(|e| TokenError::encrypt_failure(format!("payload serialization: {e}")))?;

        let mut iv = [0u8; IV_SIZE];
        rand::thread_rng().fill_bytes(&mut iv);

        let sealed = cipher(key)
            .encrypt(
                Nonce::from_slice(&iv),
                Payload {
                    msg: &plaintext,
                    aad: self.header_segment.as_bytes(),
                },
            )
            .map_err(|e| TokenError::encrypt_failure(format!("AEAD seal: {e}")))?;

        // aes-gcm appends the tag to the ciphertext
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_SIZE);

        Ok(format!(
            "{}.{}.{}.{}",
            ENCRYPTED_KEY_SEGMENT,
            URL_SAFE_NO_PAD.encode(iv),
            URL_SAFE_NO_PAD.encode(ciphertext),
            URL_SAFE_NO_PAD.encode(tag),
        ))
    }

    /// Rebuilds the full compact token, verifies and decrypts it.
    ///
    /// # Errors
    /// Returns [`TokenError::DecryptFailure`] for any malformed, tampered or
    /// foreign token. The concrete reason is logged at `debug` only.
    pub fn decode(&self, token: &str, key: &TokenKey) -> TokenResult<TokenPayload> {
        let compact = format!("{}.{}", self.header_segment, token);
        let segments: Vec<&str> = compact.split('.').collect();

        let [header, encrypted_key, iv, ciphertext, tag] = segments.as_slice() else {
            return Err(reject("expected four segments"));
        };

        if !encrypted_key.is_empty() {
            return Err(reject("unexpected encrypted key for dir"));
        }

        let iv = decode_segment(iv, "iv")?;
        if iv.len() != IV_SIZE {
            return Err(reject("iv has wrong length"));
        }

        let tag = decode_segment(tag, "tag")?;
        if tag.len() != TAG_SIZE {
            return Err(reject("tag has wrong length"));
        }

        let mut sealed = decode_segment(ciphertext, "ciphertext")?;
        sealed.extend_from_slice(&tag);

        let plaintext = cipher(key)
            .decrypt(
                Nonce::from_slice(&iv),
                Payload {
                    msg: &sealed,
                    aad: header.as_bytes(),
                },
            )
            .map_err(|_| reject("authentication failed"))?;

        serde_json::from_slice(&plaintext).map_err(|_| reject("payload is not a token object"))
    }
}

fn cipher(key: &TokenKey) -> Aes128Gcm {
    Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(key.as_bytes()))
}

fn decode_segment(segment: &str, name: &'static str) -> TokenResult<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(segment).map_err(|e| {
        tracing::debug!(segment = name, error = %e, "token segment is not base64url");
        TokenError::DecryptFailure
    })
}

fn reject(reason: &'static str) -> TokenError {
    tracing::debug!(reason, "token rejected");
    TokenError::DecryptFailure
}

// ============================================================================
// Tests
// ============================================================================
