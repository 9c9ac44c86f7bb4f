//! Token error types.
//!
//! Decode failures are undifferentiated: a wrong key, a tampered segment,
//! a mismatched header or a missing bearer header all surface as
//! [`TokenError::DecryptFailure`]. The underlying reason is only logged at
//! `debug`.

/// Errors returned by token issuance, decoding and refresh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// No encryption key was supplied per call or configured process-wide.
    #[error("Missing configuration: {key} is not set")]
    MissingKey {
        /// Name of the missing configuration key.
        key: &'static str,
    },

    /// The token could not be authenticated, decrypted or parsed.
    #[error("Invalid token")]
    DecryptFailure,

    /// The token is past its absolute lifetime.
    #[error("Token timed out")]
    TimedOut,

    /// A refresh was requested before the staleness window elapsed.
    #[error("Token does not need a refresh yet")]
    StillFresh,

    /// Sealing the payload failed while issuing a token.
    #[error("Failed to encrypt token: {message}")]
    EncryptFailure {
        /// Description of the encoding failure.
        message: String,
    },
}

impl TokenError {
    /// Creates a new `MissingKey` error.
    #[must_use]
    pub fn missing_key(key: &'static str) -> Self {
        Self::MissingKey { key }
    }

    /// Creates a new `EncryptFailure` error.
    #[must_use]
    pub fn encrypt_failure(message: impl Into<String>) -> Self {
        Self::EncryptFailure {
            message: message.into(),
        }
    }

    /// Returns `true` for deployment problems that retrying cannot fix.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::MissingKey { .. } | Self::EncryptFailure { .. })
    }

    /// Returns `true` if the presented token cannot be used to authenticate.
    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, Self::DecryptFailure | Self::TimedOut)
    }

    /// Returns `true` if the client has to log in again to obtain a new token.
    #[must_use]
    pub fn requires_reauthentication(&self) -> bool {
        self.is_authentication_error()
    }

    /// Short machine-readable code, used in HTTP error bodies.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingKey { .. } => "server_error",
            Self::DecryptFailure => "invalid_token",
            Self::TimedOut => "invalid_token",
            Self::StillFresh => "token_still_fresh",
            Self::EncryptFailure { .. } => "server_error",
        }
    }
}

/// Type alias for token operation results.
pub type TokenResult<T> = Result<T, TokenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_predicates() {
        assert!(TokenError::missing_key("token_key").is_configuration_error());
        assert!(TokenError::encrypt_failure("boom").is_configuration_error());
        assert!(!TokenError::DecryptFailure.is_configuration_error());

        assert!(TokenError::DecryptFailure.is_authentication_error());
        assert!(TokenError::TimedOut.requires_reauthentication());
        assert!(!TokenError::StillFresh.is_authentication_error());
    }

    #[test]
    fn test_missing_key_names_setting() {
        let err = TokenError::missing_key("token_key");
        assert_eq!(err.to_string(), "Missing configuration: token_key is not set");
    }

    #[test]
    fn test_decrypt_failure_carries_no_detail() {
        assert_eq!(TokenError::DecryptFailure.to_string(), "Invalid token");
        assert_eq!(TokenError::DecryptFailure.error_code(), "invalid_token");
    }
}
