//! Token service.
//!
//! [`TokenService`] ties together the process defaults, a [`Clock`] and the
//! [`TokenCodec`], and exposes the public token operations. Every method is
//! a pure function of its arguments, the defaults captured at construction
//! and the current time, so one service can be cloned into any number of
//! threads or handlers.
//!
//! ## Example
//!
//! ```ignore
//! use tokenseal::{Claims, TokenOptions, TokenService, TokenSettings};
//!
//! let service = TokenService::new(TokenSettings::with_key(key));
//! let token = service.generate_token(&claims, &TokenOptions::default())?;
//!
//! let payload = service.decrypt_token(&token, &TokenOptions::default())?;
//! if service.needs_refresh(&payload, &TokenOptions::default()) {
//!     let refreshed = service.refresh_token(&payload, &TokenOptions::default())?;
//! }
//! ```

use std::sync::Arc;

use tokenseal_config::{TokenSettings, shared};

use crate::bearer::BearerSource;
use crate::clock::{Clock, SystemClock, UnixSeconds};
use crate::codec::TokenCodec;
use crate::error::{TokenError, TokenResult};
use crate::key::{TokenKey, generate_key, resolve_key};
use crate::lifecycle::{Lifecycle, TokenState};
use crate::options::TokenOptions;
use crate::payload::{Claims, TokenPayload};

/// Issues, decrypts and refreshes tokens.
#[derive(Debug, Clone)]
pub struct TokenService {
    defaults: TokenSettings,
    clock: Arc<dyn Clock>,
    codec: TokenCodec,
}

impl TokenService {
    /// Creates a service with explicit defaults and the system clock.
    #[must_use]
    pub fn new(defaults: TokenSettings) -> Self {
        Self {
            defaults,
            clock: Arc::new(SystemClock),
            codec: TokenCodec::new(),
        }
    }

    /// Creates a service from the defaults installed in
    /// [`tokenseal_config::shared`], or built-in defaults if none were.
    #[must_use]
    pub fn from_shared() -> Self {
        let defaults = shared::get().cloned().unwrap_or_else(|| {
            tracing::warn!("no shared token settings installed, using built-in defaults");
            TokenSettings::default()
        });
        Self::new(defaults)
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the codec, e.g. to bind tokens to a non-default header.
    #[must_use]
    pub fn with_codec(mut self, codec: TokenCodec) -> Self {
        self.codec = codec;
        self
    }

    /// The defaults this service falls back to.
    #[must_use]
    pub fn defaults(&self) -> &TokenSettings {
        &self.defaults
    }

    /// Current time according to the service clock.
    #[must_use]
    pub fn now(&self) -> UnixSeconds {
        self.clock.now()
    }

    /// Generates a fresh random key.
    #[must_use]
    pub fn generate_key() -> TokenKey {
        generate_key()
    }

    /// Issues a new token for `claims`, created and refreshed now.
    ///
    /// Claims named `ct` or `rt` are replaced by the timestamps.
    ///
    /// # Errors
    /// Returns [`TokenError::MissingKey`] if no key is configured.
    pub fn generate_token(&self, claims: &Claims, options: &TokenOptions) -> TokenResult<String> {
        let payload = TokenPayload::issue(claims.clone(), self.now());
        self.encode_payload(&payload, options)
    }

    /// Encrypts an already-built payload as is.
    ///
    /// # Errors
    /// Returns [`TokenError::MissingKey`] if no key is configured.
    pub fn encode_payload(&self, payload: &TokenPayload, options: &TokenOptions) -> TokenResult<String> {
        let key = resolve_key(options, &self.defaults)?;
        self.codec.encode(payload, key)
    }

    /// Decrypts an encoded token.
    ///
    /// Only authenticity is checked here; use [`is_timed_out`](Self::is_timed_out)
    /// or [`classify`](Self::classify) for the lifecycle.
    ///
    /// # Errors
    /// - [`TokenError::MissingKey`] if no key is configured
    /// - [`TokenError::DecryptFailure`] for any invalid token
    pub fn decrypt_token(&self, token: &str, options: &TokenOptions) -> TokenResult<TokenPayload> {
        let key = resolve_key(options, &self.defaults)?;
        self.codec.decode(token, key)
    }

    /// Extracts the bearer token from a request and decrypts it.
    ///
    /// # Errors
    /// Returns [`TokenError::DecryptFailure`] without attempting decryption
    /// if the request has no authorization header or no token in it.
    pub fn decrypt_request<R>(&self, request: &R, options: &TokenOptions) -> TokenResult<TokenPayload>
    where
        R: BearerSource + ?Sized,
    {
        let token = request.bearer_token().ok_or_else(|| {
            tracing::debug!("no bearer token in request");
            TokenError::DecryptFailure
        })?;
        self.decrypt_token(token, options)
    }

    /// Issues a refreshed token for a stale payload.
    ///
    /// The new token keeps the claims and creation time and is refreshed now.
    ///
    /// # Errors
    /// - [`TokenError::TimedOut`] if the token has expired
    /// - [`TokenError::StillFresh`] if no refresh is due yet
    /// - [`TokenError::MissingKey`] if no key is configured
    pub fn refresh_token(&self, payload: &TokenPayload, options: &TokenOptions) -> TokenResult<String> {
        let refreshed = self.lifecycle(options).refresh(payload, self.now())?;
        self.encode_payload(&refreshed, options)
    }

    /// Decrypts `token`, then behaves like [`refresh_token`](Self::refresh_token).
    ///
    /// # Errors
    /// Decode failures surface as [`TokenError::DecryptFailure`], before any
    /// lifecycle check.
    pub fn refresh_encoded(&self, token: &str, options: &TokenOptions) -> TokenResult<String> {
        let payload = self.decrypt_token(token, options)?;
        self.refresh_token(&payload, options)
    }

    /// `true` if the payload is past its absolute lifetime.
    pub fn is_timed_out(&self, payload: &TokenPayload, options: &TokenOptions) -> bool {
        self.lifecycle(options).is_expired(payload, self.now())
    }

    /// `true` if the staleness window has elapsed.
    pub fn needs_refresh(&self, payload: &TokenPayload, options: &TokenOptions) -> bool {
        self.lifecycle(options).needs_refresh(payload, self.now())
    }

    /// Lifecycle state of the payload right now.
    pub fn classify(&self, payload: &TokenPayload, options: &TokenOptions) -> TokenState {
        self.lifecycle(options).classify(payload, self.now())
    }

    fn lifecycle(&self, options: &TokenOptions) -> Lifecycle {
        Lifecycle::new(
            options.resolve_timeout(&self.defaults),
            options.resolve_refresh(&self.defaults),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
    use serde_json::json;

    const T0: UnixSeconds = 1_700_000_000;

    fn claims(value: serde_json::Value) -> Claims {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("claims must be an object"),
        }
    }

    fn service_at(clock: &Arc<FixedClock>) -> TokenService {
        TokenService::new(TokenSettings::with_key(TokenKey::generate())).with_clock(clock.clone())
    }

    #[test]
    fn test_generate_then_decrypt() {
        let clock = Arc::new(FixedClock::new(T0));
        let service = service_at(&clock);
        let options = TokenOptions::default();

        let token = service.generate_token(&claims(json!({"userid": 42})), &options).unwrap();
        let payload = service.decrypt_token(&token, &options).unwrap();

        assert_eq!(
            serde_json::Value::from(payload),
            json!({"userid": 42, "ct": T0, "rt": T0})
        );
    }

    #[test]
    fn test_missing_key() {
        let service = TokenService::new(TokenSettings::default());
        let result = service.generate_token(&Claims::new(), &TokenOptions::default());
        assert_eq!(result, Err(TokenError::missing_key("token_key")));

        let result = service.decrypt_token(".a.b.c", &TokenOptions::default());
        assert!(matches!(result, Err(TokenError::MissingKey { .. })));
    }

    #[test]
    fn test_per_call_key() {
        let service = TokenService::new(TokenSettings::default());
        let options = TokenOptions::with_key(TokenKey::generate());

        let token = service.generate_token(&claims(json!({"a": 1})), &options).unwrap();
        assert!(service.decrypt_token(&token, &options).is_ok());

        let other = TokenOptions::with_key(TokenKey::generate());
        assert_eq!(
            service.decrypt_token(&token, &other),
            Err(TokenError::DecryptFailure)
        );
    }

    #[test]
    fn test_decrypt_request() {
        let clock = Arc::new(FixedClock::new(T0));
        let service = service_at(&clock);
        let options = TokenOptions::default();
        let token = service.generate_token(&claims(json!({"userid": 1})), &options).unwrap();

        let mut headers = HeaderMap::new();
        assert_eq!(
            service.decrypt_request(&headers, &options),
            Err(TokenError::DecryptFailure)
        );

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(
            service.decrypt_request(&headers, &options),
            Err(TokenError::DecryptFailure)
        );

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("bearer: {token}")).unwrap(),
        );
        let payload = service.decrypt_request(&headers, &options).unwrap();
        assert_eq!(payload.get("userid"), Some(json!(1)));
    }

    #[test]
    fn test_refresh_flow() {
        let clock = Arc::new(FixedClock::new(T0));
        let service = service_at(&clock);
        let options = TokenOptions::default();
        let token = service.generate_token(&claims(json!({"userid": 42})), &options).unwrap();

        clock.set(T0 + 1_799);
        assert_eq!(
            service.refresh_encoded(&token, &options),
            Err(TokenError::StillFresh)
        );

        clock.set(T0 + 1_801);
        let refreshed = service.refresh_encoded(&token, &options).unwrap();
        let payload = service.decrypt_token(&refreshed, &options).unwrap();
        assert_eq!(payload.created_at, T0);
        assert_eq!(payload.refreshed_at, T0 + 1_801);
        assert_eq!(payload.get("userid"), Some(json!(42)));
        assert!(!service.needs_refresh(&payload, &options));

        clock.set(T0 + 86_401);
        assert!(service.is_timed_out(&payload, &options));
        assert_eq!(
            service.refresh_token(&payload, &options),
            Err(TokenError::TimedOut)
        );
    }

    #[test]
    fn test_refresh_encoded_rejects_garbage() {
        let clock = Arc::new(FixedClock::new(T0));
        let service = service_at(&clock);
        assert_eq!(
            service.refresh_encoded("not-a-token", &TokenOptions::default()),
            Err(TokenError::DecryptFailure)
        );
    }

    #[test]
    fn test_option_windows_override_defaults() {
        let clock = Arc::new(FixedClock::new(T0));
        let service = service_at(&clock);
        let payload = TokenPayload::issue(Claims::new(), T0);

        clock.set(T0 + 61);
        let short = TokenOptions::default().timeout(60).refresh(10);
        assert_eq!(service.classify(&payload, &short), TokenState::Expired);
        assert_eq!(
            service.classify(&payload, &TokenOptions::default()),
            TokenState::Fresh
        );
    }

    #[test]
    fn test_concurrent_generation() {
        let service = TokenService::new(TokenSettings::with_key(TokenKey::generate()));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                std::thread::spawn(move || {
                    let token = service
                        .generate_token(&claims(json!({"n": i})), &TokenOptions::default())
                        .unwrap();
                    let payload = service
                        .decrypt_token(&token, &TokenOptions::default())
                        .unwrap();
                    assert_eq!(payload.get("n"), Some(json!(i)));
                    token
                })
            })
            .collect();

        let mut tokens: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        tokens.sort();
        tokens.dedup();
        assert_eq!(tokens.len(), 8);
    }
}
