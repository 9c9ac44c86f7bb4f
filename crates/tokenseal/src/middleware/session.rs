//! Session token extractors.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};

use crate::error::TokenError;
use crate::options::TokenOptions;
use crate::payload::TokenPayload;
use crate::service::TokenService;

/// Axum extractor that decrypts the request's bearer token.
///
/// This extractor:
/// 1. Reads the `Authorization` header and strips the `Bearer` scheme
/// 2. Decrypts and authenticates the token with the service's default key
/// 3. Rejects tokens past their absolute lifetime
///
/// Stale tokens are accepted; handlers that want to rotate them can call
/// [`TokenService::needs_refresh`] and [`TokenService::refresh_token`].
///
/// # Errors
///
/// Rejects with [`TokenError::DecryptFailure`] for a missing or invalid
/// token and [`TokenError::TimedOut`] for an expired one.
pub struct SessionToken(pub TokenPayload);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = TokenError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let service = TokenService::from_ref(state);
        let options = TokenOptions::default();

        let payload = service.decrypt_request(&*parts, &options)?;

        if service.is_timed_out(&payload, &options) {
            tracing::debug!(created_at = payload.created_at, "Token timed out");
            return Err(TokenError::TimedOut);
        }

        tracing::debug!(
            created_at = payload.created_at,
            refreshed_at = payload.refreshed_at,
            "Token validated successfully"
        );

        Ok(SessionToken(payload))
    }
}

/// Axum extractor that optionally validates a session token.
///
/// Unlike [`SessionToken`], a request without an `Authorization` header is
/// accepted as anonymous. A header that is present but invalid is still
/// rejected.
pub struct OptionalSessionToken(pub Option<TokenPayload>);

impl<S> FromRequestParts<S> for OptionalSessionToken
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = TokenError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(OptionalSessionToken(None));
        }

        let SessionToken(payload) = SessionToken::from_request_parts(parts, state).await?;
        Ok(OptionalSessionToken(Some(payload)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::clock::FixedClock;
    use crate::key::TokenKey;
    use crate::payload::Claims;
    use axum::http::{HeaderValue, Request};
    use tokenseal_config::TokenSettings;

    const T0: i64 = 1_700_000_000;

    fn setup() -> (Arc<FixedClock>, TokenService, String) {
        let clock = Arc::new(FixedClock::new(T0));
        let service = TokenService::new(TokenSettings::with_key(TokenKey::generate()))
            .with_clock(clock.clone());
        let mut claims = Claims::new();
        claims.insert("userid".to_string(), 42.into());
        let token = service
            .generate_token(&claims, &TokenOptions::default())
            .unwrap();
        (clock, service, token)
    }

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_valid_token_extracted() {
        let (_clock, service, token) = setup();
        let mut parts = parts(Some(&format!("Bearer {token}")));

        let SessionToken(payload) = SessionToken::from_request_parts(&mut parts, &service)
            .await
            .unwrap();
        assert_eq!(payload.get("userid"), Some(42.into()));
        assert_eq!(payload.created_at, T0);
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let (_clock, service, _token) = setup();
        let mut parts = parts(None);

        let result = SessionToken::from_request_parts(&mut parts, &service).await;
        assert!(matches!(result, Err(TokenError::DecryptFailure)));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let (clock, service, token) = setup();
        clock.advance(86_401);
        let mut parts = parts(Some(&token));

        let result = SessionToken::from_request_parts(&mut parts, &service).await;
        assert!(matches!(result, Err(TokenError::TimedOut)));
    }

    #[tokio::test]
    async fn test_stale_token_accepted() {
        let (clock, service, token) = setup();
        clock.advance(1_801);
        let mut parts = parts(Some(&format!("bearer: {token}")));

        assert!(
            SessionToken::from_request_parts(&mut parts, &service)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_optional_extractor() {
        let (_clock, service, token) = setup();

        let mut anonymous = parts(None);
        let OptionalSessionToken(payload) =
            OptionalSessionToken::from_request_parts(&mut anonymous, &service)
                .await
                .unwrap();
        assert!(payload.is_none());

        let mut authed = parts(Some(&format!("Bearer {token}")));
        let OptionalSessionToken(payload) =
            OptionalSessionToken::from_request_parts(&mut authed, &service)
                .await
                .unwrap();
        assert!(payload.is_some());

        let mut garbage = parts(Some("Bearer .nope.nope.nope"));
        let result = OptionalSessionToken::from_request_parts(&mut garbage, &service).await;
        assert!(matches!(result, Err(TokenError::DecryptFailure)));
    }

    #[tokio::test]
    async fn test_optional_extractor_rejects_non_utf8_header() {
        let (_clock, service, _token) = setup();
        let mut parts = parts(None);
        parts.headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff.x").unwrap(),
        );

        let result = OptionalSessionToken::from_request_parts(&mut parts, &service).await;
        assert!(matches!(result, Err(TokenError::DecryptFailure)));
    }
}
