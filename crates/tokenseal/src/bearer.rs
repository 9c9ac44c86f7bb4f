//! Bearer token extraction from request headers.
//!
//! Accepted `Authorization` header shapes (case-insensitive scheme, any
//! surrounding whitespace):
//!
//! ```text
//! Bearer <token>
//! bearer: <token>
//! <token>
//! ```

use axum::http::{HeaderMap, Request, header::AUTHORIZATION, request::Parts};

const SCHEME: &str = "bearer";

/// Strip an optional `bearer` / `bearer:` prefix from a header value.
///
/// Returns `None` when nothing is left after stripping.
pub fn extract_bearer(header_value: &str) -> Option<&str> {
    let value = header_value.trim();

    let token = match value.get(..SCHEME.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(SCHEME) => {
            let rest = &value[SCHEME.len()..];
            match rest.chars().next() {
                None => rest,
                Some(':') => rest[1..].trim_start(),
                Some(c) if c.is_whitespace() => {
                    let rest = rest.trim_start();
                    rest.strip_prefix(':').map_or(rest, str::trim_start)
                }
                // `bearerXYZ` is a token that happens to start with the word
                Some(_) => value,
            }
        }
        _ => value,
    };

    (!token.is_empty()).then_some(token)
}

/// Something that carries an `Authorization` header.
pub trait BearerSource {
    /// The first `Authorization` header value, if present and valid UTF-8.
    fn authorization(&self) -> Option<&str>;

    /// The bearer token, with any scheme prefix stripped.
    fn bearer_token(&self) -> Option<&str> {
        self.authorization().and_then(extract_bearer)
    }
}

impl BearerSource for HeaderMap {
    fn authorization(&self) -> Option<&str> {
        self.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
    }
}

impl BearerSource for Parts {
    fn authorization(&self) -> Option<&str> {
        self.headers.authorization()
    }
}

impl<B> BearerSource for Request<B> {
    fn authorization(&self) -> Option<&str> {
        self.headers().authorization()
    }
}
