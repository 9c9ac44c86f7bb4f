//! Error response handling for token extractors.
//!
//! Implements `IntoResponse` for `TokenError` with an OAuth-style JSON body.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::TokenError;

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        let code = self.error_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = %message, "token operation failed");
        }

        let body = json!({
            "error": code,
            "error_description": message,
        });

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            let www_auth = build_www_authenticate_header(code, &message);
            if let Ok(value) = HeaderValue::from_str(&www_auth) {
                headers.insert(header::WWW_AUTHENTICATE, value);
            }
        }

        (status, headers, Json(body)).into_response()
    }
}

/// HTTP status for a token error.
#[must_use]
pub fn status_code(error: &TokenError) -> StatusCode {
    match error {
        TokenError::DecryptFailure | TokenError::TimedOut => StatusCode::UNAUTHORIZED,
        TokenError::StillFresh => StatusCode::CONFLICT,
        TokenError::MissingKey { .. } | TokenError::EncryptFailure { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Format: `Bearer error="invalid_token", error_description="..."`
fn build_www_authenticate_header(error: &str, description: &str) -> String {
    let escaped_desc = description.replace('"', "\\\"");
    format!("Bearer error=\"{error}\", error_description=\"{escaped_desc}\"")
}
