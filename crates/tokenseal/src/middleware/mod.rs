//! Axum integration.
//!
//! - [`SessionToken`] extracts and validates the bearer token of a request
//! - [`OptionalSessionToken`] does the same but tolerates anonymous requests
//! - `TokenError` implements `IntoResponse`, so extractor rejections and
//!   handler errors render as JSON with the right status code
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use tokenseal::middleware::SessionToken;
//!
//! async fn whoami(SessionToken(payload): SessionToken) -> String {
//!     format!("user {:?}", payload.get("userid"))
//! }
//!
//! let app = Router::new()
//!     .route("/whoami", get(whoami))
//!     .with_state(token_service);
//! ```

pub mod error;
pub mod session;

pub use session::{OptionalSessionToken, SessionToken};
