//! # tokenseal
//!
//! Stateless, encrypted session tokens.
//!
//! A token carries caller-supplied claims plus two managed timestamps, its
//! creation time (`ct`) and last refresh time (`rt`), sealed with
//! AES-128-GCM under a single symmetric key. Everything needed to validate
//! or refresh a token lives inside the token; the server keeps no session
//! records.
//!
//! ## Modules
//!
//! - [`key`] - Key resolution and generation
//! - [`clock`] - Time source, with a fixed clock for tests
//! - [`payload`] - Claims and timestamps
//! - [`codec`] - Header-stripped JWE compact encoding (`dir` + `A128GCM`)
//! - [`lifecycle`] - Fresh / stale / expired classification and refresh
//! - [`bearer`] - Bearer token extraction from request headers
//! - [`service`] - [`TokenService`], the public operations
//! - [`middleware`] - Axum extractors and error responses
//!
//! ## Example
//!
//! ```ignore
//! use tokenseal::{TokenOptions, TokenService};
//! use tokenseal_config::load_settings;
//!
//! let service = TokenService::new(load_settings(None)?);
//! let token = service.generate_token(&claims, &TokenOptions::default())?;
//! let payload = service.decrypt_token(&token, &TokenOptions::default())?;
//! ```

pub mod bearer;
pub mod clock;
pub mod codec;
pub mod error;
pub mod key;
pub mod lifecycle;
pub mod middleware;
pub mod options;
pub mod payload;
pub mod service;

pub use bearer::{BearerSource, extract_bearer};
pub use clock::{Clock, FixedClock, SystemClock, UnixSeconds};
pub use codec::{ProtectedHeader, TokenCodec};
pub use error::{TokenError, TokenResult};
pub use key::{TokenKey, generate_key, resolve_key};
pub use lifecycle::{Lifecycle, TokenState};
pub use middleware::{OptionalSessionToken, SessionToken};
pub use options::TokenOptions;
pub use payload::{CREATED_AT_CLAIM, Claims, REFRESHED_AT_CLAIM, TokenPayload};
pub use service::TokenService;
pub use tokenseal_config::TokenSettings;
