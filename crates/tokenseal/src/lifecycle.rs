//! Token lifecycle: fresh, stale or expired.
//!
//! Classification is a pure function of the payload timestamps, the
//! configured windows and the current time. Nothing is stored server-side.
//!
//! ```text
//!  created_at                refreshed_at + refresh      created_at + timeout
//!      |---------- Fresh ----------|-------- Stale ----------|---- Expired ---->
//! ```
//!
//! Both bounds are exclusive: a token is stale only once strictly more than
//! `refresh` seconds have passed, and expired only once strictly more than
//! `timeout` seconds have passed.

use crate::clock::UnixSeconds;
use crate::error::{TokenError, TokenResult};
use crate::payload::TokenPayload;

/// Where a token stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenState {
    /// Valid and not yet due for refresh.
    Fresh,
    /// Valid, but the staleness window has elapsed; issue a refreshed token.
    Stale,
    /// Past its absolute lifetime; the client must re-authenticate.
    Expired,
}

impl TokenState {
    /// Returns `true` unless the token has expired.
    #[must_use]
    pub fn is_valid(self) -> bool {
        !matches!(self, Self::Expired)
    }
}

/// `true` iff more than `timeout` seconds passed since creation.
pub fn is_expired(payload: &TokenPayload, timeout: u64, now: UnixSeconds) -> bool {
    elapsed_exceeds(payload.created_at, timeout, now)
}

/// `true` iff more than `refresh` seconds passed since the last refresh.
pub fn needs_refresh(payload: &TokenPayload, refresh: u64, now: UnixSeconds) -> bool {
    elapsed_exceeds(payload.refreshed_at, refresh, now)
}

fn elapsed_exceeds(since: UnixSeconds, window: u64, now: UnixSeconds) -> bool {
    let window = i64::try_from(window).unwrap_or(i64::MAX);
    now.saturating_sub(since) > window
}

/// Timeout and refresh windows, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub timeout: u64,
    pub refresh: u64,
}

impl Lifecycle {
    pub fn new(timeout: u64, refresh: u64) -> Self {
        Self { timeout, refresh }
    }

    pub fn is_expired(&self, payload: &TokenPayload, now: UnixSeconds) -> bool {
        is_expired(payload, self.timeout, now)
    }

    pub fn needs_refresh(&self, payload: &TokenPayload, now: UnixSeconds) -> bool {
        needs_refresh(payload, self.refresh, now)
    }

    /// Classify the token. Expiry takes priority over staleness.
    pub fn classify(&self, payload: &TokenPayload, now: UnixSeconds) -> TokenState {
        if self.is_expired(payload, now) {
            TokenState::Expired
        } else if self.needs_refresh(payload, now) {
            TokenState::Stale
        } else {
            TokenState::Fresh
        }
    }

    /// Derive the refreshed payload for a stale token.
    ///
    /// # Errors
    /// - [`TokenError::TimedOut`] if the token has expired, stale or not
    /// - [`TokenError::StillFresh`] if no refresh is due yet
    pub fn refresh(&self, payload: &TokenPayload, now: UnixSeconds) -> TokenResult<TokenPayload> {
        match self.classify(payload, now) {
            TokenState::Expired => {
                tracing::debug!(created_at = payload.created_at, "refresh refused: token timed out");
                Err(TokenError::TimedOut)
            }
            TokenState::Fresh => Err(TokenError::StillFresh),
            TokenState::Stale => {
                tracing::debug!(
                    created_at = payload.created_at,
                    refreshed_at = payload.refreshed_at,
                    "refreshing stale token"
                );
                Ok(payload.refreshed(now))
            }
        }
    }
}
