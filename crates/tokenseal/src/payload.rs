//! Token plaintext: caller claims plus the two managed timestamps.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::UnixSeconds;

/// Caller-supplied claims.
///
/// Any JSON value is accepted; the serialized plaintext orders the
/// top-level keys.
pub type Claims = serde_json::Map<String, Value>;

/// Reserved claim holding the creation time.
pub const CREATED_AT_CLAIM: &str = "ct";

/// Reserved claim holding the last refresh time.
pub const REFRESHED_AT_CLAIM: &str = "rt";

/// The plaintext carried inside a token.
///
/// `claims` never contains the reserved keys: on construction any
/// caller-supplied `ct`/`rt` entries are dropped, so the timestamps always
/// win. On the wire the three parts are flattened into one JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPayload {
    pub claims: Claims,
    pub created_at: UnixSeconds,
    pub refreshed_at: UnixSeconds,
}

impl TokenPayload {
    /// Build a payload from explicit timestamps.
    pub fn new(mut claims: Claims, created_at: UnixSeconds, refreshed_at: UnixSeconds) -> Self {
        claims.remove(CREATED_AT_CLAIM);
        claims.remove(REFRESHED_AT_CLAIM);
        Self {
            claims,
            created_at,
            refreshed_at,
        }
    }

    /// A payload issued at `now`.
    pub fn issue(claims: Claims, now: UnixSeconds) -> Self {
        Self::new(claims, now, now)
    }

    /// Same claims and creation time, refreshed at `now`.
    #[must_use]
    pub fn refreshed(&self, now: UnixSeconds) -> Self {
        Self {
            claims: self.claims.clone(),
            created_at: self.created_at,
            refreshed_at: now,
        }
    }

    /// Look up a caller claim or one of the reserved timestamps.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            CREATED_AT_CLAIM => Some(Value::from(self.created_at)),
            REFRESHED_AT_CLAIM => Some(Value::from(self.refreshed_at)),
            _ => self.claims.get(key).cloned(),
        }
    }

    /// The flattened JSON object that gets encrypted.
    pub fn to_json_map(&self) -> Claims {
        let mut map = self.claims.clone();
        map.insert(CREATED_AT_CLAIM.to_string(), Value::from(self.created_at));
        map.insert(REFRESHED_AT_CLAIM.to_string(), Value::from(self.refreshed_at));
        map
    }

    /// Split a flattened JSON object back into claims and timestamps.
    ///
    /// Returns `None` if either timestamp is missing or not an integer.
    pub fn from_json_map(mut map: Claims) -> Option<Self> {
        let created_at = map.remove(CREATED_AT_CLAIM)?.as_i64()?;
        let refreshed_at = map.remove(REFRESHED_AT_CLAIM)?.as_i64()?;
        Some(Self {
            claims: map,
            created_at,
            refreshed_at,
        })
    }
}

impl Serialize for TokenPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Top-level keys sorted, independent of serde_json's `preserve_order`.
        let map = self.to_json_map();
        let sorted: BTreeMap<&String, &Value> = map.iter().collect();
        sorted.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TokenPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Claims::deserialize(deserializer)?;
        Self::from_json_map(map).ok_or_else(|| {
            de::Error::custom(format!(
                "token payload requires integer `{CREATED_AT_CLAIM}` and `{REFRESHED_AT_CLAIM}` claims"
            ))
        })
    }
}

impl From<TokenPayload> for Value {
    fn from(payload: TokenPayload) -> Self {
        Value::Object(payload.to_json_map())
    }
}
