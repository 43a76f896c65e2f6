//! Finalized claims set: the immutable snapshot handed to the signing stage

use crate::config::JwtBuildConfig;
use crate::error::{JwtBuildError, JwtResult};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

/// Issued-at claim name
pub const ISSUED_AT: &str = "iat";
/// Expiration claim name
pub const EXPIRES_AT: &str = "exp";
/// Token id claim name
pub const JWT_ID: &str = "jti";
/// Issuer claim name
pub const ISSUER: &str = "iss";
/// Audience claim name
pub const AUDIENCE: &str = "aud";
/// Subject claim name
pub const SUBJECT: &str = "sub";
/// Not-before claim name
pub const NOT_BEFORE: &str = "nbf";

/// Claims after default injection, in insertion order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClaimsSet {
    claims: Map<String, Value>,
}

impl ClaimsSet {
    /// Inject the default claims that are still missing, using the current time
    pub(crate) fn finalize(claims: Map<String, Value>, config: &JwtBuildConfig) -> Self {
        Self::finalize_at(claims, config, Utc::now().timestamp())
    }

    /// Inject the default claims that are still missing, with `now` as epoch seconds
    ///
    /// `exp` is computed from the effective `iat`, so a caller supplied
    /// issue time moves the default expiry with it.
    pub(crate) fn finalize_at(
        mut claims: Map<String, Value>,
        config: &JwtBuildConfig,
        now: i64,
    ) -> Self {
        let iat = match claims.get(ISSUED_AT).and_then(Value::as_i64) {
            Some(iat) => iat,
            None => {
                if !claims.contains_key(ISSUED_AT) {
                    claims.insert(ISSUED_AT.to_string(), Value::from(now));
                }
                now
            }
        };

        if !claims.contains_key(EXPIRES_AT) {
            let lifespan = i64::try_from(config.token_lifespan_seconds).unwrap_or(i64::MAX);
            claims.insert(EXPIRES_AT.to_string(), Value::from(iat.saturating_add(lifespan)));
        }
        if !claims.contains_key(JWT_ID) {
            claims.insert(
                JWT_ID.to_string(),
                Value::String(uuid::Uuid::new_v4().to_string()),
            );
        }
        if let Some(issuer) = &config.issuer {
            claims
                .entry(ISSUER)
                .or_insert_with(|| Value::String(issuer.clone()));
        }
        if let Some(audience) = &config.audience {
            claims
                .entry(AUDIENCE)
                .or_insert_with(|| Value::String(audience.clone()));
        }

        tracing::debug!(claims = claims.len(), "Finalized claims");
        Self { claims }
    }

    /// Value of a claim
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Whether a claim is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    /// Number of claims
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the set is empty; never true after finalization
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Claims in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.claims.iter()
    }

    /// Borrow the underlying JSON object
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// `iat` as epoch seconds
    #[must_use]
    pub fn issued_at(&self) -> Option<i64> {
        self.get(ISSUED_AT).and_then(Value::as_i64)
    }

    /// `exp` as epoch seconds
    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        self.get(EXPIRES_AT).and_then(Value::as_i64)
    }

    /// `jti`
    #[must_use]
    pub fn jwt_id(&self) -> Option<&str> {
        self.get(JWT_ID).and_then(Value::as_str)
    }

    /// Serialize to the JSON payload bytes
    ///
    /// # Errors
    /// Returns `JwtBuildError::Serialization` if serialization fails
    pub fn to_json(&self) -> JwtResult<Vec<u8>> {
        Ok(serde_json::to_vec(&self.claims)?)
    }
}

/// Validate a claim name and convert its value to JSON
pub(crate) fn claim_value(name: &str, value: impl Serialize) -> JwtResult<Value> {
    if name.is_empty() {
        return Err(JwtBuildError::invalid_claim("claim name must not be empty"));
    }
    let value = serde_json::to_value(value)
        .map_err(|e| JwtBuildError::invalid_claim(format!("claim '{name}': {e}")))?;
    if value.is_null() {
        return Err(JwtBuildError::invalid_claim(format!(
            "claim '{name}' must not be null"
        )));
    }
    Ok(value)
}
