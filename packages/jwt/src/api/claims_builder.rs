//! Claims builder - first stage of a token build
//!
//! Claims accumulate in insertion order. Leaving this stage finalizes the
//! set, injecting `iat`, `exp`, `jti` and any configured defaults.

use super::{JweBuilder, JwsBuilder};
use crate::claims::{self, ClaimsSet, claim_value};
use crate::error::{JwtBuildError, JwtResult};
use crate::keys::KeyResolver;
use crate::types::CompactToken;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Accumulates claims for one token
#[derive(Clone)]
pub struct JwtClaimsBuilder {
    resolver: KeyResolver,
    claims: Map<String, Value>,
}

impl JwtClaimsBuilder {
    pub(crate) fn new(resolver: KeyResolver) -> Self {
        Self {
            resolver,
            claims: Map::new(),
        }
    }

    /// Insert or overwrite a claim
    ///
    /// # Errors
    /// Returns `JwtBuildError::InvalidClaim` if `name` is empty or `value`
    /// serializes to nothing representable (including JSON `null`)
    pub fn claim(mut self, name: &str, value: impl Serialize) -> JwtResult<Self> {
        let value = claim_value(name, value)?;
        self.claims.insert(name.to_string(), value);
        Ok(self)
    }

    /// Merge every member of a JSON object, overwriting existing claims
    ///
    /// # Errors
    /// Returns `JwtBuildError::InvalidClaim` if `claims` is not an object or
    /// one of its members is invalid
    pub fn claims_json(mut self, claims: Value) -> JwtResult<Self> {
        let Value::Object(members) = claims else {
            return Err(JwtBuildError::invalid_claim("claims must be a JSON object"));
        };
        for (name, value) in members {
            let value = claim_value(&name, value)?;
            self.claims.insert(name, value);
        }
        Ok(self)
    }

    /// Set `iss`
    #[must_use]
    pub fn issuer(self, issuer: impl Into<String>) -> Self {
        self.set(claims::ISSUER, Value::String(issuer.into()))
    }

    /// Set `sub`
    #[must_use]
    pub fn subject(self, subject: impl Into<String>) -> Self {
        self.set(claims::SUBJECT, Value::String(subject.into()))
    }

    /// Set `aud` to a single audience
    #[must_use]
    pub fn audience(self, audience: impl Into<String>) -> Self {
        self.set(claims::AUDIENCE, Value::String(audience.into()))
    }

    /// Set `aud` to a list of audiences
    #[must_use]
    pub fn audiences<I, S>(self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = audiences
            .into_iter()
            .map(|aud| Value::String(aud.into()))
            .collect();
        self.set(claims::AUDIENCE, Value::Array(list))
    }

    /// Set `iat`
    #[must_use]
    pub fn issued_at(self, at: DateTime<Utc>) -> Self {
        self.set(claims::ISSUED_AT, Value::from(at.timestamp()))
    }

    /// Set `exp`
    #[must_use]
    pub fn expires_at(self, at: DateTime<Utc>) -> Self {
        self.set(claims::EXPIRES_AT, Value::from(at.timestamp()))
    }

    /// Set `exp` relative to now, overriding the configured lifespan
    ///
    /// Lifespans beyond the representable range clamp to the latest (or
    /// earliest) supported instant.
    #[must_use]
    pub fn expires_in(self, lifespan: Duration) -> Self {
        let bound = if lifespan < Duration::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        };
        let at = Utc::now().checked_add_signed(lifespan).unwrap_or(bound);
        self.expires_at(at)
    }

    /// Set `nbf`
    #[must_use]
    pub fn not_before(self, at: DateTime<Utc>) -> Self {
        self.set(claims::NOT_BEFORE, Value::from(at.timestamp()))
    }

    /// Set `jti`
    #[must_use]
    pub fn jwt_id(self, jti: impl Into<String>) -> Self {
        self.set(claims::JWT_ID, Value::String(jti.into()))
    }

    fn set(mut self, name: &str, value: Value) -> Self {
        self.claims.insert(name.to_string(), value);
        self
    }

    /// Finalize the claims without entering a signing stage
    #[must_use]
    pub fn finalize_claims(self) -> ClaimsSet {
        ClaimsSet::finalize(self.claims, self.resolver.config())
    }

    /// Finalize the claims and move to the signing stage
    #[must_use]
    pub fn jws(self) -> JwsBuilder {
        let claims = ClaimsSet::finalize(self.claims, self.resolver.config());
        JwsBuilder::new(self.resolver, claims)
    }

    /// Finalize the claims and encrypt them directly, without a signature
    ///
    /// The resulting JWE carries no `cty` header.
    #[must_use]
    pub fn jwe(self) -> JweBuilder {
        let claims = ClaimsSet::finalize(self.claims, self.resolver.config());
        JweBuilder::for_claims(self.resolver, claims)
    }

    /// Sign with default header settings
    ///
    /// # Errors
    /// See [`JwsBuilder::sign`]
    pub fn sign(self) -> JwtResult<CompactToken> {
        self.jws().sign()
    }

    /// Sign, then hand the JWS to the encryption stage as a nested JWT
    ///
    /// # Errors
    /// See [`JwsBuilder::inner_sign`]
    pub fn inner_sign(self) -> JwtResult<JweBuilder> {
        self.jws().inner_sign()
    }

    /// Encrypt the raw claims with default header settings
    ///
    /// # Errors
    /// See [`JweBuilder::encrypt`]
    pub fn encrypt(self) -> JwtResult<CompactToken> {
        self.jwe().encrypt()
    }
}
