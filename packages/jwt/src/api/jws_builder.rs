//! Signing stage builder

use super::JweBuilder;
use crate::algorithms::SignatureAlgorithm;
use crate::claims::ClaimsSet;
use crate::error::JwtResult;
use crate::futures::TokenBuildFuture;
use crate::keys::KeyResolver;
use crate::stages::{self, JwsHeaderConfig};
use crate::types::CompactToken;

/// Finalized claims waiting to be signed
pub struct JwsBuilder {
    resolver: KeyResolver,
    claims: ClaimsSet,
    header: JwsHeaderConfig,
}

impl JwsBuilder {
    pub(crate) fn new(resolver: KeyResolver, claims: ClaimsSet) -> Self {
        Self {
            resolver,
            claims,
            header: JwsHeaderConfig::default(),
        }
    }

    /// Signing key id: selects the key from a JWK set and is written to `kid`
    #[must_use]
    pub fn key_id(mut self, kid: impl Into<String>) -> Self {
        self.header.key_id = Some(kid.into());
        self
    }

    /// Explicit signature algorithm
    ///
    /// Once set, a missing signing key is an error even when the unsigned
    /// fallback is enabled.
    #[must_use]
    pub fn algorithm(mut self, alg: SignatureAlgorithm) -> Self {
        self.header.algorithm = Some(alg);
        self
    }

    /// Claims that will be signed
    #[must_use]
    pub fn claims(&self) -> &ClaimsSet {
        &self.claims
    }

    /// Produce the compact JWS
    ///
    /// # Errors
    /// Returns `KeyResolution` when no signing key is available and the
    /// unsigned fallback does not apply, and any key, serialization or
    /// signing failure
    pub fn sign(self) -> JwtResult<CompactToken> {
        stages::sign(&self.resolver, &self.claims, &self.header)
    }

    /// Sign and move to the encryption stage with the JWS as nested payload
    ///
    /// # Errors
    /// Same as [`JwsBuilder::sign`]
    pub fn inner_sign(self) -> JwtResult<JweBuilder> {
        let token = stages::sign(&self.resolver, &self.claims, &self.header)?;
        Ok(JweBuilder::for_nested(self.resolver, token))
    }

    /// Sign on tokio's blocking pool
    #[must_use]
    pub fn sign_async(self) -> TokenBuildFuture {
        TokenBuildFuture::spawn(move || self.sign())
    }
}
