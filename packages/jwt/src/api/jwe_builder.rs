//! Encryption stage builder

use crate::algorithms::ContentEncryptionAlgorithm;
use crate::claims::ClaimsSet;
use crate::error::JwtResult;
use crate::futures::TokenBuildFuture;
use crate::keys::KeyResolver;
use crate::stages::{self, JweHeaderConfig};
use crate::types::CompactToken;

/// What the JWE will carry
#[derive(Debug, Clone)]
pub enum JwePayload {
    /// Raw claims JSON
    Claims(ClaimsSet),
    /// A compact JWT, signed or unsigned
    Nested(CompactToken),
}

/// Payload waiting to be encrypted
pub struct JweBuilder {
    resolver: KeyResolver,
    payload: JwePayload,
    header: JweHeaderConfig,
}

impl JweBuilder {
    pub(crate) fn for_claims(resolver: KeyResolver, claims: ClaimsSet) -> Self {
        Self::new(resolver, JwePayload::Claims(claims))
    }

    pub(crate) fn for_nested(resolver: KeyResolver, token: CompactToken) -> Self {
        Self::new(resolver, JwePayload::Nested(token))
    }

    fn new(resolver: KeyResolver, payload: JwePayload) -> Self {
        Self {
            resolver,
            payload,
            header: JweHeaderConfig::default(),
        }
    }

    /// Key-encryption key id: selects the key from a JWK set and is written to `kid`
    #[must_use]
    pub fn key_id(mut self, kid: impl Into<String>) -> Self {
        self.header.key_id = Some(kid.into());
        self
    }

    /// Content encryption algorithm for this token
    #[must_use]
    pub fn content_algorithm(mut self, enc: ContentEncryptionAlgorithm) -> Self {
        self.header.content_algorithm = Some(enc);
        self
    }

    /// Payload that will be encrypted
    #[must_use]
    pub fn payload(&self) -> &JwePayload {
        &self.payload
    }

    /// Whether the payload is a nested JWT (`cty: JWT`)
    #[must_use]
    pub fn is_nested(&self) -> bool {
        matches!(self.payload, JwePayload::Nested(_))
    }

    /// Produce the compact JWE
    ///
    /// # Errors
    /// Returns `KeyResolution` when no key-encryption key is available, and
    /// any key, serialization or encryption failure
    pub fn encrypt(self) -> JwtResult<CompactToken> {
        let nested = self.is_nested();
        let plaintext = match &self.payload {
            JwePayload::Claims(claims) => claims.to_json()?,
            JwePayload::Nested(token) => token.as_str().as_bytes().to_vec(),
        };
        stages::encrypt(&self.resolver, &plaintext, nested, &self.header)
    }

    /// Encrypt on tokio's blocking pool
    #[must_use]
    pub fn encrypt_async(self) -> TokenBuildFuture {
        TokenBuildFuture::spawn(move || self.encrypt())
    }
}
