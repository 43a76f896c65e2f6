//! Key resolution policy for the signing and key-encryption roles

use super::{jwk::JwkSet, pem, EncryptionKey, KeyFormat, KeyRole, KeySource, SigningKey};
use crate::config::JwtBuildConfig;
use crate::error::JwtResult;
use std::sync::Arc;

/// Outcome of resolving a role
#[derive(Debug)]
pub enum Resolution<K> {
    /// Key located and parsed
    Key(K),
    /// No key for this role; carries the reason
    NotAvailable(&'static str),
}

impl<K> Resolution<K> {
    /// The key, if one was resolved
    pub fn into_key(self) -> Option<K> {
        match self {
            Resolution::Key(key) => Some(key),
            Resolution::NotAvailable(_) => None,
        }
    }

    /// Whether a key was resolved
    pub fn is_available(&self) -> bool {
        matches!(self, Resolution::Key(_))
    }
}

/// Effective key description for one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    /// Role being resolved
    pub role: KeyRole,
    /// Configured location
    pub location: Option<String>,
    /// Configured format
    pub format: KeyFormat,
    /// Id used to select a key from a JWK set
    pub key_id: Option<String>,
    /// Availability toggle
    pub available: bool,
}

/// Locates and loads keys from the current configuration
///
/// Resolution is stateless: nothing is cached, every call reads the
/// configuration snapshot and the key source again.
#[derive(Clone)]
pub struct KeyResolver {
    config: Arc<JwtBuildConfig>,
    source: Arc<dyn KeySource>,
}

impl KeyResolver {
    /// Resolver over a configuration snapshot and a key source
    pub fn new(config: Arc<JwtBuildConfig>, source: Arc<dyn KeySource>) -> Self {
        Self { config, source }
    }

    /// Configuration this resolver reads
    #[must_use]
    pub fn config(&self) -> &JwtBuildConfig {
        &self.config
    }

    /// Key description for `role`; a caller supplied key id wins over the configured one
    #[must_use]
    pub fn spec(&self, role: KeyRole, requested_kid: Option<&str>) -> KeySpec {
        let key = self.config.key(role);
        KeySpec {
            role,
            location: key.location.clone(),
            format: key.format,
            key_id: requested_kid.map(str::to_owned).or_else(|| key.key_id.clone()),
            available: key.available,
        }
    }

    /// Resolve the signing key
    ///
    /// # Errors
    /// Returns `KeyLoad`, `InvalidKey` or `KeyNotFound` when a configured key
    /// cannot be loaded. An unconfigured or disabled key is not an error.
    pub fn resolve_signing(&self, requested_kid: Option<&str>) -> JwtResult<Resolution<SigningKey>> {
        self.resolve(
            KeyRole::Signing,
            requested_kid,
            pem::parse_signing_key,
            |set, kid| set.select(kid)?.to_signing_key(),
        )
    }

    /// Resolve the key-encryption key
    ///
    /// # Errors
    /// Returns `KeyLoad`, `InvalidKey`, `KeyNotFound` or `UnsupportedAlgorithm`
    /// when a configured key cannot be loaded. An unconfigured or disabled key
    /// is not an error.
    pub fn resolve_key_encryption(
        &self,
        requested_kid: Option<&str>,
    ) -> JwtResult<Resolution<EncryptionKey>> {
        self.resolve(
            KeyRole::KeyEncryption,
            requested_kid,
            pem::parse_encryption_key,
            |set, kid| set.select(kid)?.to_encryption_key(),
        )
    }

    fn resolve<K>(
        &self,
        role: KeyRole,
        requested_kid: Option<&str>,
        from_pem: fn(&[u8]) -> JwtResult<K>,
        from_jwk: fn(&JwkSet, Option<&str>) -> JwtResult<K>,
    ) -> JwtResult<Resolution<K>> {
        let spec = self.spec(role, requested_kid);

        if !spec.available {
            tracing::warn!(%role, "Key disabled by configuration");
            return Ok(Resolution::NotAvailable("key disabled by configuration"));
        }
        let Some(location) = spec.location.as_deref() else {
            tracing::debug!(%role, "No key location configured");
            return Ok(Resolution::NotAvailable("no key location configured"));
        };

        let material = self.source.read(location)?;
        let key = match spec.format {
            KeyFormat::Pem => from_pem(&material)?,
            KeyFormat::Jwk => from_jwk(&JwkSet::parse(&material)?, spec.key_id.as_deref())?,
        };

        tracing::debug!(%role, location, format = %spec.format, "Resolved key");
        Ok(Resolution::Key(key))
    }
}
