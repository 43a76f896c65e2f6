//! Build configuration: key locations per role, default claims and algorithms

use crate::algorithms::{ContentEncryptionAlgorithm, SignatureAlgorithm};
use crate::error::{JwtBuildError, JwtResult};
use crate::keys::{KeyFormat, KeyRole};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where and how to find the key for one role
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Resource location of the key material; `None` means no key configured
    #[serde(default)]
    pub location: Option<String>,
    /// Encoding of the material stored at `location`
    #[serde(default)]
    pub format: KeyFormat,
    /// Key id used to select a key from a JWK set when the caller sets none
    #[serde(default)]
    pub key_id: Option<String>,
    /// When false the key is reported as unavailable even if it exists
    #[serde(default = "default_available")]
    pub available: bool,
}

impl KeyConfig {
    /// PEM key stored at `location`
    #[must_use]
    pub fn pem(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            format: KeyFormat::Pem,
            ..Self::default()
        }
    }

    /// JWK or JWK set stored at `location`
    #[must_use]
    pub fn jwk(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            format: KeyFormat::Jwk,
            ..Self::default()
        }
    }

    /// Set the key id used for JWK set selection
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Set the availability toggle
    #[must_use]
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            location: None,
            format: KeyFormat::default(),
            key_id: None,
            available: default_available(),
        }
    }
}

/// Configuration read by every build
///
/// An issuer keeps one immutable snapshot of this and hands it to each build,
/// so replacing it between builds changes the outcome of later builds only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtBuildConfig {
    /// Private key used for JWS signing
    #[serde(default)]
    pub signing_key: KeyConfig,
    /// Public key used for JWE key encryption
    #[serde(default)]
    pub encryption_key: KeyConfig,
    /// Lifespan added to `iat` when `exp` is not set
    #[serde(default = "default_token_lifespan")]
    pub token_lifespan_seconds: u64,
    /// Default `iss` claim
    #[serde(default)]
    pub issuer: Option<String>,
    /// Default `aud` claim
    #[serde(default)]
    pub audience: Option<String>,
    /// Signature algorithm used when the caller requests none; otherwise the key decides
    #[serde(default)]
    pub signature_algorithm: Option<SignatureAlgorithm>,
    /// Content encryption algorithm used when the caller requests none
    #[serde(default)]
    pub content_encryption_algorithm: ContentEncryptionAlgorithm,
    /// INSECURE: emit `alg: none` tokens when no signing key is available.
    ///
    /// Only meant for test and development setups. With this off a missing
    /// signing key is a [`JwtBuildError::KeyResolution`] error.
    #[serde(default)]
    pub allow_unsigned_fallback: bool,
}

fn default_available() -> bool {
    true
}

fn default_token_lifespan() -> u64 {
    300 // 5 minutes
}

impl Default for JwtBuildConfig {
    fn default() -> Self {
        Self {
            signing_key: KeyConfig::default(),
            encryption_key: KeyConfig::default(),
            token_lifespan_seconds: default_token_lifespan(),
            issuer: None,
            audience: None,
            signature_algorithm: None,
            content_encryption_algorithm: ContentEncryptionAlgorithm::default(),
            allow_unsigned_fallback: false,
        }
    }
}

impl JwtBuildConfig {
    /// Empty configuration: no keys, 300 second lifespan, fallback disabled
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration document
    ///
    /// # Errors
    /// Returns `JwtBuildError::Config` if the document is malformed or fails validation
    pub fn from_json_str(json: &str) -> JwtResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| JwtBuildError::config(format!("Invalid JSON configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    ///
    /// # Errors
    /// Returns `JwtBuildError::Config` if the file cannot be read or parsed
    pub fn from_json_file(path: impl AsRef<Path>) -> JwtResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            JwtBuildError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Check the invariants the pipeline relies on
    ///
    /// # Errors
    /// Returns `JwtBuildError::Config` for a zero lifespan or an empty key location
    pub fn validate(&self) -> JwtResult<()> {
        if self.token_lifespan_seconds == 0 {
            return Err(JwtBuildError::config(
                "token_lifespan_seconds must be greater than zero",
            ));
        }
        for role in [KeyRole::Signing, KeyRole::KeyEncryption] {
            if self.key(role).location.as_deref() == Some("") {
                return Err(JwtBuildError::config(format!(
                    "{role} key location must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Key configuration for `role`
    #[must_use]
    pub fn key(&self, role: KeyRole) -> &KeyConfig {
        match role {
            KeyRole::Signing => &self.signing_key,
            KeyRole::KeyEncryption => &self.encryption_key,
        }
    }

    /// Set the signing key configuration
    #[must_use]
    pub fn with_signing_key(mut self, key: KeyConfig) -> Self {
        self.signing_key = key;
        self
    }

    /// Set the key-encryption key configuration
    #[must_use]
    pub fn with_encryption_key(mut self, key: KeyConfig) -> Self {
        self.encryption_key = key;
        self
    }

    /// Set the default token lifespan in seconds
    #[must_use]
    pub fn with_token_lifespan(mut self, seconds: u64) -> Self {
        self.token_lifespan_seconds = seconds;
        self
    }

    /// Set the default `iss` claim
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the default `aud` claim
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Set the default signature algorithm
    #[must_use]
    pub fn with_signature_algorithm(mut self, alg: SignatureAlgorithm) -> Self {
        self.signature_algorithm = Some(alg);
        self
    }

    /// Set the default content encryption algorithm
    #[must_use]
    pub fn with_content_encryption_algorithm(mut self, enc: ContentEncryptionAlgorithm) -> Self {
        self.content_encryption_algorithm = enc;
        self
    }

    /// Enable or disable the insecure `alg: none` fallback
    #[must_use]
    pub fn with_unsigned_fallback(mut self, allow: bool) -> Self {
        self.allow_unsigned_fallback = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = JwtBuildConfig::default();
        assert_eq!(config.token_lifespan_seconds, 300);
        assert!(!config.allow_unsigned_fallback);
        assert!(config.signing_key.available);
        assert_eq!(config.signing_key.format, KeyFormat::Pem);
        assert!(config.signing_key.location.is_none());
        assert_eq!(
            config.content_encryption_algorithm,
            ContentEncryptionAlgorithm::A256GCM
        );
    }

    #[test]
    fn test_from_json_applies_field_defaults() {
        let config = JwtBuildConfig::from_json_str(
            r#"{
                "signing_key": { "location": "/privateKey.pem" },
                "encryption_key": { "location": "/publicKey.jwk", "format": "jwk", "key_id": "key1" },
                "signature_algorithm": "RS384",
                "allow_unsigned_fallback": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.signing_key, KeyConfig::pem("/privateKey.pem"));
        assert_eq!(
            config.encryption_key,
            KeyConfig::jwk("/publicKey.jwk").with_key_id("key1")
        );
        assert_eq!(config.signature_algorithm, Some(SignatureAlgorithm::RS384));
        assert_eq!(config.token_lifespan_seconds, 300);
        assert!(config.allow_unsigned_fallback);
    }

    #[test]
    fn test_validation_rejects_zero_lifespan() {
        let err = JwtBuildConfig::from_json_str(r#"{ "token_lifespan_seconds": 0 }"#).unwrap_err();
        assert!(matches!(err, JwtBuildError::Config(_)));
    }

    #[test]
    fn test_validation_rejects_empty_location() {
        let config = JwtBuildConfig::new().with_encryption_key(KeyConfig::pem(""));
        assert!(matches!(config.validate(), Err(JwtBuildError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = JwtBuildConfig::from_json_file("/nonexistent/jwt-build.json").unwrap_err();
        assert!(matches!(err, JwtBuildError::Config(_)));
    }
}
