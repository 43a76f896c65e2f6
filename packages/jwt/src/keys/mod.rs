//! Key material: roles, formats, resolved key variants and the resolver
//!
//! Keys are located by a configured location string, read through a
//! [`KeySource`] and parsed according to the configured [`KeyFormat`]. The
//! format is a tag matched once at resolution time; a resolved key is a
//! tagged variant, so stages never inspect key types at runtime.

mod jwk;
mod pem;
mod resolver;
mod source;

pub use jwk::{Jwk, JwkSet};
pub use resolver::{KeyResolver, KeySpec, Resolution};
pub use source::{FileKeySource, KeySource, MemoryKeySource};

use crate::algorithms::{KeyEncryptionAlgorithm, SignatureAlgorithm};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

/// Logical purpose a key is resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// Private key signing the JWS
    Signing,
    /// Public key wrapping the JWE content encryption key
    KeyEncryption,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::Signing => f.write_str("signing"),
            KeyRole::KeyEncryption => f.write_str("key-encryption"),
        }
    }
}

/// Encoding of the key material stored at a location
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyFormat {
    /// PEM armored PKCS#8, PKCS#1 or SPKI
    #[default]
    Pem,
    /// JSON Web Key or JSON Web Key set
    Jwk,
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyFormat::Pem => f.write_str("PEM"),
            KeyFormat::Jwk => f.write_str("JWK"),
        }
    }
}

/// Private key resolved for the signing role
pub enum SigningKey {
    /// RSA private key (RS256/RS384/RS512)
    Rsa(rsa::RsaPrivateKey),
    /// NIST P-256 private key (ES256)
    EcP256(p256::ecdsa::SigningKey),
    /// Shared HMAC secret (HS256/HS384/HS512)
    Hmac(Zeroizing<Vec<u8>>),
}

impl SigningKey {
    /// Algorithm used when neither the caller nor the configuration picks one
    #[must_use]
    pub fn natural_algorithm(&self) -> SignatureAlgorithm {
        match self {
            SigningKey::Rsa(_) => SignatureAlgorithm::RS256,
            SigningKey::EcP256(_) => SignatureAlgorithm::ES256,
            SigningKey::Hmac(_) => SignatureAlgorithm::HS256,
        }
    }

    /// Whether this key can produce signatures for `alg`
    #[must_use]
    pub fn supports(&self, alg: SignatureAlgorithm) -> bool {
        use SignatureAlgorithm as A;
        matches!(
            (self, alg),
            (SigningKey::Rsa(_), A::RS256 | A::RS384 | A::RS512)
                | (SigningKey::EcP256(_), A::ES256)
                | (SigningKey::Hmac(_), A::HS256 | A::HS384 | A::HS512)
        )
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            SigningKey::Rsa(_) => "RSA",
            SigningKey::EcP256(_) => "EC P-256",
            SigningKey::Hmac(_) => "HMAC",
        }
    }
}

// Key material stays out of logs.
impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&self.kind()).finish()
    }
}

/// Public key resolved for the key-encryption role
#[derive(Debug, Clone)]
pub enum EncryptionKey {
    /// RSA public key (RSA-OAEP-256)
    Rsa(rsa::RsaPublicKey),
}

impl EncryptionKey {
    /// Key management algorithm determined by the key type
    #[must_use]
    pub fn natural_algorithm(&self) -> KeyEncryptionAlgorithm {
        match self {
            EncryptionKey::Rsa(_) => KeyEncryptionAlgorithm::RsaOaep256,
        }
    }
}
