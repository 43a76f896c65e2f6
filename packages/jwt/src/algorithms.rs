//! JOSE algorithm identifiers used by the build pipeline
//!
//! Each enum serializes to its registered JOSE name so headers and
//! configuration files carry the same strings.

use crate::error::{JwtBuildError, JwtResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// JWS signature algorithm (`alg` of a signed token)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    RS512,
    /// ECDSA using P-256 and SHA-256
    ES256,
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
}

impl SignatureAlgorithm {
    /// JOSE name of the algorithm
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureAlgorithm::RS256 => "RS256",
            SignatureAlgorithm::RS384 => "RS384",
            SignatureAlgorithm::RS512 => "RS512",
            SignatureAlgorithm::ES256 => "ES256",
            SignatureAlgorithm::HS256 => "HS256",
            SignatureAlgorithm::HS384 => "HS384",
            SignatureAlgorithm::HS512 => "HS512",
        }
    }

    /// Minimum HMAC secret length in bytes, `None` for asymmetric algorithms
    #[must_use]
    pub(crate) fn min_hmac_key_len(self) -> Option<usize> {
        match self {
            SignatureAlgorithm::HS256 => Some(32),
            SignatureAlgorithm::HS384 => Some(48),
            SignatureAlgorithm::HS512 => Some(64),
            _ => None,
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = JwtBuildError;

    fn from_str(s: &str) -> JwtResult<Self> {
        match s {
            "RS256" => Ok(SignatureAlgorithm::RS256),
            "RS384" => Ok(SignatureAlgorithm::RS384),
            "RS512" => Ok(SignatureAlgorithm::RS512),
            "ES256" => Ok(SignatureAlgorithm::ES256),
            "HS256" => Ok(SignatureAlgorithm::HS256),
            "HS384" => Ok(SignatureAlgorithm::HS384),
            "HS512" => Ok(SignatureAlgorithm::HS512),
            other => Err(JwtBuildError::unsupported_algorithm(other)),
        }
    }
}

/// JWE key management algorithm (`alg` of an encrypted token)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyEncryptionAlgorithm {
    /// RSAES-OAEP using SHA-256 and MGF1 with SHA-256
    #[serde(rename = "RSA-OAEP-256")]
    RsaOaep256,
}

impl KeyEncryptionAlgorithm {
    /// JOSE name of the algorithm
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            KeyEncryptionAlgorithm::RsaOaep256 => "RSA-OAEP-256",
        }
    }
}

impl fmt::Display for KeyEncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyEncryptionAlgorithm {
    type Err = JwtBuildError;

    fn from_str(s: &str) -> JwtResult<Self> {
        match s {
            "RSA-OAEP-256" => Ok(KeyEncryptionAlgorithm::RsaOaep256),
            other => Err(JwtBuildError::unsupported_algorithm(other)),
        }
    }
}

/// JWE content encryption algorithm (`enc`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentEncryptionAlgorithm {
    /// AES-GCM with a 256-bit key
    #[default]
    A256GCM,
    /// AES-GCM with a 128-bit key
    A128GCM,
}

impl ContentEncryptionAlgorithm {
    /// JOSE name of the algorithm
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentEncryptionAlgorithm::A256GCM => "A256GCM",
            ContentEncryptionAlgorithm::A128GCM => "A128GCM",
        }
    }

    /// Content encryption key length in bytes
    #[must_use]
    pub fn key_len(self) -> usize {
        match self {
            ContentEncryptionAlgorithm::A256GCM => 32,
            ContentEncryptionAlgorithm::A128GCM => 16,
        }
    }
}

impl fmt::Display for ContentEncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentEncryptionAlgorithm {
    type Err = JwtBuildError;

    fn from_str(s: &str) -> JwtResult<Self> {
        match s {
            "A256GCM" => Ok(ContentEncryptionAlgorithm::A256GCM),
            "A128GCM" => Ok(ContentEncryptionAlgorithm::A128GCM),
            other => Err(JwtBuildError::unsupported_algorithm(other)),
        }
    }
}
