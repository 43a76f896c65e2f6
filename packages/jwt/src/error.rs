//! Error types for the JWT build pipeline
//!
//! Every stage is fail-fast: a build either yields a complete compact token or
//! one of these errors, never a partial token.

use crate::keys::KeyRole;
use thiserror::Error;

/// JWT build result type
pub type JwtResult<T> = Result<T, JwtBuildError>;

/// Errors raised while building, signing or encrypting a token
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JwtBuildError {
    /// Claim name is empty or its value cannot be represented as JSON
    #[error("Invalid claim: {0}")]
    InvalidClaim(String),

    /// A key was required for the stage but none could be resolved
    #[error("No {role} key available: {reason}")]
    KeyResolution {
        /// Role the key was requested for
        role: KeyRole,
        /// Why resolution produced no key
        reason: String,
    },

    /// Key id does not exist in the configured JWK set
    #[error("Key not found in JWK set: {kid}")]
    KeyNotFound {
        /// Key id that was looked up
        kid: String,
    },

    /// Key material could not be read from its location
    #[error("Failed to load key from {location}: {reason}")]
    KeyLoad {
        /// Configured key location
        location: String,
        /// Underlying I/O failure
        reason: String,
    },

    /// Key material was read but could not be parsed or used
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Header, claims or payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Signature primitive failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// Key wrap or content encryption primitive failed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Algorithm unknown or incompatible with the resolved key
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Background build task ended without delivering a result
    #[error("Token build task failed")]
    TaskFailed,
}

impl JwtBuildError {
    /// Create an invalid claim error
    #[inline]
    #[must_use]
    pub fn invalid_claim(msg: impl Into<String>) -> Self {
        JwtBuildError::InvalidClaim(msg.into())
    }

    /// Create a key resolution error
    #[inline]
    #[must_use]
    pub fn key_resolution(role: KeyRole, reason: impl Into<String>) -> Self {
        JwtBuildError::KeyResolution {
            role,
            reason: reason.into(),
        }
    }

    /// Create a key not found error
    #[inline]
    #[must_use]
    pub fn key_not_found(kid: impl Into<String>) -> Self {
        JwtBuildError::KeyNotFound { kid: kid.into() }
    }

    /// Create a key load error
    #[inline]
    #[must_use]
    pub fn key_load(location: impl Into<String>, reason: impl Into<String>) -> Self {
        JwtBuildError::KeyLoad {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        JwtBuildError::InvalidKey(msg.into())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        JwtBuildError::Serialization(msg.into())
    }

    /// Create a signing error
    #[inline]
    #[must_use]
    pub fn signing(msg: impl Into<String>) -> Self {
        JwtBuildError::Signing(msg.into())
    }

    /// Create an encryption error
    #[inline]
    #[must_use]
    pub fn encryption(msg: impl Into<String>) -> Self {
        JwtBuildError::Encryption(msg.into())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: impl Into<String>) -> Self {
        JwtBuildError::UnsupportedAlgorithm(alg.into())
    }

    /// Create a configuration error
    #[inline]
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        JwtBuildError::Config(msg.into())
    }
}

impl From<serde_json::Error> for JwtBuildError {
    fn from(err: serde_json::Error) -> Self {
        JwtBuildError::Serialization(err.to_string())
    }
}
