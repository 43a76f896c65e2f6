//! JSON Web Key parsing and key set selection

use super::{EncryptionKey, SigningKey};
use crate::error::{JwtBuildError, JwtResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// JSON Web Key (RFC 7517) with the RSA, EC and octet members used here
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type: `RSA`, `EC` or `oct`
    pub kty: String,
    /// Key id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Intended algorithm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Intended use (`sig` or `enc`)
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    /// RSA modulus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA public exponent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    /// RSA private exponent or EC private scalar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    /// RSA first prime factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    /// RSA second prime factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// EC curve name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    /// EC x coordinate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    /// EC y coordinate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    /// Symmetric key value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
}

/// JSON Web Key set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JwkSet {
    /// Member keys
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// Parse either a `{"keys": [...]}` document or a single bare JWK
    ///
    /// # Errors
    /// Returns `JwtBuildError::InvalidKey` if the document is neither
    pub fn parse(material: &[u8]) -> JwtResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(material)
            .map_err(|e| JwtBuildError::invalid_key(format!("JWK is not valid JSON: {e}")))?;
        if value.get("keys").is_some() {
            serde_json::from_value(value)
                .map_err(|e| JwtBuildError::invalid_key(format!("Invalid JWK set: {e}")))
        } else {
            let key: Jwk = serde_json::from_value(value)
                .map_err(|e| JwtBuildError::invalid_key(format!("Invalid JWK: {e}")))?;
            Ok(Self { keys: vec![key] })
        }
    }

    /// Pick the key to use
    ///
    /// With a key id the key must exist in the set. Without one the set must
    /// hold exactly one key.
    ///
    /// # Errors
    /// Returns `JwtBuildError::KeyNotFound` if no single key can be selected
    pub fn select(&self, kid: Option<&str>) -> JwtResult<&Jwk> {
        match kid {
            Some(kid) => self
                .keys
                .iter()
                .find(|key| key.kid.as_deref() == Some(kid))
                .ok_or_else(|| JwtBuildError::key_not_found(kid)),
            None => match self.keys.as_slice() {
                [only] => Ok(only),
                [] => Err(JwtBuildError::invalid_key("JWK set is empty")),
                _ => Err(JwtBuildError::key_not_found(
                    "<unset> (key id required to select from a JWK set with several keys)",
                )),
            },
        }
    }
}

impl Jwk {
    /// Convert to a signing key
    ///
    /// # Errors
    /// Returns `JwtBuildError::InvalidKey` for public-only or malformed keys
    pub fn to_signing_key(&self) -> JwtResult<SigningKey> {
        match self.kty.as_str() {
            "RSA" => {
                let n = self.big_uint("n", self.n.as_deref())?;
                let e = self.big_uint("e", self.e.as_deref())?;
                let d = self.big_uint("d", self.d.as_deref())?;
                let p = self.big_uint("p", self.p.as_deref())?;
                let q = self.big_uint("q", self.q.as_deref())?;
                RsaPrivateKey::from_components(n, e, d, vec![p, q])
                    .map(SigningKey::Rsa)
                    .map_err(|e| JwtBuildError::invalid_key(format!("Invalid RSA JWK: {e}")))
            }
            "EC" => {
                self.require_p256()?;
                let d = self.bytes("d", self.d.as_deref())?;
                p256::ecdsa::SigningKey::from_slice(&d)
                    .map(SigningKey::EcP256)
                    .map_err(|e| JwtBuildError::invalid_key(format!("Invalid P-256 JWK: {e}")))
            }
            "oct" => Ok(SigningKey::Hmac(self.bytes("k", self.k.as_deref())?)),
            other => Err(JwtBuildError::invalid_key(format!(
                "Unsupported JWK key type '{other}'"
            ))),
        }
    }

    /// Convert to a key-encryption key
    ///
    /// # Errors
    /// Returns `JwtBuildError::InvalidKey` for malformed keys and
    /// `JwtBuildError::UnsupportedAlgorithm` for non-RSA keys
    pub fn to_encryption_key(&self) -> JwtResult<EncryptionKey> {
        match self.kty.as_str() {
            "RSA" => {
                let n = self.big_uint("n", self.n.as_deref())?;
                let e = self.big_uint("e", self.e.as_deref())?;
                RsaPublicKey::new(n, e)
                    .map(EncryptionKey::Rsa)
                    .map_err(|e| JwtBuildError::invalid_key(format!("Invalid RSA JWK: {e}")))
            }
            other => Err(JwtBuildError::unsupported_algorithm(format!(
                "JWK key type '{other}' cannot be used for key encryption"
            ))),
        }
    }

    fn require_p256(&self) -> JwtResult<()> {
        match self.crv.as_deref() {
            Some("P-256") => Ok(()),
            Some(other) => Err(JwtBuildError::unsupported_algorithm(format!(
                "EC curve '{other}'"
            ))),
            None => Err(JwtBuildError::invalid_key("EC JWK is missing 'crv'")),
        }
    }

    fn bytes(&self, member: &str, value: Option<&str>) -> JwtResult<Zeroizing<Vec<u8>>> {
        let value = value.ok_or_else(|| {
            JwtBuildError::invalid_key(format!(
                "JWK {} is missing '{member}'",
                self.kid.as_deref().unwrap_or("<no kid>")
            ))
        })?;
        URL_SAFE_NO_PAD
            .decode(value)
            .map(Zeroizing::new)
            .map_err(|e| JwtBuildError::invalid_key(format!("JWK member '{member}': {e}")))
    }

    fn big_uint(&self, member: &str, value: Option<&str>) -> JwtResult<BigUint> {
        Ok(BigUint::from_bytes_be(&self.bytes(member, value)?))
    }
}
