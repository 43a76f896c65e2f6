//! PEM key parsing, dispatched on the armor label

use super::{EncryptionKey, SigningKey};
use crate::error::{JwtBuildError, JwtResult};
use p256::pkcs8::{DecodePrivateKey as _, DecodePublicKey as _};
use rsa::pkcs1::{DecodeRsaPrivateKey as _, DecodeRsaPublicKey as _};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Parse a PEM private key for the signing role
pub(crate) fn parse_signing_key(material: &[u8]) -> JwtResult<SigningKey> {
    let pem = as_text(material)?;
    match armor_label(pem)? {
        "PRIVATE KEY" => {
            if let Ok(key) = RsaPrivateKey::from_pkcs8_pem(pem) {
                return Ok(SigningKey::Rsa(key));
            }
            p256::ecdsa::SigningKey::from_pkcs8_pem(pem)
                .map(SigningKey::EcP256)
                .map_err(|e| {
                    JwtBuildError::invalid_key(format!(
                        "PKCS#8 private key is neither RSA nor P-256: {e}"
                    ))
                })
        }
        "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_pem(pem)
            .map(SigningKey::Rsa)
            .map_err(|e| JwtBuildError::invalid_key(format!("Invalid PKCS#1 RSA private key: {e}"))),
        label => Err(JwtBuildError::invalid_key(format!(
            "PEM block '{label}' is not a supported signing key"
        ))),
    }
}

/// Parse a PEM public key for the key-encryption role
pub(crate) fn parse_encryption_key(material: &[u8]) -> JwtResult<EncryptionKey> {
    let pem = as_text(material)?;
    match armor_label(pem)? {
        "PUBLIC KEY" => {
            if let Ok(key) = RsaPublicKey::from_public_key_pem(pem) {
                return Ok(EncryptionKey::Rsa(key));
            }
            if p256::PublicKey::from_public_key_pem(pem).is_ok() {
                return Err(JwtBuildError::unsupported_algorithm(
                    "EC keys cannot be used for key encryption; an RSA public key is required",
                ));
            }
            Err(JwtBuildError::invalid_key("Unrecognized SubjectPublicKeyInfo"))
        }
        "RSA PUBLIC KEY" => RsaPublicKey::from_pkcs1_pem(pem)
            .map(EncryptionKey::Rsa)
            .map_err(|e| JwtBuildError::invalid_key(format!("Invalid PKCS#1 RSA public key: {e}"))),
        label => Err(JwtBuildError::invalid_key(format!(
            "PEM block '{label}' is not a supported key-encryption key"
        ))),
    }
}

fn as_text(material: &[u8]) -> JwtResult<&str> {
    std::str::from_utf8(material)
        .map(str::trim)
        .map_err(|_| JwtBuildError::invalid_key("PEM key is not valid UTF-8"))
}

/// Label of the first `-----BEGIN <label>-----` line
fn armor_label(pem: &str) -> JwtResult<&str> {
    const BEGIN: &str = "-----BEGIN ";
    let start = pem
        .find(BEGIN)
        .map(|i| i + BEGIN.len())
        .ok_or_else(|| JwtBuildError::invalid_key("Missing PEM BEGIN line"))?;
    let rest = &pem[start..];
    let end = rest
        .find("-----")
        .ok_or_else(|| JwtBuildError::invalid_key("Malformed PEM BEGIN line"))?;
    Ok(&rest[..end])
}
