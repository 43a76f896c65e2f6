//! Shared helpers for the integration tests: fixtures and a minimal
//! decrypt/verify path used to inspect built tokens

#![allow(dead_code)]

use aes_gcm::{
    Aes128Gcm, Aes256Gcm, KeyInit,
    aead::{Aead, Payload, generic_array::GenericArray},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use cryypt_jwt_build::{FileKeySource, JwtBuildConfig, JwtIssuer, KeyConfig};
use rsa::pkcs1v15;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::sha2::Sha256;
use rsa::signature::Verifier;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use serde_json::{Map, Value};
use std::path::PathBuf;

pub const SIGNING_KEY_ID: &str = "sign-key-id";
pub const KEY_ENCRYPTION_KEY_ID: &str = "key-enc-key-id";

/// Directory holding the key fixtures
pub fn keys_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("keys")
}

pub fn read_key(name: &str) -> String {
    std::fs::read_to_string(keys_dir().join(name)).unwrap()
}

/// PEM signing key and PEM key-encryption key, resource style locations
pub fn pem_config() -> JwtBuildConfig {
    JwtBuildConfig::new()
        .with_signing_key(KeyConfig::pem("/privateKey.pem"))
        .with_encryption_key(KeyConfig::pem("/publicKey.pem"))
}

/// Issuer resolving locations beneath the fixture directory
pub fn issuer(config: JwtBuildConfig) -> JwtIssuer {
    JwtIssuer::with_source(config, FileKeySource::with_base_dir(keys_dir())).unwrap()
}

pub fn decode(segment: &str) -> Vec<u8> {
    URL_SAFE_NO_PAD.decode(segment).unwrap()
}

pub fn decode_json(segment: &str) -> Map<String, Value> {
    match serde_json::from_slice(&decode(segment)).unwrap() {
        Value::Object(map) => map,
        other => panic!("segment is not a JSON object: {other}"),
    }
}

pub fn segments(token: &str) -> Vec<&str> {
    token.split('.').collect()
}

/// Decrypt a compact JWE with the fixture RSA private key
///
/// Returns the protected header and the plaintext.
pub fn decrypt(token: &str) -> (Map<String, Value>, Vec<u8>) {
    let parts = segments(token);
    assert_eq!(parts.len(), 5, "JWE must have 5 segments");
    let header = decode_json(parts[0]);

    let private_key = RsaPrivateKey::from_pkcs8_pem(&read_key("privateKey.pem")).unwrap();
    let cek = private_key
        .decrypt(Oaep::new::<Sha256>(), &decode(parts[1]))
        .unwrap();

    let iv = decode(parts[2]);
    assert_eq!(iv.len(), 12);
    let mut sealed = decode(parts[3]);
    let tag = decode(parts[4]);
    assert_eq!(tag.len(), 16);
    sealed.extend_from_slice(&tag);

    let nonce = GenericArray::from_slice(&iv);
    let payload = Payload {
        msg: &sealed,
        aad: parts[0].as_bytes(),
    };
    let plaintext = match header["enc"].as_str().unwrap() {
        "A256GCM" => {
            assert_eq!(cek.len(), 32);
            Aes256Gcm::new(GenericArray::from_slice(&cek)).decrypt(nonce, payload)
        }
        "A128GCM" => {
            assert_eq!(cek.len(), 16);
            Aes128Gcm::new(GenericArray::from_slice(&cek)).decrypt(nonce, payload)
        }
        other => panic!("unexpected enc {other}"),
    }
    .unwrap();

    (header, plaintext)
}

/// Verify an RS256 JWS against the fixture public key and return its claims
pub fn verify_rs256(token: &str) -> Map<String, Value> {
    let parts = segments(token);
    assert_eq!(parts.len(), 3, "JWS must have 3 segments");

    let public_key = RsaPublicKey::from_public_key_pem(&read_key("publicKey.pem")).unwrap();
    let verifying_key = pkcs1v15::VerifyingKey::<Sha256>::new(public_key);
    let signature = pkcs1v15::Signature::try_from(decode(parts[2]).as_slice()).unwrap();
    verifying_key
        .verify(format!("{}.{}", parts[0], parts[1]).as_bytes(), &signature)
        .unwrap();

    decode_json(parts[1])
}
