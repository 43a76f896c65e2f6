//! Key resolution across PEM and JWK formats and the signature algorithms they imply

mod common;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use cryypt_jwt_build::keys::Resolution;
use cryypt_jwt_build::{
    JwtBuildConfig, JwtBuildError, KeyConfig, KeyRole, MemoryKeySource, SignatureAlgorithm,
};
use hmac::{Hmac, Mac};
use p256::ecdsa::signature::Verifier;
use p256::pkcs8::DecodePublicKey;

fn signed_header_alg(config: JwtBuildConfig, kid: Option<&str>) -> (String, Vec<String>) {
    let mut jws = common::issuer(config).claims().subject("alice").jws();
    if let Some(kid) = kid {
        jws = jws.key_id(kid);
    }
    let token = jws.sign().unwrap();
    let parts: Vec<String> = token.segments().map(str::to_owned).collect();
    let alg = common::decode_json(&parts[0])["alg"]
        .as_str()
        .unwrap()
        .to_owned();
    (alg, parts)
}

#[test]
fn test_es256_from_pem() {
    let config = JwtBuildConfig::new().with_signing_key(KeyConfig::pem("/ecPrivateKey.pem"));
    let (alg, parts) = signed_header_alg(config, None);
    assert_eq!(alg, "ES256");

    let verifying_key =
        p256::ecdsa::VerifyingKey::from_public_key_pem(&common::read_key("ecPublicKey.pem"))
            .unwrap();
    let signature = p256::ecdsa::Signature::from_slice(&common::decode(&parts[2])).unwrap();
    assert!(verifying_key
        .verify(format!("{}.{}", parts[0], parts[1]).as_bytes(), &signature)
        .is_ok());
}

#[test]
fn test_rs256_from_pkcs1_pem() {
    let config = JwtBuildConfig::new().with_signing_key(KeyConfig::pem("/privateKeyPkcs1.pem"));
    let (alg, parts) = signed_header_alg(config, None);
    assert_eq!(alg, "RS256");
    common::verify_rs256(&parts.join("."));
}

#[test]
fn test_rs256_from_rsa_jwk() {
    let config = JwtBuildConfig::new().with_signing_key(KeyConfig::jwk("/privateKey.jwk"));
    let (alg, parts) = signed_header_alg(config, Some("sign-key"));
    assert_eq!(alg, "RS256");
    assert_eq!(common::decode_json(&parts[0])["kid"], "sign-key");
    common::verify_rs256(&parts.join("."));
}

#[test]
fn test_hs256_from_oct_jwk() {
    let config = JwtBuildConfig::new()
        .with_signing_key(KeyConfig::jwk("/privateKey.jwk").with_key_id("hmac-key"));
    let (alg, parts) = signed_header_alg(config, None);
    assert_eq!(alg, "HS256");

    let secret: Vec<u8> = (0u8..32).collect();
    let mut mac = Hmac::<sha2::Sha256>::new_from_slice(&secret).unwrap();
    mac.update(format!("{}.{}", parts[0], parts[1]).as_bytes());
    let expected = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    assert_eq!(parts[2], expected);
}

#[test]
fn test_configured_algorithm_applies() {
    let config = JwtBuildConfig::new()
        .with_signing_key(KeyConfig::pem("/privateKey.pem"))
        .with_signature_algorithm(SignatureAlgorithm::RS384);
    let (alg, _) = signed_header_alg(config, None);
    assert_eq!(alg, "RS384");
}

#[test]
fn test_missing_kid_in_jwk_set() {
    let config = common::pem_config().with_encryption_key(KeyConfig::jwk("/publicKey.jwk"));
    let result = common::issuer(config)
        .claims()
        .subject("alice")
        .inner_sign()
        .unwrap()
        .key_id("missing")
        .encrypt();

    assert!(matches!(
        result,
        Err(JwtBuildError::KeyNotFound { kid }) if kid == "missing"
    ));
}

#[test]
fn test_jwk_set_without_kid_is_ambiguous() {
    let config = common::pem_config().with_encryption_key(KeyConfig::jwk("/publicKey.jwk"));
    let result = common::issuer(config)
        .claims()
        .subject("alice")
        .inner_sign()
        .unwrap()
        .encrypt();
    assert!(matches!(result, Err(JwtBuildError::KeyNotFound { .. })));
}

#[test]
fn test_missing_key_file() {
    let config = JwtBuildConfig::new().with_signing_key(KeyConfig::pem("/nope.pem"));
    let result = common::issuer(config).claims().sign();
    assert!(matches!(
        result,
        Err(JwtBuildError::KeyLoad { location, .. }) if location == "/nope.pem"
    ));
}

#[test]
fn test_ec_key_cannot_encrypt() {
    let config = common::pem_config().with_encryption_key(KeyConfig::pem("/ecPublicKey.pem"));
    let result = common::issuer(config).claims().encrypt();
    assert!(matches!(result, Err(JwtBuildError::UnsupportedAlgorithm(_))));
}

#[test]
fn test_missing_encryption_key_never_falls_back() {
    let config = JwtBuildConfig::new()
        .with_signing_key(KeyConfig::pem("/privateKey.pem"))
        .with_unsigned_fallback(true);
    let result = common::issuer(config)
        .claims()
        .subject("alice")
        .inner_sign()
        .unwrap()
        .encrypt();
    assert!(matches!(
        result,
        Err(JwtBuildError::KeyResolution { role: KeyRole::KeyEncryption, .. })
    ));
}

#[test]
fn test_availability_toggle_between_builds() {
    let mut issuer = common::issuer(common::pem_config().with_unsigned_fallback(true));
    let alg_of = |issuer: &cryypt_jwt_build::JwtIssuer| {
        let token = issuer.claims().sign().unwrap();
        let alg = common::decode_json(token.segments().next().unwrap())["alg"].clone();
        alg
    };

    assert_eq!(alg_of(&issuer), "RS256");
    issuer
        .update_config(|config| config.signing_key.available = false)
        .unwrap();
    assert_eq!(alg_of(&issuer), "none");
    issuer
        .update_config(|config| config.signing_key.available = true)
        .unwrap();
    assert_eq!(alg_of(&issuer), "RS256");
}

#[test]
fn test_resolver_reports_availability() {
    let source = MemoryKeySource::new().with_key("/hmac.jwk", common::read_key("privateKey.jwk"));
    let config = JwtBuildConfig::new()
        .with_signing_key(KeyConfig::jwk("/hmac.jwk").with_key_id("hmac-key"));
    let issuer = cryypt_jwt_build::JwtIssuer::with_source(config, source).unwrap();
    let resolver = issuer.resolver();

    assert!(resolver.resolve_signing(None).unwrap().is_available());
    assert!(matches!(
        resolver.resolve_key_encryption(None).unwrap(),
        Resolution::NotAvailable(_)
    ));
    assert_eq!(
        resolver.spec(KeyRole::Signing, None).key_id.as_deref(),
        Some("hmac-key")
    );
}

#[test]
fn test_config_from_json_file() {
    let path = std::env::temp_dir().join(format!("jwt-build-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{
            "signing_key": { "location": "/privateKey.pem" },
            "encryption_key": { "location": "/publicKey.jwk", "format": "jwk", "key_id": "key1" },
            "token_lifespan_seconds": 60,
            "issuer": "https://issuer.example"
        }"#,
    )
    .unwrap();
    let config = JwtBuildConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let token = common::issuer(config)
        .claims()
        .inner_sign()
        .unwrap()
        .encrypt()
        .unwrap();
    let (_, plaintext) = common::decrypt(token.as_str());
    let claims = common::verify_rs256(&String::from_utf8(plaintext).unwrap());
    assert_eq!(claims["iss"], "https://issuer.example");
    assert_eq!(
        claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap(),
        60
    );
}
