//! JWS signature primitives: RSASSA-PKCS1-v1_5, ECDSA P-256 and HMAC

use crate::algorithms::SignatureAlgorithm;
use crate::error::{JwtBuildError, JwtResult};
use crate::keys::SigningKey;
use hmac::{Hmac, Mac};
use rsa::pkcs1v15;
use sha2::{Sha256, Sha384, Sha512};
use rsa::signature::{SignatureEncoding, Signer};

/// Sign `input` with `key` using `alg`
///
/// The algorithm must belong to the key's family; HMAC secrets must be at
/// least as long as the hash output.
pub(crate) fn sign(key: &SigningKey, alg: SignatureAlgorithm, input: &[u8]) -> JwtResult<Vec<u8>> {
    if !key.supports(alg) {
        return Err(JwtBuildError::unsupported_algorithm(format!(
            "{alg} cannot be used with a {} key",
            key.kind()
        )));
    }

    match (key, alg) {
        (SigningKey::Rsa(private_key), SignatureAlgorithm::RS256) => {
            rsa_sign(pkcs1v15::SigningKey::<Sha256>::new(private_key.clone()), input)
        }
        (SigningKey::Rsa(private_key), SignatureAlgorithm::RS384) => {
            rsa_sign(pkcs1v15::SigningKey::<Sha384>::new(private_key.clone()), input)
        }
        (SigningKey::Rsa(private_key), SignatureAlgorithm::RS512) => {
            rsa_sign(pkcs1v15::SigningKey::<Sha512>::new(private_key.clone()), input)
        }
        (SigningKey::EcP256(signing_key), SignatureAlgorithm::ES256) => {
            es256_sign(signing_key, input)
        }
        (SigningKey::Hmac(secret), alg) => hmac_sign(secret, alg, input),
        _ => Err(JwtBuildError::unsupported_algorithm(alg.as_str())),
    }
}

fn rsa_sign<S>(signing_key: S, input: &[u8]) -> JwtResult<Vec<u8>>
where
    S: Signer<pkcs1v15::Signature>,
{
    signing_key
        .try_sign(input)
        .map(|signature| signature.to_bytes().as_ref().to_vec())
        .map_err(|e| JwtBuildError::signing(format!("RSA signing failed: {e}")))
}

/// ES256 signature in the JOSE `r || s` form (64 bytes), not DER
fn es256_sign(signing_key: &p256::ecdsa::SigningKey, input: &[u8]) -> JwtResult<Vec<u8>> {
    let signature: p256::ecdsa::Signature = p256::ecdsa::signature::Signer::try_sign(signing_key, input)
        .map_err(|e| JwtBuildError::signing(format!("ECDSA signing failed: {e}")))?;
    Ok(signature.to_bytes().to_vec())
}

fn hmac_sign(secret: &[u8], alg: SignatureAlgorithm, input: &[u8]) -> JwtResult<Vec<u8>> {
    let min_len = alg.min_hmac_key_len().unwrap_or(0);
    if secret.len() < min_len {
        return Err(JwtBuildError::invalid_key(format!(
            "{alg} requires a secret of at least {min_len} bytes, got {}",
            secret.len()
        )));
    }

    let invalid = |_| JwtBuildError::invalid_key("Invalid HMAC key");
    let tag = match alg {
        SignatureAlgorithm::HS384 => {
            let mut mac = Hmac::<Sha384>::new_from_slice(secret).map_err(invalid)?;
            mac.update(input);
            mac.finalize().into_bytes().to_vec()
        }
        SignatureAlgorithm::HS512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(secret).map_err(invalid)?;
            mac.update(input);
            mac.finalize().into_bytes().to_vec()
        }
        _ => {
            let mut mac = Hmac::<Sha256>::new_from_slice(secret).map_err(invalid)?;
            mac.update(input);
            mac.finalize().into_bytes().to_vec()
        }
    };
    Ok(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeroize::Zeroizing;

    fn hmac_key(len: usize) -> SigningKey {
        SigningKey::Hmac(Zeroizing::new((0..len as u8).collect()))
    }

    #[test]
    fn test_hmac_output_lengths() {
        assert_eq!(sign(&hmac_key(32), SignatureAlgorithm::HS256, b"x").unwrap().len(), 32);
        assert_eq!(sign(&hmac_key(48), SignatureAlgorithm::HS384, b"x").unwrap().len(), 48);
        assert_eq!(sign(&hmac_key(64), SignatureAlgorithm::HS512, b"x").unwrap().len(), 64);
    }

    #[test]
    fn test_hmac_is_deterministic() {
        let key = hmac_key(32);
        assert_eq!(
            sign(&key, SignatureAlgorithm::HS256, b"payload").unwrap(),
            sign(&key, SignatureAlgorithm::HS256, b"payload").unwrap()
        );
    }

    #[test]
    fn test_short_hmac_secret_rejected() {
        assert!(matches!(
            sign(&hmac_key(16), SignatureAlgorithm::HS256, b"x"),
            Err(JwtBuildError::InvalidKey(_))
        ));
        assert!(matches!(
            sign(&hmac_key(32), SignatureAlgorithm::HS512, b"x"),
            Err(JwtBuildError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_family_mismatch_rejected() {
        assert!(matches!(
            sign(&hmac_key(32), SignatureAlgorithm::RS256, b"x"),
            Err(JwtBuildError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_es256_signature_is_raw_and_verifies() {
        use p256::ecdsa::signature::Verifier;

        let signing_key = p256::ecdsa::SigningKey::from_slice(&[7u8; 32]).unwrap();
        let verifying_key = p256::ecdsa::VerifyingKey::from(&signing_key);
        let bytes = sign(&SigningKey::EcP256(signing_key), SignatureAlgorithm::ES256, b"input").unwrap();

        assert_eq!(bytes.len(), 64);
        let signature = p256::ecdsa::Signature::from_slice(&bytes).unwrap();
        assert!(verifying_key.verify(b"input", &signature).is_ok());
    }
}
