//! JWE primitives: RSA-OAEP-256 key wrap and AES-GCM content encryption

use crate::algorithms::ContentEncryptionAlgorithm;
use crate::error::{JwtBuildError, JwtResult};
use crate::keys::EncryptionKey;
use aes_gcm::{
    Aes128Gcm, Aes256Gcm, KeyInit,
    aead::{Aead, Payload, generic_array::GenericArray},
};
use rand::RngCore;
use rsa::Oaep;
use sha2::Sha256;
use zeroize::Zeroizing;

/// AES-GCM nonce length in bytes (96 bits)
pub(crate) const IV_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes
pub(crate) const TAG_LEN: usize = 16;

/// Output of content encryption, ciphertext and tag kept apart for the compact form
pub(crate) struct SealedContent {
    pub(crate) iv: [u8; IV_LEN],
    pub(crate) ciphertext: Vec<u8>,
    pub(crate) tag: Vec<u8>,
}

/// Fresh random content encryption key sized for `enc`
pub(crate) fn generate_cek(enc: ContentEncryptionAlgorithm) -> Zeroizing<Vec<u8>> {
    let mut cek = Zeroizing::new(vec![0u8; enc.key_len()]);
    rand::rng().fill_bytes(&mut cek);
    cek
}

/// Wrap the content encryption key for the recipient
pub(crate) fn wrap_cek(key: &EncryptionKey, cek: &[u8]) -> JwtResult<Vec<u8>> {
    match key {
        EncryptionKey::Rsa(public_key) => public_key
            .encrypt(&mut rsa::rand_core::OsRng, Oaep::new::<Sha256>(), cek)
            .map_err(|e| JwtBuildError::encryption(format!("RSA-OAEP key wrap failed: {e}"))),
    }
}

/// Encrypt `plaintext` under `cek` with a fresh random IV, authenticating `aad`
pub(crate) fn seal(
    enc: ContentEncryptionAlgorithm,
    cek: &[u8],
    plaintext: &[u8],
    aad: &[u8],
) -> JwtResult<SealedContent> {
    if cek.len() != enc.key_len() {
        return Err(JwtBuildError::encryption(format!(
            "{enc} requires a {} byte key, got {}",
            enc.key_len(),
            cek.len()
        )));
    }

    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut iv);
    let nonce = GenericArray::from_slice(&iv);
    let payload = Payload {
        msg: plaintext,
        aad,
    };

    let mut sealed = match enc {
        ContentEncryptionAlgorithm::A256GCM => {
            Aes256Gcm::new(GenericArray::from_slice(cek)).encrypt(nonce, payload)
        }
        ContentEncryptionAlgorithm::A128GCM => {
            Aes128Gcm::new(GenericArray::from_slice(cek)).encrypt(nonce, payload)
        }
    }
    .map_err(|e| JwtBuildError::encryption(format!("{enc} encryption failed: {e}")))?;

    // aead appends the tag to the ciphertext
    let tag = sealed.split_off(sealed.len() - TAG_LEN);
    Ok(SealedContent {
        iv,
        ciphertext: sealed,
        tag,
    })
}
