//! JWE stage: header assembly, key wrap and content encryption

use crate::algorithms::ContentEncryptionAlgorithm;
use crate::crypto::{self, encryption};
use crate::error::{JwtBuildError, JwtResult};
use crate::keys::{KeyResolver, KeyRole, Resolution};
use crate::types::{CompactToken, JweHeader};

/// Caller choices for the JWE header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JweHeaderConfig {
    /// Key-encryption key id; selects the JWK and is written to `kid`
    pub key_id: Option<String>,
    /// Content encryption override; the configured default applies otherwise
    pub content_algorithm: Option<ContentEncryptionAlgorithm>,
}

/// Encrypt `payload` into a compact JWE
///
/// `nested` marks the payload as a compact JWT (signed or unsigned) and sets
/// `cty: JWT`. There is no unsigned style fallback here: a missing
/// key-encryption key is always an error.
///
/// # Errors
/// Returns `KeyResolution` when no key-encryption key is available, and any
/// key loading, serialization or encryption failure.
pub fn encrypt(
    resolver: &KeyResolver,
    payload: &[u8],
    nested: bool,
    header_config: &JweHeaderConfig,
) -> JwtResult<CompactToken> {
    let key = match resolver.resolve_key_encryption(header_config.key_id.as_deref())? {
        Resolution::Key(key) => key,
        Resolution::NotAvailable(reason) => {
            return Err(JwtBuildError::key_resolution(KeyRole::KeyEncryption, reason));
        }
    };

    let enc = header_config
        .content_algorithm
        .unwrap_or(resolver.config().content_encryption_algorithm);
    let header = JweHeader::new(key.natural_algorithm(), enc)
        .nested(nested)
        .with_key_id(header_config.key_id.clone());

    // The encoded protected header is the AAD
    let protected = crypto::encode_json_segment(&header)?;

    let cek = encryption::generate_cek(enc);
    let wrapped_key = encryption::wrap_cek(&key, &cek)?;
    let sealed = encryption::seal(enc, &cek, payload, protected.as_bytes())?;

    let token = [
        protected,
        crypto::base64_url_encode(wrapped_key),
        crypto::base64_url_encode(sealed.iv),
        crypto::base64_url_encode(sealed.ciphertext),
        crypto::base64_url_encode(sealed.tag),
    ]
    .join(".");

    tracing::debug!(
        alg = %header.alg,
        enc = %header.enc,
        nested,
        kid = ?header.kid,
        "Built JWE"
    );
    Ok(CompactToken::new(token))
}
