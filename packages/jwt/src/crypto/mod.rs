//! Cryptographic primitives wired into the JOSE compact serialization

pub(crate) mod encryption;
pub(crate) mod signing;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Base64 URL-safe encoding without padding (RFC 7515)
#[inline]
pub(crate) fn base64_url_encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Encode `value` as JSON, then base64url
pub(crate) fn encode_json_segment<T: serde::Serialize>(value: &T) -> crate::JwtResult<String> {
    Ok(base64_url_encode(serde_json::to_vec(value)?))
}
