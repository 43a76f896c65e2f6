//! Protected headers and the compact token produced by a build

use crate::algorithms::{ContentEncryptionAlgorithm, KeyEncryptionAlgorithm, SignatureAlgorithm};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `alg` value of an unsigned token
pub const ALG_NONE: &str = "none";

/// Media type used for both `typ` and the nested `cty`
pub const JWT_MEDIA_TYPE: &str = "JWT";

/// JWS protected header
///
/// Field order is the serialization order: `alg`, `typ`, then `kid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwsHeader {
    /// Signature algorithm name, or `none`
    pub alg: String,
    /// Always `JWT`
    pub typ: String,
    /// Signing key id, present only when the caller set one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl JwsHeader {
    /// Header for a token signed with `alg`
    #[must_use]
    pub fn signed(alg: SignatureAlgorithm) -> Self {
        Self::with_alg(alg.as_str())
    }

    /// Header for an unsigned token (`alg: none`)
    #[must_use]
    pub fn unsigned() -> Self {
        Self::with_alg(ALG_NONE)
    }

    fn with_alg(alg: &str) -> Self {
        Self {
            alg: alg.to_string(),
            typ: JWT_MEDIA_TYPE.to_string(),
            kid: None,
        }
    }

    /// Attach a key id
    #[must_use]
    pub fn with_key_id(mut self, kid: Option<String>) -> Self {
        self.kid = kid;
        self
    }

    /// Whether this header describes an unsigned token
    #[must_use]
    pub fn is_unsigned(&self) -> bool {
        self.alg == ALG_NONE
    }
}

/// JWE protected header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JweHeader {
    /// Key management algorithm
    pub alg: KeyEncryptionAlgorithm,
    /// Content encryption algorithm
    pub enc: ContentEncryptionAlgorithm,
    /// `JWT` when the plaintext is itself a compact JWT
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cty: Option<String>,
    /// Key-encryption key id, present only when the caller set one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl JweHeader {
    /// Header for the given algorithm pair
    #[must_use]
    pub fn new(alg: KeyEncryptionAlgorithm, enc: ContentEncryptionAlgorithm) -> Self {
        Self {
            alg,
            enc,
            cty: None,
            kid: None,
        }
    }

    /// Mark the plaintext as a nested JWT
    #[must_use]
    pub fn nested(mut self, nested: bool) -> Self {
        self.cty = nested.then(|| JWT_MEDIA_TYPE.to_string());
        self
    }

    /// Attach a key id
    #[must_use]
    pub fn with_key_id(mut self, kid: Option<String>) -> Self {
        self.kid = kid;
        self
    }
}

/// Compact serialized token: 3 segments for a JWS, 5 for a JWE
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompactToken(String);

impl CompactToken {
    pub(crate) fn new(token: String) -> Self {
        Self(token)
    }

    /// Borrow the serialized token
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the serialized token
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Dot separated segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Number of segments
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }
}

impl fmt::Display for CompactToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CompactToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CompactToken> for String {
    fn from(token: CompactToken) -> Self {
        token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jws_header_omits_unset_kid() {
        let json = serde_json::to_string(&JwsHeader::signed(SignatureAlgorithm::RS256)).unwrap();
        assert_eq!(json, r#"{"alg":"RS256","typ":"JWT"}"#);

        let header = JwsHeader::unsigned().with_key_id(Some("k1".into()));
        assert!(header.is_unsigned());
        assert_eq!(
            serde_json::to_string(&header).unwrap(),
            r#"{"alg":"none","typ":"JWT","kid":"k1"}"#
        );
    }

    #[test]
    fn test_jwe_header_cty_only_when_nested() {
        let base = JweHeader::new(
            KeyEncryptionAlgorithm::RsaOaep256,
            ContentEncryptionAlgorithm::A256GCM,
        );
        assert_eq!(
            serde_json::to_string(&base.clone().nested(false)).unwrap(),
            r#"{"alg":"RSA-OAEP-256","enc":"A256GCM"}"#
        );
        assert_eq!(
            serde_json::to_string(&base.nested(true).with_key_id(Some("kek".into()))).unwrap(),
            r#"{"alg":"RSA-OAEP-256","enc":"A256GCM","cty":"JWT","kid":"kek"}"#
        );
    }

    #[test]
    fn test_compact_token_segments() {
        let token = CompactToken::new("a.b.".to_string());
        assert_eq!(token.segment_count(), 3);
        assert_eq!(token.segments().last(), Some(""));
        assert_eq!(token.to_string(), "a.b.");
        assert_eq!(String::from(token), "a.b.");
    }
}
