//! JWS stage: header assembly and signing over the serialized claims

use crate::algorithms::SignatureAlgorithm;
use crate::claims::ClaimsSet;
use crate::crypto::{self, signing};
use crate::error::{JwtBuildError, JwtResult};
use crate::keys::{KeyResolver, KeyRole, Resolution};
use crate::types::{CompactToken, JwsHeader};

/// Caller choices for the JWS header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JwsHeaderConfig {
    /// Signing key id; selects the JWK and is written to `kid`
    pub key_id: Option<String>,
    /// Explicit algorithm; disables the unsigned fallback when set
    pub algorithm: Option<SignatureAlgorithm>,
}

/// Sign `claims` into a compact JWS
///
/// Without a resolvable signing key the token is emitted unsigned
/// (`alg: none`, empty signature segment) when the configuration allows it
/// and the caller did not ask for a specific algorithm.
///
/// # Errors
/// Returns `KeyResolution` when no key is available and the fallback does
/// not apply, `UnsupportedAlgorithm` when the algorithm does not fit the key,
/// and any key loading, serialization or signing failure.
pub fn sign(
    resolver: &KeyResolver,
    claims: &ClaimsSet,
    header_config: &JwsHeaderConfig,
) -> JwtResult<CompactToken> {
    let config = resolver.config();
    let requested_kid = header_config.key_id.as_deref();

    let key = match resolver.resolve_signing(requested_kid)? {
        Resolution::Key(key) => Some(key),
        Resolution::NotAvailable(reason) => {
            if !config.allow_unsigned_fallback {
                return Err(JwtBuildError::key_resolution(KeyRole::Signing, reason));
            }
            if let Some(alg) = header_config.algorithm {
                return Err(JwtBuildError::key_resolution(
                    KeyRole::Signing,
                    format!("{reason}; {alg} was requested explicitly"),
                ));
            }
            None
        }
    };

    let signer = key.map(|key| {
        let alg = header_config
            .algorithm
            .or(config.signature_algorithm)
            .unwrap_or_else(|| key.natural_algorithm());
        (key, alg)
    });

    let header = match &signer {
        Some((_, alg)) => JwsHeader::signed(*alg),
        None => JwsHeader::unsigned(),
    }
    .with_key_id(header_config.key_id.clone());

    let signing_input = format!(
        "{}.{}",
        crypto::encode_json_segment(&header)?,
        crypto::base64_url_encode(claims.to_json()?)
    );

    let signature = match &signer {
        Some((key, alg)) => {
            crypto::base64_url_encode(signing::sign(key, *alg, signing_input.as_bytes())?)
        }
        None => {
            tracing::warn!(
                "No signing key available; emitting an UNSIGNED token (alg: none). \
                 Never enable allow_unsigned_fallback in production"
            );
            String::new()
        }
    };

    tracing::debug!(alg = %header.alg, kid = ?header.kid, "Built JWS");
    Ok(CompactToken::new(format!("{signing_input}.{signature}")))
}
