//! Nested JSON Web Token issuance
//!
//! This crate builds JWTs through a staged builder:
//! - claims accumulate with default `iat`, `exp` and `jti` injection
//! - the claims are signed into a compact JWS (RS256/384/512, ES256, HS256/384/512)
//! - the JWS may be encrypted into a compact JWE (RSA-OAEP-256 with A256GCM or A128GCM)
//!
//! Keys are resolved per build from [`JwtBuildConfig`] through a [`KeySource`],
//! as PEM or JWK. An insecure `alg: none` fallback for setups without a signing
//! key exists behind [`JwtBuildConfig::allow_unsigned_fallback`].
//!
//! ```no_run
//! use cryypt_jwt_build::{Jwt, JwtBuildConfig, KeyConfig};
//!
//! # fn main() -> cryypt_jwt_build::JwtResult<()> {
//! let config = JwtBuildConfig::new()
//!     .with_signing_key(KeyConfig::pem("keys/privateKey.pem"))
//!     .with_encryption_key(KeyConfig::pem("keys/publicKey.pem"));
//! let issuer = Jwt::issuer(config)?;
//!
//! let token = issuer
//!     .claims()
//!     .claim("customClaim", "custom-value")?
//!     .jws()
//!     .key_id("sign-key-id")
//!     .inner_sign()?
//!     .key_id("key-enc-key-id")
//!     .encrypt()?;
//! assert_eq!(token.segment_count(), 5);
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod api;
pub mod claims;
pub mod config;
pub(crate) mod crypto;
mod error;
pub mod futures;
pub mod keys;
pub mod stages;
mod types;

pub use algorithms::{ContentEncryptionAlgorithm, KeyEncryptionAlgorithm, SignatureAlgorithm};
pub use api::{JweBuilder, JwePayload, JwsBuilder, Jwt, JwtClaimsBuilder, JwtIssuer};
pub use claims::ClaimsSet;
pub use config::{JwtBuildConfig, KeyConfig};
pub use error::*;
pub use futures::TokenBuildFuture;
pub use keys::{FileKeySource, KeyFormat, KeyResolver, KeyRole, KeySource, MemoryKeySource};
pub use stages::{JweHeaderConfig, JwsHeaderConfig};
pub use types::*;
