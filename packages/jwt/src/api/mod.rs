//! Staged builder API
//!
//! A build moves through three owned stages:
//! [`JwtClaimsBuilder`] → [`JwsBuilder`] → [`JweBuilder`]. Each transition
//! consumes the previous stage, and [`JwsBuilder::inner_sign`] is the only
//! way to obtain an encryption stage whose payload is a nested JWT.

pub mod builders;
pub mod claims_builder;
pub mod jwe_builder;
pub mod jws_builder;

pub use builders::{Jwt, JwtIssuer};
pub use claims_builder::JwtClaimsBuilder;
pub use jwe_builder::{JweBuilder, JwePayload};
pub use jws_builder::JwsBuilder;
