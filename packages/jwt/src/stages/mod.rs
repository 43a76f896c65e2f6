//! Pipeline stages: claims are signed into a JWS, which may be encrypted into a JWE
//!
//! Each stage reads keys through a [`KeyResolver`](crate::keys::KeyResolver)
//! built from one configuration snapshot and returns either a complete
//! compact token or an error.

pub mod jwe;
pub mod jws;

pub use jwe::{JweHeaderConfig, encrypt};
pub use jws::{JwsHeaderConfig, sign};
