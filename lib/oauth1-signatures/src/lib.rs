//!
//! OAuth 1.0a request signatures (`RSA-SHA256` with body hashes), keyed by RSA keys stored in PKCS#12 key stores
//!

pub mod crypto;
pub mod oauth1;

pub use self::oauth1::{Sign, Signer};
