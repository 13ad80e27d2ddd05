//!
//! Parse DER encoded keys for use in the OAuth signature implementation
//!

use super::SigningKey;
use const_oid::db::rfc5912::RSA_ENCRYPTION;
use miette::Diagnostic;
use pkcs8::{PrivateKeyInfo, SubjectPublicKeyInfoRef, der::Decode};
use ring::signature::{RSA_PKCS1_2048_8192_SHA256, RsaKeyPair, UnparsedPublicKey};
use thiserror::Error;

/// Key parsing error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Malformed DER structure
    #[error(transparent)]
    Der(#[from] pkcs8::der::Error),

    /// Key rejected
    #[error(transparent)]
    KeyRejected(#[from] ring::error::KeyRejected),

    /// Malformed key
    #[error("Malformed key")]
    MalformedKey,

    /// The key isn't an RSA key
    #[error("Unsupported key type")]
    #[diagnostic(help("`RSA-SHA256` signatures require an RSA key"))]
    UnsupportedKeyType,
}

/// Parse an RSA public key from its DER encoded `SubjectPublicKeyInfo` form
#[inline]
pub fn public_key(der: &[u8]) -> Result<UnparsedPublicKey<Vec<u8>>, Error> {
    let spki = SubjectPublicKeyInfoRef::from_der(der)?;
    if spki.algorithm.oid != RSA_ENCRYPTION {
        return Err(Error::UnsupportedKeyType);
    }

    let raw_bytes = spki
        .subject_public_key
        .as_bytes()
        .ok_or(Error::MalformedKey)?
        .to_vec();

    Ok(UnparsedPublicKey::new(&RSA_PKCS1_2048_8192_SHA256, raw_bytes))
}

/// Parse an RSA private key from its DER encoded PKCS#8 form
///
/// Keys of any other algorithm are rejected with [`Error::UnsupportedKeyType`]
#[inline]
pub fn private_key(der: &[u8]) -> Result<SigningKey, Error> {
    let private_key_raw = PrivateKeyInfo::from_der(der)?;
    if private_key_raw.algorithm.oid != RSA_ENCRYPTION {
        return Err(Error::UnsupportedKeyType);
    }

    let key_pair = RsaKeyPair::from_der(private_key_raw.private_key)?;
    Ok(SigningKey::from_rsa(key_pair))
}
