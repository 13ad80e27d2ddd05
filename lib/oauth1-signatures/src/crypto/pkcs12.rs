//!
//! Load signing keys out of password-protected PKCS#12 key stores
//!
//! Certificates stored alongside the key are ignored
//!

use super::{SigningKey, parse};
use miette::Diagnostic;
use p12::{AlgorithmIdentifier, PFX};
use pkcs8::SecretDocument;
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};
use thiserror::Error;
use tracing::{debug, instrument};

/// The key store couldn't be decoded
#[derive(Debug, Diagnostic, Error)]
pub enum DecodeError {
    /// The private key bag held something that isn't a valid private key
    #[error("Malformed private key")]
    Key(#[source] parse::Error),

    /// Key store contains more than one private key
    #[error("Key store contains {0} private keys, expected exactly one")]
    AmbiguousPrivateKey(usize),

    /// MAC verification failed
    #[error("Incorrect key store password")]
    #[diagnostic(help("use the password the key store was exported with"))]
    IncorrectPassword,

    /// Malformed PKCS#12 structure
    #[error("Malformed PKCS#12 container: {0}")]
    Malformed(String),

    /// Key store carries no MAC, so the password can't be checked
    #[error("Key store has no integrity MAC")]
    #[diagnostic(help("export the key store with a MAC"))]
    MissingMac,

    /// Key store contains no private key
    #[error("Key store contains no private key")]
    MissingPrivateKey,

    /// The MAC uses a digest other than SHA-1
    #[error("Unsupported key store MAC algorithm: {0}")]
    #[diagnostic(help("export the key store with `openssl pkcs12 -export -legacy`"))]
    UnsupportedAlgorithm(String),
}

/// Key store loading error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Decoding the key store failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Decode(#[from] DecodeError),

    /// Reading the key store failed
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The private key isn't an RSA key
    #[error("Private key isn't an RSA key")]
    #[diagnostic(help("`RSA-SHA256` signatures require an RSA key"))]
    KeyType,
}

impl From<parse::Error> for Error {
    fn from(value: parse::Error) -> Self {
        match value {
            parse::Error::UnsupportedKeyType => Self::KeyType,
            other => Self::Decode(DecodeError::Key(other)),
        }
    }
}

/// Load the signing key out of the PKCS#12 key store at the given path
///
/// The file is read in full and decoded via [`decode`]. Nothing is cached, every call hits the filesystem again.
#[inline]
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_from_path<P>(path: P, password: &str) -> Result<SigningKey, Error>
where
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    load_from_reader(file, password)
}

/// Load the signing key out of a PKCS#12 key store read from an arbitrary reader
///
/// The reader is consumed until EOF. It is neither rewound nor closed.
#[inline]
#[instrument(skip_all)]
pub fn load_from_reader<R>(mut reader: R, password: &str) -> Result<SigningKey, Error>
where
    R: Read,
{
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    debug!(size = buffer.len(), "read key store");

    decode(&buffer, password)
}

/// Decode a DER encoded PKCS#12 key store and extract its single private key
///
/// - Only SHA-1 MACs are supported, anything else is [`DecodeError::UnsupportedAlgorithm`]
/// - Key stores without a MAC are rejected with [`DecodeError::MissingMac`]
/// - A MAC mismatch is reported as [`DecodeError::IncorrectPassword`]
/// - The key store must hold exactly one private key
/// - The private key must be an RSA key, otherwise [`Error::KeyType`] is returned
pub fn decode(der: &[u8], password: &str) -> Result<SigningKey, Error> {
    let pfx = PFX::parse(der).map_err(|err| DecodeError::Malformed(format!("{err:?}")))?;
    let Some(ref mac_data) = pfx.mac_data else {
        return Err(DecodeError::MissingMac.into());
    };

    // `verify_mac` panics on anything but SHA-1
    let digest_algorithm = &mac_data.mac.digest_algorithm;
    if !matches!(digest_algorithm, AlgorithmIdentifier::Sha1) {
        debug!(?digest_algorithm, "unsupported MAC digest");
        return Err(DecodeError::UnsupportedAlgorithm(format!("{digest_algorithm:?}")).into());
    }

    if !pfx.verify_mac(password) {
        debug!("key store MAC verification failed");
        return Err(DecodeError::IncorrectPassword.into());
    }

    let mut key_bags = pfx
        .key_bags(password)
        .map_err(|err| DecodeError::Malformed(format!("{err:?}")))?;

    let key_der = match key_bags.len() {
        0 => return Err(DecodeError::MissingPrivateKey.into()),
        1 => key_bags.swap_remove(0),
        count => return Err(DecodeError::AmbiguousPrivateKey(count).into()),
    };

    let document = SecretDocument::try_from(key_der).map_err(parse::Error::from)?;
    let key = parse::private_key(document.as_bytes())?;
    debug!(modulus_len = key.modulus_len(), "decoded signing key");

    Ok(key)
}

#[cfg(test)]
mod test {
    use super::{DecodeError, Error, decode};

    #[test]
    fn garbage_is_malformed() {
        let err = decode(b"definitely not a key store", "password").unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Malformed(..))));
    }

    #[test]
    fn empty_input_is_malformed() {
        let err = decode(&[], "password").unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Malformed(..))));
    }
}
