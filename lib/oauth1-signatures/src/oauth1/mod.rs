//!
//! OAuth 1.0a `RSA-SHA256` signatures with the `oauth_body_hash` extension
//!

use crate::crypto;
use http::header::{InvalidHeaderValue, ToStrError};
use miette::Diagnostic;
use ring::digest::{SHA256, digest};
use std::{borrow::Cow, time::SystemTimeError};
use thiserror::Error;

mod parse;
mod serialise;
mod signer;
mod verify;

pub mod base_string;

pub use self::parse::{ParseError, parse};
pub use self::serialise::serialise;
pub use self::signer::{Sign, Signer};
pub use self::verify::verify;

/// The only signature method this implementation produces and accepts
pub const SIGNATURE_METHOD: &str = "RSA-SHA256";

/// Protocol version sent along with every signature
pub const VERSION: &str = "1.0";

/// Number of characters in a generated nonce
pub const NONCE_LENGTH: usize = 16;

/// OAuth module error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// The body hash in the header doesn't match the request body
    #[error("Body hash mismatch")]
    BodyHashMismatch,

    /// Signature computation failed
    #[error("Failed to compute signature")]
    Crypto,

    /// Computed header value isn't a valid HTTP header value
    #[error(transparent)]
    InvalidHeaderValue(#[from] InvalidHeaderValue),

    /// The `Authorization` header isn't an OAuth header
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidAuthorizationHeader(#[from] ParseError),

    /// The system clock is set to a time before the Unix epoch
    #[error(transparent)]
    InvalidSystemTime(#[from] SystemTimeError),

    /// The `Authorization` header isn't valid UTF-8
    #[error(transparent)]
    InvalidToStr(#[from] ToStrError),

    /// The `Authorization` header is missing
    #[error("Missing authorization header")]
    MissingAuthorization,

    /// The request URI has no scheme or no host, so no base URI can be derived from it
    #[error("Request URI has to be absolute")]
    RelativeUri,

    /// Signature method other than `RSA-SHA256`
    #[error("Unsupported signature method")]
    UnsupportedSignatureMethod,

    /// Signature verification failed
    #[error(transparent)]
    Verify(#[from] crypto::VerifyError),
}

/// OAuth protocol parameters
///
/// `S` is the signature. It is `()` while the signature is still being computed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameters<S = String> {
    /// `oauth_body_hash`
    pub body_hash: String,

    /// `oauth_consumer_key`
    pub consumer_key: String,

    /// `oauth_nonce`
    pub nonce: String,

    /// `oauth_signature_method`
    pub signature_method: String,

    /// `oauth_timestamp`
    pub timestamp: u64,

    /// `oauth_version`
    pub version: String,

    /// `oauth_signature`
    pub signature: S,
}

impl Parameters<()> {
    /// Prepare unsigned parameters for the given consumer and request body
    #[must_use]
    pub fn new(consumer_key: &str, body: &[u8], nonce: &str, timestamp: u64) -> Self {
        Self {
            body_hash: body_hash(body),
            consumer_key: consumer_key.to_owned(),
            nonce: nonce.to_owned(),
            signature_method: SIGNATURE_METHOD.to_owned(),
            timestamp,
            version: VERSION.to_owned(),
            signature: (),
        }
    }
}

impl<S> Parameters<S> {
    /// Name/value pairs of every parameter that is covered by the signature
    pub fn signed_pairs(&self) -> [(&'static str, Cow<'_, str>); 6] {
        [
            ("oauth_body_hash", Cow::Borrowed(self.body_hash.as_str())),
            ("oauth_consumer_key", Cow::Borrowed(self.consumer_key.as_str())),
            ("oauth_nonce", Cow::Borrowed(self.nonce.as_str())),
            (
                "oauth_signature_method",
                Cow::Borrowed(self.signature_method.as_str()),
            ),
            ("oauth_timestamp", Cow::Owned(self.timestamp.to_string())),
            ("oauth_version", Cow::Borrowed(self.version.as_str())),
        ]
    }

    /// Attach a signature
    #[must_use]
    pub fn with_signature<T>(self, signature: T) -> Parameters<T> {
        Parameters {
            body_hash: self.body_hash,
            consumer_key: self.consumer_key,
            nonce: self.nonce,
            signature_method: self.signature_method,
            timestamp: self.timestamp,
            version: self.version,
            signature,
        }
    }
}

/// Base64 encoded SHA-256 hash of the body, the value of `oauth_body_hash`
#[inline]
#[must_use]
pub fn body_hash(body: &[u8]) -> String {
    base64_simd::STANDARD.encode_to_string(digest(&SHA256, body))
}
