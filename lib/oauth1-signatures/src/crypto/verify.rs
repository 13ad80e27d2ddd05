use miette::Diagnostic;
use ring::signature::UnparsedPublicKey;
use thiserror::Error;

/// Verification error
#[derive(Debug, Diagnostic, Error)]
pub enum VerifyError {
    /// The signature isn't valid Base64
    #[error(transparent)]
    Base64(#[from] base64_simd::Error),

    /// The signature doesn't match the message
    #[error("Signature mismatch")]
    Mismatch,
}

/// Check a Base64 encoded signature over `msg` against the public key
#[inline]
pub fn verify<B>(
    msg: &[u8],
    encoded_signature: &str,
    key: &UnparsedPublicKey<B>,
) -> Result<(), VerifyError>
where
    B: AsRef<[u8]>,
{
    let signature = base64_simd::STANDARD.decode_to_vec(encoded_signature)?;
    key.verify(msg, &signature)
        .map_err(|_| VerifyError::Mismatch)
}
