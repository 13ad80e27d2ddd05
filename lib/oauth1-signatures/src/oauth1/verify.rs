use super::{Error, Parameters, SIGNATURE_METHOD, base_string, body_hash, parse};
use crate::crypto;
use http::header::AUTHORIZATION;
use ring::signature::UnparsedPublicKey;
use tracing::{debug, instrument};

/// Verify the OAuth signature of a request against the signer's public key
///
/// Checks the body hash and the signature. Timestamps and nonces aren't checked for freshness.
/// Returns the parameters the request was signed with.
///
/// # Errors
///
/// - The `Authorization` header is missing or malformed
/// - The signature method isn't `RSA-SHA256`
/// - The body hash doesn't match the body
/// - The signature doesn't match
#[instrument(skip_all)]
pub fn verify<B, K>(
    req: &http::Request<B>,
    public_key: &UnparsedPublicKey<K>,
) -> Result<Parameters, Error>
where
    B: AsRef<[u8]>,
    K: AsRef<[u8]>,
{
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        debug!("Missing 'Authorization' header");
        return Err(Error::MissingAuthorization);
    };

    let parameters = parse(header.to_str()?)?;
    if parameters.signature_method != SIGNATURE_METHOD {
        return Err(Error::UnsupportedSignatureMethod);
    }

    if parameters.body_hash != body_hash(req.body().as_ref()) {
        return Err(Error::BodyHashMismatch);
    }

    let base_string = base_string::construct(req, &parameters)?;
    crypto::verify(base_string.as_bytes(), &parameters.signature, public_key)?;

    Ok(parameters)
}
