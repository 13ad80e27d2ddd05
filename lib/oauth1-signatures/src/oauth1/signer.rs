use super::{Error, NONCE_LENGTH, Parameters, base_string, serialise};
use crate::crypto::{self, SigningKey, pkcs12};
use http::{HeaderValue, header::AUTHORIZATION};
use rand::{Rng, distributions::Alphanumeric};
use std::{
    fmt,
    io::Read,
    path::Path,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{debug, instrument};

/// Capability of signing an HTTP request in place
///
/// Implementations attach their authentication header(s) to the request and must not touch the body
pub trait Sign {
    /// Error returned when the request can't be signed
    type Error;

    /// Sign the request
    fn sign<B>(&self, req: &mut http::Request<B>) -> Result<(), Self::Error>
    where
        B: AsRef<[u8]>;
}

struct Inner {
    consumer_key: String,
    key: SigningKey,
}

/// OAuth 1.0a signer identity: consumer key plus RSA private key
///
/// Cloning is cheap, clones share the key
#[derive(Clone)]
pub struct Signer {
    inner: Arc<Inner>,
}

impl Signer {
    /// Construct a signer from an already loaded key
    #[must_use]
    pub fn new<C>(consumer_key: C, key: SigningKey) -> Self
    where
        C: Into<String>,
    {
        Self {
            inner: Arc::new(Inner {
                consumer_key: consumer_key.into(),
                key,
            }),
        }
    }

    /// Construct a signer with the key stored in the PKCS#12 key store at the given path
    ///
    /// # Errors
    ///
    /// Loading the key failed, see [`pkcs12::load_from_path`]
    pub fn from_key_store<C, P>(consumer_key: C, path: P, password: &str) -> Result<Self, pkcs12::Error>
    where
        C: Into<String>,
        P: AsRef<Path>,
    {
        let key = pkcs12::load_from_path(path, password)?;
        Ok(Self::new(consumer_key, key))
    }

    /// Construct a signer with the key read from a PKCS#12 key store
    ///
    /// # Errors
    ///
    /// Loading the key failed, see [`pkcs12::load_from_reader`]
    pub fn from_reader<C, R>(consumer_key: C, reader: R, password: &str) -> Result<Self, pkcs12::Error>
    where
        C: Into<String>,
        R: Read,
    {
        let key = pkcs12::load_from_reader(reader, password)?;
        Ok(Self::new(consumer_key, key))
    }

    /// Consumer key this signer identifies as
    #[must_use]
    pub fn consumer_key(&self) -> &str {
        &self.inner.consumer_key
    }

    /// Key used to produce signatures
    #[must_use]
    pub fn signing_key(&self) -> &SigningKey {
        &self.inner.key
    }

    /// Compute the `Authorization` header value for the request with a fixed nonce and timestamp
    ///
    /// # Errors
    ///
    /// - The request URI isn't absolute
    /// - The signature couldn't be computed
    pub fn authorization<B>(
        &self,
        req: &http::Request<B>,
        nonce: &str,
        timestamp: u64,
    ) -> Result<String, Error>
    where
        B: AsRef<[u8]>,
    {
        let parameters = Parameters::new(self.consumer_key(), req.body().as_ref(), nonce, timestamp);
        let base_string = base_string::construct(req, &parameters)?;
        let signature =
            crypto::sign(base_string.as_bytes(), self.signing_key()).map_err(|_| Error::Crypto)?;

        Ok(serialise(&parameters.with_signature(signature)))
    }

    /// Sign the request with a fixed nonce and timestamp
    ///
    /// Replaces any `Authorization` header already present
    ///
    /// # Errors
    ///
    /// See [`Signer::authorization`]
    pub fn sign_with<B>(
        &self,
        req: &mut http::Request<B>,
        nonce: &str,
        timestamp: u64,
    ) -> Result<(), Error>
    where
        B: AsRef<[u8]>,
    {
        let header_value = HeaderValue::from_str(&self.authorization(req, nonce, timestamp)?)?;
        req.headers_mut().insert(AUTHORIZATION, header_value);

        Ok(())
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("consumer_key", &self.inner.consumer_key)
            .finish_non_exhaustive()
    }
}

impl Sign for Signer {
    type Error = Error;

    #[instrument(skip_all, fields(method = %req.method(), uri = %req.uri()))]
    fn sign<B>(&self, req: &mut http::Request<B>) -> Result<(), Self::Error>
    where
        B: AsRef<[u8]>,
    {
        let nonce = generate_nonce();
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        self.sign_with(req, &nonce, timestamp)
            .inspect_err(|error| debug!(?error, "failed to sign request"))
    }
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod test {
    use super::generate_nonce;
    use crate::oauth1::NONCE_LENGTH;

    #[test]
    fn nonce_shape() {
        let nonce = generate_nonce();
        assert_eq!(nonce.len(), NONCE_LENGTH);
        assert!(nonce.bytes().all(|byte| byte.is_ascii_alphanumeric()));
        assert_ne!(nonce, generate_nonce());
    }
}
