use ring::{
    error::Unspecified,
    rand::SystemRandom,
    signature::{RSA_PKCS1_SHA256, RsaKeyPair},
};
use std::fmt;

/// RSA private key used to produce `RSA-SHA256` signatures
pub struct SigningKey {
    inner: RsaKeyPair,
}

impl SigningKey {
    pub(crate) fn from_rsa(inner: RsaKeyPair) -> Self {
        Self { inner }
    }

    /// DER encoded `RSAPublicKey` belonging to this private key
    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        self.inner.public().as_ref()
    }

    /// Length of the modulus in bytes (which is also the length of every signature)
    #[must_use]
    pub fn modulus_len(&self) -> usize {
        self.inner.public().modulus_len()
    }

    /// Sign a message using RSASSA-PKCS1-v1_5 with SHA-256
    ///
    /// PKCS#1 v1.5 padding is deterministic, so the same key and message always yield the same signature
    pub fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, Unspecified> {
        let mut buf = vec![0; self.modulus_len()];

        let rng = SystemRandom::new();
        self.inner.sign(&RSA_PKCS1_SHA256, &rng, msg, &mut buf)?;

        Ok(buf)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("modulus_len", &self.modulus_len())
            .finish_non_exhaustive()
    }
}

/// Sign a message with the provided signing key and encode the returned signature in Base64
#[inline]
pub fn sign(payload: &[u8], key: &SigningKey) -> Result<String, Unspecified> {
    let signature = key.sign(payload)?;
    Ok(base64_simd::STANDARD.encode_to_string(signature))
}
