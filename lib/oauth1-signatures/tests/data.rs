#![allow(dead_code)]

use oauth1_signatures::crypto::{SigningKey, parse, pkcs12};
use p12::PFX;
use ring::{
    rand::SystemRandom,
    signature::{Ed25519KeyPair, UnparsedPublicKey},
};

/// Password of [`KEY_STORE`]
pub const PASSWORD: &str = "test-password";

/// PKCS#12 key store exported by OpenSSL (3DES, SHA-1 MAC) holding [`PRIVATE_KEY`] and [`CERTIFICATE`]
pub const KEY_STORE: &[u8] = include_bytes!("data/keystore.p12");

/// [`KEY_STORE`] as exported by OpenSSL 3 defaults (PBES2/AES-256, SHA-256 MAC)
pub const KEY_STORE_PBES2: &[u8] = include_bytes!("data/keystore_pbes2.p12");

/// [`KEY_STORE`] exported with `-nomac`
pub const KEY_STORE_NO_MAC: &[u8] = include_bytes!("data/keystore_nomac.p12");

/// Key store holding [`PRIVATE_KEY`] and a second unrelated RSA key, password [`PASSWORD`]
pub const KEY_STORE_TWO_KEYS: &[u8] = include_bytes!("data/keystore_two_keys.p12");

/// RSA-2048 private key, PKCS#8 DER
pub const PRIVATE_KEY: &[u8] = include_bytes!("data/private_key.der");

/// Self-signed certificate for [`PRIVATE_KEY`], DER
pub const CERTIFICATE: &[u8] = include_bytes!("data/certificate.der");

/// Public key of [`PRIVATE_KEY`], SubjectPublicKeyInfo DER
pub const PUBLIC_KEY: &[u8] = include_bytes!("data/public_key.der");

pub const CONSUMER_KEY: &str = "abc123";
pub const NONCE: &str = "kllo9940pd9333jh";
pub const TIMESTAMP: u64 = 1_191_242_096;

/// Signed with [`PRIVATE_KEY`] by OpenSSL: `GET https://api.example.com/resource?q=1`, empty body
pub const GET_AUTHORIZATION: &str = r#"OAuth oauth_body_hash="47DEQpj8HBSa%2B%2FTImW%2B5JCeuQeRkm5NMpJWZG3hSuFU%3D",oauth_consumer_key="abc123",oauth_nonce="kllo9940pd9333jh",oauth_signature="Zi0MY3W0kmD%2FlJhc%2FSewR5jJZCpghvSsSoxOxEW5Yn38OJkvBqr%2BlkLyphyjd3eTRntXL%2F%2BIceL783fHGXUyXuJ5knAN3Fw7caVtGXs%2BAoExam39mfHdpPfenbto%2BIYWKhVwm3KF4FozvQvleZEChMtFOHzqLtipa7F11xD9lC6s5Ok93iRcSfQxBM6brQPr2UMf7BKYrQZjYO0z8lRfcSCyHzWAoQBT%2FYSDF57k9O7d79FIJSzEX303mlAbbgwmWeaCrArBjXwyhakLBlmuWhZ%2FChivc9IKkH4XtoQ4ZpiCJyEHP26D1dXdK51h5H%2BsOm%2Beby0vGH0DThnb6V%2BKOA%3D%3D",oauth_signature_method="RSA-SHA256",oauth_timestamp="1191242096",oauth_version="1.0""#;

/// Signed with [`PRIVATE_KEY`] by OpenSSL: `POST https://api.example.com/payments`, body [`POST_BODY`]
pub const POST_AUTHORIZATION: &str = r#"OAuth oauth_body_hash="TUu%2BWcaq0iRCzeGZpqil8DRAX814%2B1qBwk7ySd4cRfE%3D",oauth_consumer_key="abc123",oauth_nonce="kllo9940pd9333jh",oauth_signature="lEUDrMMPjczRKa3Pha5wY2c93Rd70yDoe%2FbARVBnzn8DPb30izF1ok2PiV53l2fRNiGQ4Dta2jMV4nGX14wJH%2BbQvF0iHSfYh2bHxtlVjeHVcIn7AFHhwd62OCVT86d185UtyZBEx%2BeV9C9yeQ%2FWLjdg%2F2sRaunL1OBn3qTYwh%2Fhotzaurg0aQdcBbwNWThBUAcs2AP2ffs%2FqBpy%2BOgYeEh2s1tedQ7dq6FB61dGtErslu%2FasuAjwjPn0BtlSh%2Fpfk2mD81HsNL%2Bor7tfpr2MjGmErcW4SAy%2FTXII0C2gorUOgqzmweGs%2Bk%2FaG1y3Kwn4v%2BCRzoyD6S3waE%2FVOfn5A%3D%3D",oauth_signature_method="RSA-SHA256",oauth_timestamp="1191242096",oauth_version="1.0""#;

pub const POST_BODY: &str = r#"{"amount":100}"#;

/// Bundle a private key with the test certificate into a fresh key store
#[must_use]
pub fn key_store(key_der: &[u8], password: &str) -> Vec<u8> {
    PFX::new(CERTIFICATE, key_der, None, password, "oauthsign-test")
        .unwrap()
        .to_der()
}

#[must_use]
pub fn signing_key() -> SigningKey {
    pkcs12::decode(KEY_STORE, PASSWORD).unwrap()
}

#[must_use]
pub fn public_key() -> UnparsedPublicKey<Vec<u8>> {
    parse::public_key(PUBLIC_KEY).unwrap()
}

#[must_use]
pub fn ed25519_private_key() -> Vec<u8> {
    Ed25519KeyPair::generate_pkcs8(&SystemRandom::new())
        .unwrap()
        .as_ref()
        .to_vec()
}
