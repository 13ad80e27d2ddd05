use bytes::Bytes;
use core::convert::Infallible;
use http::header::{AUTHORIZATION, USER_AGENT};
use http_body_util::{BodyExt, Empty, Full, LengthLimitError};
use hyper::{Request, Response};
use oauth1_signatures::{Signer, crypto, crypto::pkcs12, oauth1};
use oauthsign_http_client::{Body, Client};
use serde::Deserialize;
use std::{io::Write, time::Duration};
use tower::service_fn;

const KEY_STORE: &[u8] = include_bytes!("data/keystore.p12");
const PASSWORD: &str = "test-password";
const PUBLIC_KEY: &[u8] = include_bytes!("data/public_key.der");

#[tokio::test]
async fn basic_request() {
    let client = service_fn(|req: Request<_>| async move {
        assert_eq!(req.uri().path_and_query().unwrap(), "/path");
        assert!(req.headers().get(AUTHORIZATION).is_none());
        assert!(req.headers().contains_key(USER_AGENT));
        Ok::<_, Infallible>(Response::new(Empty::<Bytes>::new()))
    });
    let client = Client::builder().service(client);

    let req = Request::builder()
        .uri("https://example.com/path")
        .body(Body::empty())
        .unwrap();
    let response = client.execute(req).await.unwrap();

    assert!(response.status().is_success());
}

#[tokio::test]
async fn signed_request() {
    let signer = Signer::from_reader("abc123", KEY_STORE, PASSWORD).unwrap();
    let client = service_fn(|req: Request<Body>| async move {
        let (parts, body) = req.into_parts();
        let body = body.collect().await.unwrap().to_bytes();
        let req = Request::from_parts(parts, body);

        let public_key = crypto::parse::public_key(PUBLIC_KEY).unwrap();
        let parameters = oauth1::verify(&req, &public_key).unwrap();
        assert_eq!(parameters.consumer_key, "abc123");
        assert_eq!(req.headers()[USER_AGENT], "integration-test");

        Ok::<_, Infallible>(Response::new(Full::new(Bytes::from_static(
            br#"{"status":"ok"}"#,
        ))))
    });
    let client = Client::builder()
        .user_agent("integration-test")
        .unwrap()
        .timeout(Some(Duration::from_secs(5)))
        .signer(signer)
        .service(client);

    #[derive(Deserialize)]
    struct Status {
        status: String,
    }

    let response = client.get("https://api.example.com/resource").await.unwrap();
    let status: Status = response.json().await.unwrap();
    assert_eq!(status.status, "ok");
}

#[tokio::test]
async fn request_body_limit() {
    let signer = Signer::from_reader("abc123", KEY_STORE, PASSWORD).unwrap();
    let client = service_fn(|_req: Request<Body>| async move {
        Err::<Response<Empty<Bytes>>, _>(std::io::Error::other(
            "oversized request reached the transport",
        ))
    });
    let client = Client::builder()
        .request_body_limit(Some(8))
        .signer(signer)
        .service(client);

    let req = Request::builder()
        .method("POST")
        .uri("https://api.example.com/payments")
        .body(Body::from("this body is way too long"))
        .unwrap();

    let err = client.execute(req).await.unwrap_err();
    assert!(err.into_inner().is::<LengthLimitError>());
}

#[tokio::test]
async fn from_key_store() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(KEY_STORE).unwrap();

    let client = Client::from_key_store("abc123", file.path(), PASSWORD);
    assert!(client.is_ok());
}

#[test]
fn from_key_store_wrong_password() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(KEY_STORE).unwrap();

    let err = Client::from_key_store("abc123", file.path(), "hunter2").unwrap_err();
    assert!(matches!(
        err.key_store(),
        Some(pkcs12::Error::Decode(pkcs12::DecodeError::IncorrectPassword))
    ));
}

#[test]
fn from_key_store_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let err = Client::from_key_store("abc123", dir.path().join("keystore.p12"), PASSWORD)
        .unwrap_err();
    assert!(matches!(err.key_store(), Some(pkcs12::Error::Io(..))));
}
