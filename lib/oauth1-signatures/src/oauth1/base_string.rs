//!
//! Utilities for building signature base strings
//!

use super::{Error, Parameters};
use http::Uri;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, PercentEncode, utf8_percent_encode};
use std::fmt::Write;
use url::form_urlencoded;

/// Everything except the RFC 3986 unreserved characters
const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a value the way OAuth 1.0a expects it
#[inline]
pub fn encode(input: &str) -> PercentEncode<'_> {
    utf8_percent_encode(input, ENCODE_SET)
}

/// Normalised base URI of the request: lowercase scheme and host, no default port, no query
pub fn base_uri(uri: &Uri) -> Result<String, Error> {
    let scheme = uri.scheme_str().ok_or(Error::RelativeUri)?.to_ascii_lowercase();
    let host = uri.host().ok_or(Error::RelativeUri)?.to_ascii_lowercase();

    let mut base_uri = format!("{scheme}://{host}");
    match (scheme.as_str(), uri.port_u16()) {
        ("http", Some(80)) | ("https", Some(443)) | (_, None) => {}
        (_, Some(port)) => {
            let _ = write!(base_uri, ":{port}");
        }
    }

    match uri.path() {
        "" => base_uri.push('/'),
        path => base_uri.push_str(path),
    }

    Ok(base_uri)
}

/// Normalised parameter string made up of the query parameters and the OAuth parameters
///
/// Every name and value is encoded, then the pairs are sorted by name and value
pub fn parameter_string<S>(uri: &Uri, parameters: &Parameters<S>) -> String {
    let query_pairs = uri
        .query()
        .map(|query| form_urlencoded::parse(query.as_bytes()))
        .into_iter()
        .flatten()
        .map(|(name, value)| (encode(&name).to_string(), encode(&value).to_string()));

    let oauth_pairs = parameters
        .signed_pairs()
        .into_iter()
        .map(|(name, value)| (encode(name).to_string(), encode(&value).to_string()));

    let mut pairs: Vec<(String, String)> = query_pairs.chain(oauth_pairs).collect();
    pairs.sort_unstable();

    let mut parameter_string = String::new();
    for (name, value) in pairs {
        if !parameter_string.is_empty() {
            parameter_string.push('&');
        }

        let _ = write!(parameter_string, "{name}={value}");
    }

    parameter_string
}

/// Construct the signature base string for a request
///
/// `METHOD&encoded base URI&encoded parameter string`
#[inline]
pub fn construct<B, S>(request: &http::Request<B>, parameters: &Parameters<S>) -> Result<String, Error> {
    let method = request.method().as_str().to_ascii_uppercase();
    let base_uri = base_uri(request.uri())?;
    let parameter_string = parameter_string(request.uri(), parameters);

    Ok(format!(
        "{method}&{}&{}",
        encode(&base_uri),
        encode(&parameter_string)
    ))
}

#[cfg(test)]
mod test {
    use super::{base_uri, encode, parameter_string};
    use crate::oauth1::{Error, Parameters};
    use http::{Method, Request, Uri};

    const NONCE: &str = "kllo9940pd9333jh";
    const TIMESTAMP: u64 = 1_191_242_096;
    const EMPTY_BODY_HASH: &str = "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=";

    fn parameters() -> Parameters<()> {
        Parameters::new("abc123", b"", NONCE, TIMESTAMP)
    }

    #[test]
    fn encode_unreserved() {
        assert_eq!(encode("AZaz09-._~").to_string(), "AZaz09-._~");
        assert_eq!(encode("a b+c/d=e&f").to_string(), "a%20b%2Bc%2Fd%3De%26f");
        assert_eq!(encode("ü").to_string(), "%C3%BC");
        assert_eq!(encode("*").to_string(), "%2A");
    }

    #[test]
    fn base_uri_normalisation() {
        let cases = [
            ("https://api.example.com/resource", "https://api.example.com/resource"),
            ("HTTPS://API.Example.COM/Resource", "https://api.example.com/Resource"),
            ("https://api.example.com:443/resource?x=1", "https://api.example.com/resource"),
            ("http://api.example.com:80/", "http://api.example.com/"),
            ("http://api.example.com:8080/a", "http://api.example.com:8080/a"),
            ("https://api.example.com:80/a", "https://api.example.com:80/a"),
            ("https://api.example.com", "https://api.example.com/"),
        ];

        for (input, expected) in cases {
            assert_eq!(base_uri(&Uri::from_static(input)).unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn base_uri_requires_absolute_uri() {
        let err = base_uri(&Uri::from_static("/resource?x=1")).unwrap_err();
        assert!(matches!(err, Error::RelativeUri));
    }

    #[test]
    fn parameter_string_without_query() {
        let uri = Uri::from_static("https://api.example.com/resource");
        let expected = format!(
            "oauth_body_hash={}&oauth_consumer_key=abc123&oauth_nonce={NONCE}&oauth_signature_method=RSA-SHA256&oauth_timestamp={TIMESTAMP}&oauth_version=1.0",
            encode(EMPTY_BODY_HASH)
        );

        assert_eq!(parameter_string(&uri, &parameters()), expected);
    }

    #[test]
    fn parameter_string_sorts_query() {
        let uri = Uri::from_static("https://api.example.com/resource?b=2&a=3&a=1&z=hello+world");
        let parameter_string = parameter_string(&uri, &parameters());

        assert!(parameter_string.starts_with("a=1&a=3&b=2&oauth_body_hash="));
        assert!(parameter_string.ends_with("&oauth_version=1.0&z=hello%20world"));
    }

    #[test]
    fn base_string() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("https://api.example.com/resource?q=1")
            .body(())
            .unwrap();

        let base_string = super::construct(&request, &parameters()).unwrap();
        let expected = format!(
            "GET&https%3A%2F%2Fapi.example.com%2Fresource&oauth_body_hash%3D{}%26oauth_consumer_key%3Dabc123%26oauth_nonce%3D{NONCE}%26oauth_signature_method%3DRSA-SHA256%26oauth_timestamp%3D{TIMESTAMP}%26oauth_version%3D1.0%26q%3D1",
            encode(&encode(EMPTY_BODY_HASH).to_string())
        );

        assert_eq!(base_string, expected);
    }
}
