use super::{Parameters, base_string::encode};
use std::fmt::Write;

/// Serialise signed parameters into an `Authorization` header value
///
/// Parameters are emitted in lexicographic order and every value is percent-encoded
#[inline]
#[must_use]
pub fn serialise(parameters: &Parameters) -> String {
    let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(7);
    let signed_pairs = parameters.signed_pairs();
    pairs.extend(signed_pairs.iter().map(|(name, value)| (*name, value.as_ref())));
    pairs.push(("oauth_signature", parameters.signature.as_str()));
    pairs.sort_unstable_by_key(|(name, _value)| *name);

    let mut buffer = String::from("OAuth ");
    for (idx, (name, value)) in pairs.into_iter().enumerate() {
        if idx > 0 {
            buffer.push(',');
        }

        let _ = write!(buffer, "{name}=\"{}\"", encode(value));
    }

    buffer
}
