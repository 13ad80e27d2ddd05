use super::Parameters;
use logos::{Logos, Span};
use miette::{Diagnostic, SourceSpan};
use percent_encoding::percent_decode_str;
use std::{num::ParseIntError, str::Utf8Error};
use thiserror::Error;

const SCHEME: &str = "OAuth";

#[derive(Debug, Logos, PartialEq)]
#[logos(skip r"[ \t]+")]
enum TokenTy {
    #[regex(r"\w+")]
    Key,

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#)]
    Value,

    #[token(",")]
    Comma,
}

/// `Authorization` header parsing error
#[derive(Debug, Diagnostic, Error)]
pub enum ParseError {
    /// Same parameter specified more than once
    #[error("Duplicate parameter `{0}`")]
    DuplicateParameter(String),

    /// Value isn't valid UTF-8 after percent-decoding
    #[error(transparent)]
    InvalidEncoding(#[from] Utf8Error),

    /// `oauth_timestamp` isn't an integer
    #[error(transparent)]
    InvalidTimestamp(#[from] ParseIntError),

    /// Header doesn't use the `OAuth` scheme
    #[error("Missing `OAuth` scheme")]
    MissingScheme,

    /// Required parameter is absent
    #[error("Missing parameter `{0}`")]
    MissingParameter(&'static str),

    /// Header ended in the middle of a parameter
    #[error("Unexpected end of header")]
    UnexpectedEnd,

    /// Token out of place
    #[error("Unexpected token")]
    UnexpectedToken {
        /// Location of the offending token
        #[label("didn't expect this")]
        span: SourceSpan,
    },

    /// Parameter with the `oauth_` prefix that isn't part of the scheme
    #[error("Unknown parameter `{0}`")]
    UnknownParameter(String),
}

struct Tokens<'a> {
    lexer: logos::SpannedIter<'a, TokenTy>,
    offset: usize,
}

impl Tokens<'_> {
    fn expect(&mut self, expected: TokenTy) -> Result<Span, ParseError> {
        let (token, span) = self.lexer.next().ok_or(ParseError::UnexpectedEnd)?;
        match token {
            Ok(token) if token == expected => Ok(span),
            Ok(..) | Err(()) => Err(ParseError::UnexpectedToken {
                span: (self.offset + span.start..self.offset + span.end).into(),
            }),
        }
    }

    /// `true` if a comma follows, `false` at the end of the input
    fn separator(&mut self) -> Result<bool, ParseError> {
        match self.lexer.next() {
            None => Ok(false),
            Some((Ok(TokenTy::Comma), _span)) => Ok(true),
            Some((Ok(..) | Err(()), span)) => Err(ParseError::UnexpectedToken {
                span: (self.offset + span.start..self.offset + span.end).into(),
            }),
        }
    }
}

/// Parse an `Authorization: OAuth ...` header value into its parameters
///
/// Values are percent-decoded. `realm` and parameters without the `oauth_` prefix are ignored.
pub fn parse(input: &str) -> Result<Parameters, ParseError> {
    let rest = input
        .strip_prefix(SCHEME)
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_whitespace()))
        .ok_or(ParseError::MissingScheme)?;

    let mut tokens = Tokens {
        lexer: TokenTy::lexer(rest).spanned(),
        offset: input.len() - rest.len(),
    };

    let mut body_hash = None;
    let mut consumer_key = None;
    let mut nonce = None;
    let mut signature = None;
    let mut signature_method = None;
    let mut timestamp = None;
    let mut version = None;

    loop {
        let key = &rest[tokens.expect(TokenTy::Key)?];
        tokens.expect(TokenTy::Equals)?;
        let raw_value = rest[tokens.expect(TokenTy::Value)?].trim_matches('"');

        let slot = match key {
            "oauth_body_hash" => Some(&mut body_hash),
            "oauth_consumer_key" => Some(&mut consumer_key),
            "oauth_nonce" => Some(&mut nonce),
            "oauth_signature" => Some(&mut signature),
            "oauth_signature_method" => Some(&mut signature_method),
            "oauth_timestamp" => Some(&mut timestamp),
            "oauth_version" => Some(&mut version),
            key if key.starts_with("oauth_") => {
                return Err(ParseError::UnknownParameter(key.to_owned()));
            }
            _ => None,
        };

        if let Some(slot) = slot {
            let value = percent_decode_str(raw_value).decode_utf8()?.into_owned();
            if slot.replace(value).is_some() {
                return Err(ParseError::DuplicateParameter(key.to_owned()));
            }
        }

        if !tokens.separator()? {
            break;
        }
    }

    Ok(Parameters {
        body_hash: body_hash.ok_or(ParseError::MissingParameter("oauth_body_hash"))?,
        consumer_key: consumer_key.ok_or(ParseError::MissingParameter("oauth_consumer_key"))?,
        nonce: nonce.ok_or(ParseError::MissingParameter("oauth_nonce"))?,
        signature_method: signature_method
            .ok_or(ParseError::MissingParameter("oauth_signature_method"))?,
        timestamp: timestamp
            .ok_or(ParseError::MissingParameter("oauth_timestamp"))?
            .parse()?,
        version: version.ok_or(ParseError::MissingParameter("oauth_version"))?,
        signature: signature.ok_or(ParseError::MissingParameter("oauth_signature"))?,
    })
}
