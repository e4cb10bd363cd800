//!
//! `Signature-Input` header rendering and parsing
//!

use crate::{Error, Result, SigningConfig, CONTENT_DIGEST_HEADER};
use http::HeaderMap;
use logos::{Logos, SpannedIter};
use std::fmt::{self, Write};

/// Label of the single signature this crate produces
pub const SIGNATURE_LABEL: &str = "sig1";

/// Description of which components were signed and when
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureInput {
    /// Label the signature is registered under (`sig1`)
    pub label: String,

    /// Ordered component names
    pub components: Vec<String>,

    /// UNIX timestamp of the signature creation
    pub created: u64,
}

impl SignatureInput {
    /// Select the configured components that participate in a signature
    ///
    /// The order of `signature_params` is kept verbatim. `content-digest` is dropped when the
    /// header isn't part of `present_headers`, which is the case for requests without a body.
    #[must_use]
    pub fn new(signature_params: &[String], present_headers: &HeaderMap, created: u64) -> Self {
        let has_content_digest = present_headers.contains_key(&CONTENT_DIGEST_HEADER);
        let components = signature_params
            .iter()
            .filter(|param| {
                has_content_digest || !param.eq_ignore_ascii_case(CONTENT_DIGEST_HEADER.as_str())
            })
            .cloned()
            .collect();

        Self {
            label: SIGNATURE_LABEL.to_owned(),
            components,
            created,
        }
    }

    /// Inner list with its parameters (`("a" "b");created=123`)
    ///
    /// This is also the value of the `@signature-params` line of the signature base
    #[must_use]
    pub fn params(&self) -> String {
        let mut buffer = String::from("(");
        for (idx, component) in self.components.iter().enumerate() {
            if idx > 0 {
                buffer.push(' ');
            }

            let _ = write!(buffer, "\"{component}\"");
        }
        let _ = write!(buffer, ");created={}", self.created);

        buffer
    }
}

impl fmt::Display for SignatureInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.label, self.params())
    }
}

/// Render the `Signature-Input` header value for the headers generated so far
#[must_use]
pub fn render(present_headers: &HeaderMap, config: &SigningConfig, created: u64) -> String {
    SignatureInput::new(&config.signature_params, present_headers, created).to_string()
}

#[derive(Debug, Logos, PartialEq)]
#[logos(skip r"[ \t]+")]
enum TokenTy {
    #[regex(r"[A-Za-z*][A-Za-z0-9_.*-]*")]
    Key,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r#""[^"]*""#)]
    String,

    #[token("=")]
    Equals,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token(";")]
    Semicolon,
}

struct Parser<'a> {
    /// Stream of tokens with their spans
    tokens: SpannedIter<'a, TokenTy>,

    /// Reference to the original input that was fed to the lexer
    input: &'a str,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            tokens: TokenTy::lexer(input).spanned(),
            input,
        }
    }

    fn next(&mut self) -> Option<Result<(TokenTy, &'a str)>> {
        let input = self.input;
        let (ty, span) = self.tokens.next()?;
        Some(
            ty.map(|ty| (ty, &input[span]))
                .map_err(|()| Error::MalformedSignatureInput),
        )
    }

    fn expect(&mut self, expected: TokenTy) -> Result<&'a str> {
        match self.next() {
            Some(Ok((ty, slice))) if ty == expected => Ok(slice),
            _ => Err(Error::MalformedSignatureInput),
        }
    }
}

/// Parse a `Signature-Input` header value (`sig1=("a" "b");created=123`)
///
/// Only the `created` parameter is understood, any other parameter is rejected
pub fn parse(input: &str) -> Result<SignatureInput> {
    let mut parser = Parser::new(input);

    let label = parser.expect(TokenTy::Key)?;
    parser.expect(TokenTy::Equals)?;
    parser.expect(TokenTy::OpenParen)?;

    let mut components = Vec::new();
    loop {
        match parser.next() {
            Some(Ok((TokenTy::String, component))) => {
                components.push(component.trim_matches('"').to_owned());
            }
            Some(Ok((TokenTy::CloseParen, _))) => break,
            _ => return Err(Error::MalformedSignatureInput),
        }
    }

    let mut created = None;
    while let Some(token) = parser.next() {
        let (TokenTy::Semicolon, _) = token? else {
            return Err(Error::MalformedSignatureInput);
        };

        let key = parser.expect(TokenTy::Key)?;
        parser.expect(TokenTy::Equals)?;

        match key {
            "created" if created.is_none() => {
                let value = parser.expect(TokenTy::Integer)?;
                created = Some(
                    value
                        .parse()
                        .map_err(|_| Error::MalformedSignatureInput)?,
                );
            }
            _ => return Err(Error::MalformedSignatureInput),
        }
    }

    Ok(SignatureInput {
        label: label.to_owned(),
        components,
        created: created.ok_or(Error::MalformedSignatureInput)?,
    })
}
