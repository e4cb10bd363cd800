use http::header::{InvalidHeaderName, InvalidHeaderValue, ToStrError};
use miette::Diagnostic;
use std::{io, time::SystemTimeError};
use thiserror::Error;
use tokio::sync::oneshot;

/// Result alias defaulting to the crate's [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Signing or verification failure
///
/// Every variant is terminal for the operation that produced it.
/// A signature that merely fails the cryptographic check is *not* an error; verification returns
/// `Ok(false)` for that case.
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Communication with the blocking pool failed
    #[error(transparent)]
    Blocking(#[from] oneshot::error::RecvError),

    /// Content digest didn't match the payload
    #[error("Content-Digest value is invalid. Expected body digest is: {expected}")]
    DigestMismatch {
        /// Digest the payload actually hashes to
        expected: String,
    },

    /// The digest algorithm is known but not accepted by this verifier
    #[error("Digest algorithm {0} is not allowed")]
    DisallowedAlgorithm(&'static str),

    /// Header value isn't valid UTF-8
    #[error(transparent)]
    HttpHeaderToStr(#[from] ToStrError),

    /// Digest algorithm identifier isn't one of `sha256`, `sha512` or `md5`
    #[error("Invalid digest algorithm {0}")]
    InvalidAlgorithm(String),

    /// Configured header name isn't a valid HTTP header name
    #[error(transparent)]
    InvalidHeaderName(#[from] InvalidHeaderName),

    /// Produced value can't be used as an HTTP header value
    #[error(transparent)]
    InvalidHeaderValue(#[from] InvalidHeaderValue),

    /// Key material failed to parse
    #[error(transparent)]
    InvalidKey(#[from] crate::crypto::parse::Error),

    /// Master key isn't valid base64
    #[error("Invalid master key")]
    InvalidMasterKey(#[source] base64_simd::Error),

    /// Public key couldn't be stripped of its PEM markers
    #[error("Invalid public key format")]
    InvalidPublicKeyFormat,

    /// Public key embedded in the token differs from the configured one
    #[error("Public key mismatch")]
    KeyMismatch,

    /// Content digest header doesn't follow `<label>=:<base64>:`
    #[error("Content-Digest header invalid")]
    MalformedDigest,

    /// Signature header doesn't follow `<label>=:<base64>:`
    #[error("Signature header invalid")]
    MalformedSignature,

    /// Signature-Input header couldn't be parsed
    #[error("Signature-Input header invalid")]
    MalformedSignatureInput,

    /// A signed component has no value in the message
    #[error("Missing component {0}")]
    MissingComponent(String),

    /// Content digest header is missing or empty although a body is present
    #[error("Content-Digest header missing")]
    MissingDigest,

    /// A required header is absent
    #[error("{0} header missing")]
    MissingHeader(String),

    /// Signing was requested without a private key
    #[error("Missing private key")]
    MissingPrivateKey,

    /// Neither the token nor the configuration provide a public key
    #[error("Missing public key")]
    MissingPublicKey,

    /// Signature header is missing
    #[error("Signature header is missing")]
    MissingSignature,

    /// Reading key material failed
    #[error(transparent)]
    ReadKey(#[from] io::Error),

    /// The signing primitive failed
    #[error("Failed to sign message")]
    Signing(#[from] ring::error::Unspecified),

    /// System clock is set before the UNIX epoch
    #[error(transparent)]
    SystemTime(#[from] SystemTimeError),

    /// Key transport token couldn't be created
    #[error("Failed to create the key transport token")]
    TokenCreation(#[source] crate::key_transport::Error),

    /// Key transport token was tampered with, is expired or was encrypted with a different key
    #[error("Invalid key transport token")]
    TokenInvalid(#[source] crate::key_transport::Error),

    /// Digest label isn't one of `sha-256`, `sha-512` or `md5`
    #[error("Unknown digest algorithm {0}")]
    UnknownAlgorithm(String),

    /// Derived component (`@...`) isn't supported
    #[error("Unknown component {0}")]
    UnknownComponent(String),
}
