//!
//! Key transport codec
//!
//! Wraps the signer's public key into an encrypted and time-bounded token (a compact JWE) so the
//! verifier only needs the shared master key to learn which key to verify with
//!

use crate::{
    key::{add_pem_markers, read_key, strip_pem_markers},
    SigningConfig,
};
use miette::Diagnostic;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io;
use thiserror::Error;

pub use self::header::{
    Compression, ContentEncryption, HeaderParams, KeyManagementAlgorithm, ProtectedHeader,
};

mod header;
pub mod jwe;

/// Length of a year in seconds (365.25 days)
pub const SECONDS_PER_YEAR: u64 = 31_557_600;

/// Token encoding or decoding failure
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// A segment isn't valid base64url
    #[error(transparent)]
    Base64(#[from] base64_simd::Error),

    /// Decompressing the claims failed
    #[error(transparent)]
    Compression(#[from] io::Error),

    /// Encryption or authentication failed
    #[error("Decryption failed")]
    Cryptographic(#[from] ring::error::Unspecified),

    /// The token expired
    #[error("Token expired")]
    Expired,

    /// Master key size doesn't fit the algorithm
    #[error("Invalid key length. Expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Key size the algorithm requires
        expected: usize,

        /// Size of the provided key
        actual: usize,
    },

    /// Header or claims aren't valid JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Token doesn't consist of five segments or lacks required header parameters
    #[error("Malformed token")]
    MalformedToken,

    /// The token isn't valid yet
    #[error("Token is not yet valid")]
    NotYetValid,

    /// Decompressed claims exceed the size limit
    #[error("Payload too large")]
    PayloadTooLarge,
}

/// Claims carried inside the token
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Claims {
    /// Public key without PEM markers
    pub pkey: Option<String>,

    /// Issued at (UNIX timestamp)
    pub iat: Option<u64>,

    /// Not before (UNIX timestamp)
    pub nbf: Option<u64>,

    /// Expiration (UNIX timestamp)
    pub exp: Option<u64>,

    /// Any additional claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Check `exp` and `nbf` against the current time
    pub fn validate(&self, now: u64) -> Result<(), Error> {
        if self.exp.is_some_and(|exp| exp <= now) {
            return Err(Error::Expired);
        }

        if self.nbf.is_some_and(|nbf| nbf > now) {
            return Err(Error::NotYetValid);
        }

        Ok(())
    }
}

/// Encrypt a claim set into a token
pub fn encrypt_claims(
    claims: &Map<String, Value>,
    params: &HeaderParams,
    master_key: &[u8],
) -> Result<String, Error> {
    let plaintext = serde_json::to_vec(claims)?;
    jwe::encrypt(params, master_key, &plaintext)
}

/// Decrypt a token and validate its freshness
pub fn decrypt_claims(token: &str, master_key: &[u8], now: u64) -> Result<Claims, Error> {
    let (_header, plaintext) = jwe::decrypt(token, master_key)?;
    let claims: Claims = serde_json::from_slice(&plaintext)?;
    claims.validate(now)?;

    Ok(claims)
}

/// Build the claim set for a public key issued at `now`
///
/// Configured extra claims are kept, `pkey`, `iat`, `nbf` and `exp` override them
#[must_use]
pub fn claims(config: &SigningConfig, public_key: String, now: u64) -> Map<String, Value> {
    let lifetime = config.jwt_expiration.saturating_mul(SECONDS_PER_YEAR);

    let mut claims = config.jwt_payload.clone();
    claims.insert("pkey".into(), Value::String(public_key));
    claims.insert("iat".into(), now.into());
    claims.insert("nbf".into(), now.into());
    claims.insert("exp".into(), now.saturating_add(lifetime).into());

    claims
}

/// Wrap the configured public key into a fresh token
pub fn wrap(config: &SigningConfig, now: u64) -> crate::Result<String> {
    let public_key = config
        .public_key
        .as_deref()
        .ok_or(crate::Error::MissingPublicKey)?;
    let public_key = strip_pem_markers(&read_key(public_key)?)?;
    let master_key = config.master_key_bytes()?;

    let claims = claims(config, public_key, now);
    encrypt_claims(&claims, &config.jwe_header_params, &master_key)
        .map_err(crate::Error::TokenCreation)
}

/// Unwrap a token and return the embedded public key in PEM form
///
/// Returns `None` if the token is valid but doesn't carry a public key
pub fn unwrap(token: &str, config: &SigningConfig, now: u64) -> crate::Result<Option<String>> {
    let master_key = config.master_key_bytes()?;
    let claims = decrypt_claims(token, &master_key, now).map_err(crate::Error::TokenInvalid)?;

    Ok(claims.pkey.as_deref().map(add_pem_markers))
}
