//!
//! `Signature` header generation and validation
//!

use crate::{
    crypto::{self, PrivateKey, PublicKey},
    signature_input::SIGNATURE_LABEL,
    Error, Result,
};

/// Sign the signature base and render the `Signature` header value (`sig1=:<base64>:`)
///
/// The algorithm follows from the key family
pub fn sign(base: &str, key: &PrivateKey) -> Result<String> {
    let signature = crypto::sign(base.as_bytes(), key)?;
    Ok(format!("{SIGNATURE_LABEL}=:{signature}:"))
}

/// Extract the raw signature bytes from a `Signature` header value
pub fn parse(header_value: &str) -> Result<Vec<u8>> {
    let (label, rest) = header_value
        .split_once("=:")
        .ok_or(Error::MalformedSignature)?;
    let encoded = rest.strip_suffix(':').ok_or(Error::MalformedSignature)?;

    if label.is_empty() || encoded.is_empty() {
        return Err(Error::MalformedSignature);
    }

    base64_simd::STANDARD
        .decode_to_vec(encoded)
        .map_err(|_| Error::MalformedSignature)
}

/// Verify a signature over the signature base
///
/// Returns `false` if the signature doesn't match the base or the key
#[must_use]
pub fn verify(base: &str, key: &PublicKey, signature: &[u8]) -> bool {
    crypto::verify(base.as_bytes(), signature, key)
}
