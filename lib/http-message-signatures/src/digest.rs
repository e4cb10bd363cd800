//!
//! `Content-Digest` header generation and validation
//!

use crate::{Error, Result};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use std::{fmt, str::FromStr};
use subtle::ConstantTimeEq;

/// Hash algorithm used for the content digest
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// SHA-256 (`sha256` / `sha-256`)
    #[default]
    Sha256,

    /// SHA-512 (`sha512` / `sha-512`)
    Sha512,

    /// MD5 (`md5` / `md5`)
    Md5,
}

impl Algorithm {
    /// Identifier used in configurations
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Md5 => "md5",
        }
    }

    /// Dashed label used inside the header value
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sha256 => "sha-256",
            Self::Sha512 => "sha-512",
            Self::Md5 => "md5",
        }
    }

    /// Map a dashed header label back to its algorithm
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "sha-256" => Some(Self::Sha256),
            "sha-512" => Some(Self::Sha512),
            "md5" => Some(Self::Md5),
            _ => None,
        }
    }

    /// Hash the data
    #[must_use]
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
            Self::Md5 => Md5::digest(data).to_vec(),
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "md5" => Ok(Self::Md5),
            other => Err(Error::InvalidAlgorithm(other.to_owned())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a `Content-Digest` header (`<label>=:<base64>:`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentDigest {
    algorithm: Algorithm,
    encoded_hash: String,
}

impl ContentDigest {
    fn new(payload: &[u8], algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            encoded_hash: base64_simd::STANDARD.encode_to_string(algorithm.digest(payload)),
        }
    }

    /// Algorithm the digest was computed with
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Base64 encoded hash
    #[must_use]
    pub fn encoded_hash(&self) -> &str {
        &self.encoded_hash
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=:{}:", self.algorithm.label(), self.encoded_hash)
    }
}

/// Compute the content digest of a payload
///
/// Returns `None` for an empty payload. There is nothing to protect and no header must be emitted.
#[must_use]
pub fn compute(payload: &[u8], algorithm: Algorithm) -> Option<ContentDigest> {
    (!payload.is_empty()).then(|| ContentDigest::new(payload, algorithm))
}

/// Split `<label>=:<base64>:` into its label and encoded hash
fn split(header_value: &str) -> Option<(&str, &str)> {
    let (label, rest) = header_value.split_once("=:")?;
    let encoded_hash = rest.strip_suffix(':')?;

    (!label.is_empty() && !encoded_hash.is_empty()).then_some((label, encoded_hash))
}

/// Validate a `Content-Digest` header value against the payload
///
/// The algorithm is taken from the label of the header value. Use [`verify_with`] to restrict the
/// set of algorithms a sender may choose.
pub fn verify(header_value: &str, payload: &[u8]) -> Result<()> {
    verify_with(header_value, payload, None)
}

/// Validate a `Content-Digest` header value against the payload, optionally pinning the allowed
/// algorithms
pub fn verify_with(
    header_value: &str,
    payload: &[u8],
    allowed: Option<&[Algorithm]>,
) -> Result<()> {
    if header_value.is_empty() {
        return Err(Error::MissingDigest);
    }

    let (label, _encoded_hash) = split(header_value).ok_or(Error::MalformedDigest)?;
    let algorithm =
        Algorithm::from_label(label).ok_or_else(|| Error::UnknownAlgorithm(label.to_owned()))?;

    if let Some(allowed) = allowed {
        if !allowed.contains(&algorithm) {
            return Err(Error::DisallowedAlgorithm(algorithm.label()));
        }
    }

    let expected = ContentDigest::new(payload, algorithm).to_string();
    if bool::from(expected.as_bytes().ct_eq(header_value.as_bytes())) {
        Ok(())
    } else {
        Err(Error::DigestMismatch { expected })
    }
}
