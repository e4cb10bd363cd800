//!
//! Key material helpers
//!

use crate::{Error, Result};
use std::{fs, io, path::Path};

/// First line of a PEM encoded public key
pub const PUBLIC_KEY_START: &str = "-----BEGIN PUBLIC KEY-----";

/// Last line of a PEM encoded public key
pub const PUBLIC_KEY_END: &str = "-----END PUBLIC KEY-----";

/// Load key material
///
/// If the identifier names an existing file, its contents are returned.
/// Otherwise the identifier itself is treated as the key material.
pub fn read_key(identifier: &str) -> io::Result<String> {
    let path = Path::new(identifier);
    if path.is_file() {
        fs::read_to_string(path)
    } else {
        Ok(identifier.to_owned())
    }
}

/// Canonical form of a key for comparisons (trimmed, without line breaks)
#[must_use]
pub fn sanitize_key(key: &str) -> String {
    key.trim().chars().filter(|ch| !matches!(ch, '\r' | '\n')).collect()
}

/// Remove the PEM begin/end markers from a public key
///
/// Keys without markers are accepted as-is, as long as what remains looks like base64
pub fn strip_pem_markers(key: &str) -> Result<String> {
    let key = key.trim();
    let key = key.strip_prefix(PUBLIC_KEY_START).unwrap_or(key);
    let key = key.strip_suffix(PUBLIC_KEY_END).unwrap_or(key).trim();

    let is_base64 = key.bytes().all(|byte| {
        byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'/' | b'=' | b'\r' | b'\n')
    });

    if key.is_empty() || !is_base64 {
        return Err(Error::InvalidPublicKeyFormat);
    }

    Ok(key.to_owned())
}

/// Wrap a stripped public key into its PEM begin/end markers
#[must_use]
pub fn add_pem_markers(key: &str) -> String {
    format!("{PUBLIC_KEY_START}\n{key}\n{PUBLIC_KEY_END}")
}
