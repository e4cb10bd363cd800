use super::PublicKey;

/// Verify that the message corresponds with the signature using the provided public key
///
/// A signature that doesn't match is reported as `false`, never as an error
#[inline]
#[must_use]
pub fn verify(msg: &[u8], signature: &[u8], key: &PublicKey) -> bool {
    key.unparsed().verify(msg, signature).is_ok()
}
