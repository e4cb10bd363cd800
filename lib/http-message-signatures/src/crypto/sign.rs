use super::PrivateKey;
use ring::{
    error::Unspecified,
    rand::SystemRandom,
    signature::{Ed25519KeyPair, RsaKeyPair, RSA_PKCS1_SHA256},
};

/// Signing key definition
pub trait SigningKey {
    /// Sign a message and return the signature in its byte representation
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, Unspecified>;
}

impl SigningKey for Ed25519KeyPair {
    #[inline]
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, Unspecified> {
        Ok(self.sign(msg).as_ref().to_vec())
    }
}

impl SigningKey for RsaKeyPair {
    #[inline]
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, Unspecified> {
        let mut buf = vec![0; self.public().modulus_len()];

        let rng = SystemRandom::new();
        self.sign(&RSA_PKCS1_SHA256, &rng, msg, &mut buf)?;

        Ok(buf)
    }
}

impl SigningKey for PrivateKey {
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, Unspecified> {
        match self {
            Self::Ed25519(key) => SigningKey::sign(key, msg),
            Self::Rsa(key) => SigningKey::sign(key, msg),
        }
    }
}

/// Sign a message with the provided signing key and encode the returned signature in Base64
#[inline]
pub fn sign<SK>(payload: &[u8], key: &SK) -> Result<String, Unspecified>
where
    SK: SigningKey + ?Sized,
{
    key.sign(payload)
        .map(|signature| base64_simd::STANDARD.encode_to_string(signature))
}
