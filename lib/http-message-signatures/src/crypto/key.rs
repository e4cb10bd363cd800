use ring::signature::{
    Ed25519KeyPair, RsaKeyPair, UnparsedPublicKey, ED25519, RSA_PKCS1_2048_8192_SHA256,
};

/// Enum dispatch over the supported private key families
///
/// The family decides the signature algorithm:
///
/// - Ed25519 signs with EdDSA
/// - RSA signs with PKCS#1 v1.5 padding over SHA-256
#[non_exhaustive]
pub enum PrivateKey {
    /// Ed25519
    Ed25519(Ed25519KeyPair),

    /// RSA
    Rsa(RsaKeyPair),
}

/// Enum dispatch over the supported public key families
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PublicKey {
    /// Raw Ed25519 public key
    Ed25519(Vec<u8>),

    /// DER encoded `RSAPublicKey`
    Rsa(Vec<u8>),
}

impl PublicKey {
    pub(super) fn unparsed(&self) -> UnparsedPublicKey<&[u8]> {
        match self {
            Self::Ed25519(bytes) => UnparsedPublicKey::new(&ED25519, bytes.as_slice()),
            Self::Rsa(bytes) => {
                UnparsedPublicKey::new(&RSA_PKCS1_2048_8192_SHA256, bytes.as_slice())
            }
        }
    }
}
