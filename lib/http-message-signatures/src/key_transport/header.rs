use ring::aead;
use serde::{Deserialize, Serialize};

/// Key management algorithm (`alg`)
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub enum KeyManagementAlgorithm {
    /// Wrap the content encryption key with AES-128-GCM
    #[serde(rename = "A128GCMKW")]
    A128GcmKw,

    /// Wrap the content encryption key with AES-256-GCM
    #[default]
    #[serde(rename = "A256GCMKW")]
    A256GcmKw,

    /// Use the master key as the content encryption key
    #[serde(rename = "dir")]
    Direct,
}

impl KeyManagementAlgorithm {
    /// AES-GCM parameters of the key wrapping step, `None` for direct encryption
    pub(super) fn wrapping(self) -> Option<&'static aead::Algorithm> {
        match self {
            Self::A128GcmKw => Some(&aead::AES_128_GCM),
            Self::A256GcmKw => Some(&aead::AES_256_GCM),
            Self::Direct => None,
        }
    }
}

/// Content encryption algorithm (`enc`)
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub enum ContentEncryption {
    /// AES-128-GCM
    #[serde(rename = "A128GCM")]
    A128Gcm,

    /// AES-256-GCM
    #[default]
    #[serde(rename = "A256GCM")]
    A256Gcm,
}

impl ContentEncryption {
    pub(super) fn algorithm(self) -> &'static aead::Algorithm {
        match self {
            Self::A128Gcm => &aead::AES_128_GCM,
            Self::A256Gcm => &aead::AES_256_GCM,
        }
    }
}

/// Compression applied to the claims before encryption (`zip`)
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub enum Compression {
    /// Raw DEFLATE
    #[serde(rename = "DEF")]
    Deflate,
}

/// Protected header parameters chosen by the signer
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HeaderParams {
    /// Key management algorithm
    pub alg: KeyManagementAlgorithm,

    /// Content encryption algorithm
    pub enc: ContentEncryption,

    /// Optional compression of the claims
    pub zip: Option<Compression>,

    /// Optional content type
    pub cty: Option<String>,
}

impl Default for HeaderParams {
    fn default() -> Self {
        Self {
            alg: KeyManagementAlgorithm::default(),
            enc: ContentEncryption::default(),
            zip: Some(Compression::Deflate),
            cty: None,
        }
    }
}

/// Protected header as serialized into the first token segment
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct ProtectedHeader {
    /// Key management algorithm
    pub alg: KeyManagementAlgorithm,

    /// Content encryption algorithm
    pub enc: ContentEncryption,

    /// Compression of the claims
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<Compression>,

    /// Content type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cty: Option<String>,

    /// Key wrapping nonce (base64url), present for the GCM key wrapping algorithms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,

    /// Key wrapping authentication tag (base64url), present for the GCM key wrapping algorithms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Critical extensions
    ///
    /// None are supported, a token listing any is rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crit: Option<Vec<String>>,
}

impl From<&HeaderParams> for ProtectedHeader {
    fn from(params: &HeaderParams) -> Self {
        Self {
            alg: params.alg,
            enc: params.enc,
            zip: params.zip,
            cty: params.cty.clone(),
            iv: None,
            tag: None,
            crit: None,
        }
    }
}
