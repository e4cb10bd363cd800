//!
//! Signing and verification configuration
//!

use crate::{
    crypto::{self, PrivateKey},
    digest,
    key::read_key,
    key_transport::HeaderParams,
    Error, Result,
};
use http::HeaderName;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use typed_builder::TypedBuilder;

fn default_jwt_expiration() -> u64 {
    1
}

fn default_signature_key_header() -> String {
    "x-signature-key".into()
}

fn default_signature_params() -> Vec<String> {
    ["content-digest", "x-signature-key", "@method", "@path", "@authority"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Configuration of one signing or verification context
///
/// Key material (`private-key`, `public-key`, `master-key`) is given either inline or as a path
/// to a file containing it
#[derive(Clone, Deserialize, Serialize, TypedBuilder)]
#[serde(rename_all = "kebab-case")]
pub struct SigningConfig {
    /// Algorithm of the content digest
    #[builder(default)]
    #[serde(default)]
    pub digest_algorithm: digest::Algorithm,

    /// PKCS#8 PEM private key (signing side)
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub private_key: Option<String>,

    /// SPKI PEM public key
    ///
    /// The signer embeds it into the key transport token. A verifier with a public key only
    /// accepts tokens carrying that exact key.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub public_key: Option<String>,

    /// Base64 encoded symmetric key of the key transport token
    #[builder(setter(into))]
    pub master_key: String,

    /// Pre-built key transport token, skips wrapping on the signing side
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub jwe: Option<String>,

    /// Protected header parameters of the key transport token
    #[builder(default)]
    #[serde(default)]
    pub jwe_header_params: HeaderParams,

    /// Additional claims of the key transport token
    #[builder(default)]
    #[serde(default)]
    pub jwt_payload: Map<String, Value>,

    /// Lifetime of the key transport token in years
    #[builder(default = default_jwt_expiration())]
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: u64,

    /// Ordered names of the signed components
    #[builder(default = default_signature_params())]
    #[serde(default = "default_signature_params")]
    pub signature_params: Vec<String>,

    /// Name of the header carrying the key transport token
    #[builder(default = default_signature_key_header(), setter(into))]
    #[serde(default = "default_signature_key_header")]
    pub signature_key_header: String,

    /// Digest algorithms the verifier accepts
    ///
    /// If unset, any supported algorithm the sender labels its digest with is accepted
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub allowed_digest_algorithms: Option<Vec<digest::Algorithm>>,
}

impl SigningConfig {
    /// Decode the master key
    pub fn master_key_bytes(&self) -> Result<Vec<u8>> {
        let encoded = read_key(&self.master_key)?;
        base64_simd::STANDARD
            .decode_to_vec(encoded.trim())
            .map_err(Error::InvalidMasterKey)
    }

    /// Load and parse the private key
    pub fn load_private_key(&self) -> Result<PrivateKey> {
        let identifier = self
            .private_key
            .as_deref()
            .ok_or(Error::MissingPrivateKey)?;
        let pem = read_key(identifier)?;

        Ok(crypto::parse::private_key(&pem)?)
    }

    /// Load the statically configured public key, if any
    pub fn load_public_key(&self) -> Result<Option<String>> {
        self.public_key
            .as_deref()
            .map(read_key)
            .transpose()
            .map_err(Error::from)
    }

    /// Name of the header carrying the key transport token
    pub fn signature_key_header(&self) -> Result<HeaderName> {
        Ok(HeaderName::try_from(self.signature_key_header.as_str())?)
    }
}
