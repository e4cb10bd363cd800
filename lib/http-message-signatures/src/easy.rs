//!
//! Signing and verification of whole requests
//!

use crate::{
    base::{self, Message},
    blocking, crypto, digest,
    key::sanitize_key,
    key_transport,
    signature,
    signature_input::SignatureInput,
    Clock, Error, Result, SigningConfig, CONTENT_DIGEST_HEADER, SIGNATURE_HEADER,
    SIGNATURE_INPUT_HEADER,
};
use http::{HeaderMap, HeaderName, HeaderValue, Request};
use std::sync::Arc;
use tracing::{debug, instrument};
use typed_builder::TypedBuilder;

/// Headers produced by a signing operation, in emission order
///
/// `content-digest` (only with a body), `signature-input`, the key transport header and
/// `signature`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignedHeaders {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl SignedHeaders {
    /// Look up a header by its name (case-insensitive)
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(header_name, _)| header_name.as_str().eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Iterate over the headers in emission order
    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.headers.iter().map(|(name, value)| (name, value))
    }

    /// Number of headers
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Whether no header was produced
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Insert the headers into a header map, replacing existing values of the same name
    pub fn apply(self, headers: &mut HeaderMap) {
        for (name, value) in self {
            headers.insert(name, value);
        }
    }
}

impl IntoIterator for SignedHeaders {
    type Item = (HeaderName, HeaderValue);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.into_iter()
    }
}

/// HTTP signer
#[derive(Clone, TypedBuilder)]
pub struct HttpSigner {
    /// Signing configuration
    #[builder(setter(into))]
    config: Arc<SigningConfig>,

    /// Source of the `created` and token timestamps
    #[builder(default)]
    clock: Clock,
}

impl HttpSigner {
    /// Sign a message
    ///
    /// Nothing is emitted unless every step succeeded
    #[instrument(skip_all)]
    pub async fn sign<'a>(
        &self,
        message: impl Into<Message<'a>>,
        body: &[u8],
    ) -> Result<SignedHeaders> {
        let message = message.into();
        let created = self.clock.unix_timestamp()?;
        let key_header = self.config.signature_key_header()?;
        let private_key = self.config.load_private_key()?;

        let mut generated = HeaderMap::new();
        if let Some(digest) = digest::compute(body, self.config.digest_algorithm) {
            generated.insert(
                CONTENT_DIGEST_HEADER.clone(),
                HeaderValue::try_from(digest.to_string())?,
            );
        }

        let signature_input =
            SignatureInput::new(&self.config.signature_params, &generated, created);

        let token = if let Some(ref token) = self.config.jwe {
            token.clone()
        } else {
            let config = Arc::clone(&self.config);
            blocking::crypto(move || key_transport::wrap(&config, created)).await??
        };
        generated.insert(key_header.clone(), HeaderValue::try_from(token)?);

        let base = base::build(message, &generated, &signature_input)?;
        let signature = blocking::crypto(move || signature::sign(&base, &private_key)).await??;

        let mut headers = Vec::with_capacity(4);
        if let Some(digest) = generated.remove(&CONTENT_DIGEST_HEADER) {
            headers.push((CONTENT_DIGEST_HEADER.clone(), digest));
        }
        headers.push((
            SIGNATURE_INPUT_HEADER.clone(),
            HeaderValue::try_from(signature_input.to_string())?,
        ));
        if let Some(token) = generated.remove(&key_header) {
            headers.push((key_header, token));
        }
        headers.push((SIGNATURE_HEADER.clone(), HeaderValue::try_from(signature)?));

        debug!(created, "signed message");

        Ok(SignedHeaders { headers })
    }

    /// Sign a request and insert the produced headers into it
    pub async fn sign_request<B>(&self, mut request: Request<B>) -> Result<Request<B>>
    where
        B: AsRef<[u8]>,
    {
        let signed = self.sign(&request, request.body().as_ref()).await?;
        signed.apply(request.headers_mut());

        Ok(request)
    }
}

/// HTTP verifier
#[derive(Clone, TypedBuilder)]
pub struct HttpVerifier {
    /// Verification configuration
    #[builder(setter(into))]
    config: Arc<SigningConfig>,

    /// Source of the time the key transport token is checked against
    #[builder(default)]
    clock: Clock,
}

impl HttpVerifier {
    /// Verify a message
    ///
    /// Returns `Ok(false)` only if the signature doesn't match. A malformed or untrusted message
    /// is rejected with an error.
    #[instrument(skip_all)]
    pub async fn verify<'a>(&self, message: impl Into<Message<'a>>, body: &[u8]) -> Result<bool> {
        let message = message.into();
        let now = self.clock.unix_timestamp()?;

        let Some(signature_header) = message.headers.get(&SIGNATURE_HEADER) else {
            debug!("missing 'signature' header");
            return Err(Error::MissingSignature);
        };
        let signature = signature::parse(signature_header.to_str()?)?;

        if !body.is_empty() {
            let digest_header = message
                .headers
                .get(&CONTENT_DIGEST_HEADER)
                .map(HeaderValue::to_str)
                .transpose()?
                .unwrap_or_default();

            digest::verify_with(
                digest_header,
                body,
                self.config.allowed_digest_algorithms.as_deref(),
            )
            .inspect_err(|error| debug!(?error, "content digest rejected"))?;
        }

        let key_header = self.config.signature_key_header()?;
        let Some(token) = message.headers.get(&key_header) else {
            debug!(header = %key_header, "missing key transport header");
            return Err(Error::MissingHeader(key_header.to_string()));
        };
        let token = token.to_str()?.to_owned();

        let config = Arc::clone(&self.config);
        let transported_key = blocking::crypto(move || key_transport::unwrap(&token, &config, now))
            .await?
            .inspect_err(|error| debug!(?error, "key transport token rejected"))?;

        let public_key = match (transported_key, self.config.load_public_key()?) {
            (Some(transported), Some(configured)) => {
                if sanitize_key(&transported) != sanitize_key(&configured) {
                    debug!("transported public key differs from the configured one");
                    return Err(Error::KeyMismatch);
                }

                transported
            }
            (Some(key), None) | (None, Some(key)) => key,
            (None, None) => return Err(Error::MissingPublicKey),
        };
        let public_key = crypto::parse::public_key(&public_key)?;

        let (_signature_input, base) = base::recompute(message)?;
        let is_valid =
            blocking::crypto(move || signature::verify(&base, &public_key, &signature)).await?;

        if !is_valid {
            debug!("signature doesn't match");
        }

        Ok(is_valid)
    }

    /// Verify a request
    pub async fn verify_request<B>(&self, request: &Request<B>) -> Result<bool>
    where
        B: AsRef<[u8]>,
    {
        self.verify(request, request.body().as_ref()).await
    }
}
