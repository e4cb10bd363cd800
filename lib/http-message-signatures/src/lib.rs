//!
//! HTTP message signatures with encrypted key transport
//!
//! Signs a configurable selection of request components, proves body integrity through the
//! `content-digest` header and ships the verifying public key inside an encrypted, time-bounded
//! token. The receiving side needs nothing but the shared master key to verify a request.
//!
//! Only asymmetric signing schemes are supported (Ed25519 and RSA)
//!

#![deny(missing_docs)]

use http::HeaderName;

pub use self::{
    clock::Clock,
    config::SigningConfig,
    easy::{HttpSigner, HttpVerifier, SignedHeaders},
    error::{Error, Result},
};
pub use ring;

mod blocking;
mod clock;
mod easy;
mod error;

pub mod base;
pub mod component;
pub mod config;
pub mod crypto;
pub mod digest;
pub mod key;
pub mod key_transport;
pub mod signature;
pub mod signature_input;

/// Name of the header carrying the body digest
pub static CONTENT_DIGEST_HEADER: HeaderName = HeaderName::from_static("content-digest");

/// Name of the header describing the signed components
pub static SIGNATURE_INPUT_HEADER: HeaderName = HeaderName::from_static("signature-input");

/// Name of the header carrying the signature itself
pub static SIGNATURE_HEADER: HeaderName = HeaderName::from_static("signature");
