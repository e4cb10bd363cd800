//!
//! Compact JWE serialization with AES-GCM
//!
//! `<header>.<encrypted key>.<iv>.<ciphertext>.<tag>`, every segment base64url encoded without
//! padding. The encoded header is the additional authenticated data of the content encryption.
//!

use super::{
    header::{Compression, HeaderParams, ProtectedHeader},
    Error,
};
use base64_simd::URL_SAFE_NO_PAD;
use flate2::{read::DeflateDecoder, write::DeflateEncoder};
use ring::{
    aead::{self, Aad, LessSafeKey, Nonce, UnboundKey, NONCE_LEN},
    rand::{SecureRandom, SystemRandom},
};
use std::io::{Read, Write};

/// Upper bound for decompressed claims
const MAX_PLAINTEXT_SIZE: u64 = 250_000;

fn decode(segment: &str) -> Result<Vec<u8>, Error> {
    URL_SAFE_NO_PAD.decode_to_vec(segment).map_err(Error::from)
}

fn key(algorithm: &'static aead::Algorithm, raw: &[u8]) -> Result<LessSafeKey, Error> {
    if raw.len() != algorithm.key_len() {
        return Err(Error::InvalidKeyLength {
            expected: algorithm.key_len(),
            actual: raw.len(),
        });
    }

    Ok(LessSafeKey::new(UnboundKey::new(algorithm, raw)?))
}

fn seal(
    key: &LessSafeKey,
    rng: &SystemRandom,
    aad: &[u8],
    in_out: &mut Vec<u8>,
) -> Result<([u8; NONCE_LEN], aead::Tag), Error> {
    let mut nonce = [0; NONCE_LEN];
    rng.fill(&mut nonce)?;

    let tag = key.seal_in_place_separate_tag(
        Nonce::assume_unique_for_key(nonce),
        Aad::from(aad),
        in_out,
    )?;

    Ok((nonce, tag))
}

fn open(
    key: &LessSafeKey,
    nonce: &[u8],
    aad: &[u8],
    ciphertext: Vec<u8>,
    tag: &[u8],
) -> Result<Vec<u8>, Error> {
    let nonce = Nonce::try_assume_unique_for_key(nonce)?;

    let mut in_out = ciphertext;
    in_out.extend_from_slice(tag);
    let plaintext_len = key.open_in_place(nonce, Aad::from(aad), &mut in_out)?.len();
    in_out.truncate(plaintext_len);

    Ok(in_out)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut encoder = DeflateEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut decompressed = Vec::new();
    DeflateDecoder::new(data)
        .take(MAX_PLAINTEXT_SIZE + 1)
        .read_to_end(&mut decompressed)?;

    if decompressed.len() as u64 > MAX_PLAINTEXT_SIZE {
        return Err(Error::PayloadTooLarge);
    }

    Ok(decompressed)
}

/// Encrypt the plaintext under the master key
pub fn encrypt(params: &HeaderParams, master_key: &[u8], plaintext: &[u8]) -> Result<String, Error> {
    let rng = SystemRandom::new();
    let content_algorithm = params.enc.algorithm();
    let mut header = ProtectedHeader::from(params);

    let (content_key, encrypted_key) = if let Some(wrapping) = params.alg.wrapping() {
        let wrapping_key = key(wrapping, master_key)?;

        let mut content_key = vec![0; content_algorithm.key_len()];
        rng.fill(&mut content_key)?;

        let mut encrypted_key = content_key.clone();
        let (iv, tag) = seal(&wrapping_key, &rng, &[], &mut encrypted_key)?;
        header.iv = Some(URL_SAFE_NO_PAD.encode_to_string(iv));
        header.tag = Some(URL_SAFE_NO_PAD.encode_to_string(tag));

        (content_key, encrypted_key)
    } else {
        (master_key.to_vec(), Vec::new())
    };
    let content_key = key(content_algorithm, &content_key)?;

    let mut in_out = match params.zip {
        Some(Compression::Deflate) => deflate(plaintext)?,
        None => plaintext.to_vec(),
    };

    let encoded_header = URL_SAFE_NO_PAD.encode_to_string(serde_json::to_vec(&header)?);
    let (iv, tag) = seal(&content_key, &rng, encoded_header.as_bytes(), &mut in_out)?;

    Ok([
        encoded_header,
        URL_SAFE_NO_PAD.encode_to_string(encrypted_key),
        URL_SAFE_NO_PAD.encode_to_string(iv),
        URL_SAFE_NO_PAD.encode_to_string(in_out),
        URL_SAFE_NO_PAD.encode_to_string(tag),
    ]
    .join("."))
}

/// Read the protected header of a token without decrypting it
pub fn protected_header(token: &str) -> Result<ProtectedHeader, Error> {
    let (encoded_header, _rest) = token.split_once('.').ok_or(Error::MalformedToken)?;
    Ok(serde_json::from_slice(&decode(encoded_header)?)?)
}

/// Decrypt and authenticate a token with the master key
pub fn decrypt(token: &str, master_key: &[u8]) -> Result<(ProtectedHeader, Vec<u8>), Error> {
    let mut segments = token.split('.');
    let (Some(encoded_header), Some(encrypted_key), Some(iv), Some(ciphertext), Some(tag), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(Error::MalformedToken);
    };

    let header: ProtectedHeader = serde_json::from_slice(&decode(encoded_header)?)?;
    if header.crit.is_some() {
        return Err(Error::MalformedToken);
    }
    let encrypted_key = decode(encrypted_key)?;

    let content_key = match header.alg.wrapping() {
        Some(wrapping) => {
            let (Some(wrap_iv), Some(wrap_tag)) = (&header.iv, &header.tag) else {
                return Err(Error::MalformedToken);
            };

            let wrapping_key = key(wrapping, master_key)?;
            open(
                &wrapping_key,
                &decode(wrap_iv)?,
                &[],
                encrypted_key,
                &decode(wrap_tag)?,
            )?
        }
        None if encrypted_key.is_empty() => master_key.to_vec(),
        None => return Err(Error::MalformedToken),
    };
    let content_key = key(header.enc.algorithm(), &content_key)?;

    let plaintext = open(
        &content_key,
        &decode(iv)?,
        encoded_header.as_bytes(),
        decode(ciphertext)?,
        &decode(tag)?,
    )?;

    let plaintext = match header.zip {
        Some(Compression::Deflate) => inflate(&plaintext)?,
        None => plaintext,
    };

    Ok((header, plaintext))
}

#[cfg(test)]
mod test {
    use super::{decrypt, encrypt, inflate, protected_header, MAX_PLAINTEXT_SIZE};
    use crate::key_transport::{
        header::{ContentEncryption, HeaderParams, KeyManagementAlgorithm},
        Error,
    };
    use base64_simd::URL_SAFE_NO_PAD;

    const KEY_128: [u8; 16] = [7; 16];
    const KEY_256: [u8; 32] = [42; 32];

    #[test]
    fn every_algorithm_combination() {
        for alg in [
            KeyManagementAlgorithm::A128GcmKw,
            KeyManagementAlgorithm::A256GcmKw,
            KeyManagementAlgorithm::Direct,
        ] {
            for enc in [ContentEncryption::A128Gcm, ContentEncryption::A256Gcm] {
                for zip in [None, Some(super::Compression::Deflate)] {
                    let params = HeaderParams {
                        alg,
                        enc,
                        zip,
                        cty: None,
                    };
                    let master_key: &[u8] = match (alg, enc) {
                        (KeyManagementAlgorithm::A128GcmKw, _)
                        | (KeyManagementAlgorithm::Direct, ContentEncryption::A128Gcm) => &KEY_128,
                        _ => &KEY_256,
                    };

                    let token = encrypt(&params, master_key, b"hello world").unwrap();
                    assert_eq!(token.split('.').count(), 5);

                    let (header, plaintext) = decrypt(&token, master_key).unwrap();
                    assert_eq!(plaintext, b"hello world");
                    assert_eq!(header.alg, alg);
                    assert_eq!(header.enc, enc);
                    assert_eq!(header.zip, zip);
                    assert_eq!(header.iv.is_some(), alg != KeyManagementAlgorithm::Direct);
                }
            }
        }
    }

    #[test]
    fn direct_has_empty_encrypted_key() {
        let params = HeaderParams {
            alg: KeyManagementAlgorithm::Direct,
            ..HeaderParams::default()
        };
        let token = encrypt(&params, &KEY_256, b"data").unwrap();

        assert_eq!(token.split('.').nth(1), Some(""));
    }

    #[test]
    fn header_is_readable() {
        let token = encrypt(&HeaderParams::default(), &KEY_256, b"data").unwrap();
        let header = protected_header(&token).unwrap();

        assert_eq!(header.alg, KeyManagementAlgorithm::A256GcmKw);
        assert!(header.iv.is_some());
        assert!(header.tag.is_some());
    }

    #[test]
    fn reject_wrong_key_length() {
        assert!(matches!(
            encrypt(&HeaderParams::default(), &KEY_128, b"data"),
            Err(Error::InvalidKeyLength {
                expected: 32,
                actual: 16
            })
        ));
    }

    #[test]
    fn reject_wrong_key() {
        let token = encrypt(&HeaderParams::default(), &KEY_256, b"data").unwrap();
        assert!(matches!(
            decrypt(&token, &[1; 32]),
            Err(Error::Cryptographic(..))
        ));
    }

    #[test]
    fn reject_malformed() {
        let token = encrypt(&HeaderParams::default(), &KEY_256, b"data").unwrap();

        assert!(matches!(
            decrypt("a.b.c", &KEY_256),
            Err(Error::MalformedToken)
        ));
        assert!(matches!(
            decrypt(&format!("{token}.extra"), &KEY_256),
            Err(Error::MalformedToken)
        ));
    }

    #[test]
    fn reject_critical_extensions() {
        let token = encrypt(&HeaderParams::default(), &KEY_256, b"data").unwrap();
        let (encoded_header, rest) = token.split_once('.').unwrap();

        let mut header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode_to_vec(encoded_header).unwrap())
                .unwrap();
        header["crit"] = serde_json::json!(["exp"]);
        let header = URL_SAFE_NO_PAD.encode_to_string(serde_json::to_vec(&header).unwrap());

        assert!(matches!(
            decrypt(&format!("{header}.{rest}"), &KEY_256),
            Err(Error::MalformedToken)
        ));
    }

    #[test]
    fn cap_decompressed_size() {
        let data = vec![0; MAX_PLAINTEXT_SIZE as usize + 1];
        let compressed = super::deflate(&data).unwrap();

        assert!(matches!(inflate(&compressed), Err(Error::PayloadTooLarge)));
    }
}
