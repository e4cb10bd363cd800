use http_message_signatures::{
    key::strip_pem_markers,
    key_transport::{
        self, ContentEncryption, HeaderParams, KeyManagementAlgorithm, SECONDS_PER_YEAR,
    },
    Error, SigningConfig,
};


fn master_key() -> Vec<u8> {
    data::ed25519_config().master_key_bytes().unwrap()
}

/// Replace the first character of a token segment with a different one
fn tamper(token: &str, segment: usize) -> String {
    let mut segments: Vec<String> = token.split('.').map(String::from).collect();
    let target = &mut segments[segment];
    let replacement = if target.starts_with('A') { "B" } else { "A" };
    target.replace_range(..1, replacement);

    segments.join(".")
}

#[test]
fn round_trip() {
    for config in [data::ed25519_config(), data::rsa_config()] {
        let token = key_transport::wrap(&config, data::CREATED).unwrap();
        assert_eq!(token.split('.').count(), 5);

        let public_key = key_transport::unwrap(&token, &config, data::CREATED)
            .unwrap()
            .unwrap();
        assert_eq!(public_key, config.public_key.as_deref().unwrap().trim());
    }
}

#[test]
fn claims_carry_key_and_freshness() {
    let mut config = data::ed25519_config();
    config.jwt_expiration = 2;
    config
        .jwt_payload
        .insert("sub".into(), serde_json::Value::String("client".into()));

    let token = key_transport::wrap(&config, data::CREATED).unwrap();
    let claims = key_transport::decrypt_claims(&token, &master_key(), data::CREATED).unwrap();

    assert_eq!(
        claims.pkey.as_deref(),
        Some(strip_pem_markers(data::ED25519_PUBLIC_KEY).unwrap().as_str())
    );
    assert_eq!(claims.iat, Some(data::CREATED));
    assert_eq!(claims.nbf, Some(data::CREATED));
    assert_eq!(claims.exp, Some(data::CREATED + 2 * SECONDS_PER_YEAR));
    assert_eq!(claims.extra["sub"], "client");
}

#[test]
fn protected_header() {
    let token = key_transport::wrap(&data::ed25519_config(), data::CREATED).unwrap();
    let header = key_transport::jwe::protected_header(&token).unwrap();

    assert_eq!(header.alg, KeyManagementAlgorithm::A256GcmKw);
    assert_eq!(header.enc, ContentEncryption::A256Gcm);
    assert_eq!(header.zip, Some(key_transport::Compression::Deflate));
    assert!(header.iv.is_some() && header.tag.is_some());
}

#[test]
fn known_answer() {
    let config = data::ed25519_config();
    let public_key = key_transport::unwrap(data::KNOWN_ANSWER_TOKEN, &config, data::CREATED)
        .unwrap()
        .unwrap();
    assert_eq!(public_key, data::ED25519_PUBLIC_KEY.trim());

    let claims =
        key_transport::decrypt_claims(data::KNOWN_ANSWER_TOKEN, &master_key(), data::CREATED)
            .unwrap();
    assert_eq!(claims.extra["sub"], "known-answer");
    assert_eq!(claims.exp, Some(data::CREATED + SECONDS_PER_YEAR));
}

#[test]
fn tampering_is_rejected() {
    let config = data::ed25519_config();
    let token = key_transport::wrap(&config, data::CREATED).unwrap();

    for segment in 0..5 {
        let tampered = tamper(&token, segment);
        assert!(
            matches!(
                key_transport::unwrap(&tampered, &config, data::CREATED),
                Err(Error::TokenInvalid(..))
            ),
            "tampering with segment {segment} went unnoticed"
        );
    }
}

#[test]
fn wrong_master_key() {
    let token = key_transport::wrap(&data::ed25519_config(), data::CREATED).unwrap();

    let mut config = data::ed25519_config();
    config.master_key = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=".into();

    assert!(matches!(
        key_transport::unwrap(&token, &config, data::CREATED),
        Err(Error::TokenInvalid(key_transport::Error::Cryptographic(..)))
    ));
}

#[test]
fn freshness() {
    let config = data::ed25519_config();
    let token = key_transport::wrap(&config, data::CREATED).unwrap();

    assert!(key_transport::unwrap(&token, &config, data::CREATED + SECONDS_PER_YEAR - 1).is_ok());
    assert!(matches!(
        key_transport::unwrap(&token, &config, data::CREATED + SECONDS_PER_YEAR),
        Err(Error::TokenInvalid(key_transport::Error::Expired))
    ));
    assert!(matches!(
        key_transport::unwrap(&token, &config, data::CREATED - 1),
        Err(Error::TokenInvalid(key_transport::Error::NotYetValid))
    ));
}

#[test]
fn token_without_key() {
    let config = data::ed25519_config();
    let token = key_transport::encrypt_claims(
        &serde_json::Map::new(),
        &HeaderParams::default(),
        &master_key(),
    )
    .unwrap();

    assert_eq!(
        key_transport::unwrap(&token, &config, data::CREATED).unwrap(),
        None
    );
}

#[test]
fn direct_encryption() {
    let mut config = data::ed25519_config();
    config.jwe_header_params = HeaderParams {
        alg: KeyManagementAlgorithm::Direct,
        enc: ContentEncryption::A256Gcm,
        zip: None,
        cty: Some("JWT".into()),
    };

    let token = key_transport::wrap(&config, data::CREATED).unwrap();
    assert!(token.split('.').nth(1).unwrap().is_empty());
    assert!(key_transport::unwrap(&token, &config, data::CREATED)
        .unwrap()
        .is_some());
}

#[test]
fn creation_failures() {
    let mut config = data::ed25519_config();
    config.jwe_header_params.alg = KeyManagementAlgorithm::A128GcmKw;
    assert!(matches!(
        key_transport::wrap(&config, data::CREATED),
        Err(Error::TokenCreation(key_transport::Error::InvalidKeyLength {
            expected: 16,
            actual: 32
        }))
    ));

    let config = SigningConfig::builder()
        .public_key("not a public key!")
        .master_key(data::MASTER_KEY)
        .build();
    assert!(matches!(
        key_transport::wrap(&config, data::CREATED),
        Err(Error::InvalidPublicKeyFormat)
    ));

    let config = SigningConfig::builder().master_key(data::MASTER_KEY).build();
    assert!(matches!(
        key_transport::wrap(&config, data::CREATED),
        Err(Error::MissingPublicKey)
    ));
}
