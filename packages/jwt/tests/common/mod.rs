//! Shared helpers for the integration tests

#![allow(dead_code)]

use p256::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rand::Rng;
use readertoken_jwt::TokenConfig;

pub const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/ec-private-key.pem");
pub const PKCS8_PRIVATE_KEY_PEM: &str = include_str!("../fixtures/pkcs8-private-key.pem");
pub const PUBLIC_KEY_PEM: &str = include_str!("../fixtures/public-key.pem");
pub const PARAMS_PRIVATE_KEY_PEM: &str = include_str!("../fixtures/ec-params-private-key.pem");
pub const OTHER_PUBLIC_KEY_PEM: &str = include_str!("../fixtures/other-public-key.pem");
pub const P384_PRIVATE_KEY_PEM: &str = include_str!("../fixtures/p384-private-key.pem");
pub const P384_PKCS8_PRIVATE_KEY_PEM: &str = include_str!("../fixtures/p384-pkcs8-private-key.pem");
pub const P384_PUBLIC_KEY_PEM: &str = include_str!("../fixtures/p384-public-key.pem");
pub const RSA_PRIVATE_KEY_PEM: &str = include_str!("../fixtures/rsa-private-key.pem");
pub const RSA_PUBLIC_KEY_PEM: &str = include_str!("../fixtures/rsa-public-key.pem");

/// Token signed by an independent ES256 implementation with `ec-private-key.pem`
/// (iat 1700000000, exp 1700000300)
pub const INTEROP_TOKEN: &str = include_str!("../fixtures/interop-token.txt");
/// DER form of the signature carried by `INTEROP_TOKEN`
pub const INTEROP_SIGNATURE_DER: &[u8] = include_bytes!("../fixtures/interop-signature.der");

pub const INTEROP_ISSUED_AT: i64 = 1_700_000_000;

/// Generated key pair in PEM form
pub struct PemKeyPair {
    pub sec1_private: String,
    pub pkcs8_private: String,
    pub public: String,
}

/// Fresh random P-256 key pair, PEM encoded
pub fn generate_key_pair() -> PemKeyPair {
    let mut rng = rand::rng();
    let secret_key = loop {
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        // Reject the rare out-of-range scalar and draw again
        if let Ok(key) = p256::SecretKey::from_slice(&bytes) {
            break key;
        }
    };

    PemKeyPair {
        sec1_private: secret_key
            .to_sec1_pem(LineEnding::LF)
            .expect("SEC1 PEM encoding")
            .to_string(),
        pkcs8_private: secret_key
            .to_pkcs8_pem(LineEnding::LF)
            .expect("PKCS#8 PEM encoding")
            .to_string(),
        public: secret_key
            .public_key()
            .to_public_key_pem(LineEnding::LF)
            .expect("SPKI PEM encoding"),
    }
}

/// The identifiers of the demonstration flow
pub fn demo_config() -> TokenConfig {
    TokenConfig::builder()
        .key_id("ABCDEFGHIJ")
        .issuer("KLMNOPQRST")
        .subject("UVWXYZ1234")
        .build()
}
