//! Property tests: any modification of a signed token is rejected

mod common;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use common::*;
use proptest::prelude::*;
use readertoken_jwt::keys::parse_key_material;
use readertoken_jwt::{claims, CompactToken, Es256Signer, Es256Verifier, JwtError};

const ISSUED_AT: i64 = 1_700_000_000;

fn signed_token() -> CompactToken {
    let signer = Es256Signer::new(parse_key_material(PRIVATE_KEY_PEM.as_bytes()).unwrap()).unwrap();
    let (header, claims) = claims::assemble_at(&demo_config(), ISSUED_AT).unwrap();
    signer.sign(&header, &claims).unwrap()
}

fn verifier() -> Es256Verifier {
    Es256Verifier::new(parse_key_material(PUBLIC_KEY_PEM.as_bytes()).unwrap()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn flipped_signature_bit_is_rejected(index in 0usize..64, bit in 0u8..8) {
        let token = signed_token();
        let segments = token.segments().unwrap();

        let mut signature = URL_SAFE_NO_PAD.decode(segments.signature).unwrap();
        signature[index] ^= 1 << bit;
        let forged = format!("{}.{}", segments.signing_input, URL_SAFE_NO_PAD.encode(&signature));

        prop_assert_eq!(verifier().verify_at(&forged, ISSUED_AT), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn flipped_payload_bit_is_rejected(index in any::<prop::sample::Index>(), bit in 0u8..8) {
        let token = signed_token();
        let segments = token.segments().unwrap();

        let mut payload = URL_SAFE_NO_PAD.decode(segments.payload).unwrap();
        let index = index.index(payload.len());
        payload[index] ^= 1 << bit;
        let forged = format!(
            "{}.{}.{}",
            segments.header,
            URL_SAFE_NO_PAD.encode(&payload),
            segments.signature
        );

        prop_assert_eq!(verifier().verify_at(&forged, ISSUED_AT), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn altered_encoded_character_is_rejected(
        index in any::<prop::sample::Index>(),
        replacement in "[A-Za-z0-9_-]",
    ) {
        let token = signed_token();
        let signing_input_len = token.segments().unwrap().signing_input.len();
        let original = token.as_str();

        let index = index.index(signing_input_len);
        prop_assume!(original.as_bytes()[index] != b'.');
        prop_assume!(original[index..=index] != replacement);

        let mut forged = String::with_capacity(original.len());
        forged.push_str(&original[..index]);
        forged.push_str(&replacement);
        forged.push_str(&original[index + 1..]);

        prop_assert!(verifier().verify_at(&forged, ISSUED_AT).is_err());
    }

    #[test]
    fn truncated_token_is_rejected(cut in 1usize..64) {
        let token = signed_token();
        let original = token.as_str();
        let forged = &original[..original.len() - cut];

        prop_assert!(verifier().verify_at(forged, ISSUED_AT).is_err());
    }
}
