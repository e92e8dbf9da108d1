//! ES256 verification with ECDSA P-256

use crate::{
    claims,
    error::{JwtError, JwtResult},
    keys::{KeyMaterial, PublicKey},
    signature::RawSignature,
    types::{ClaimSet, JwtHeader, TokenSegments, VerifiedToken, ES256},
    validation::ValidationOptions,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use p256::ecdsa::signature::Verifier;
use readertoken_common::LoggingTransformer;

/// Verifies ES256 compact tokens against a P-256 public key
#[derive(Debug, Clone)]
pub struct Es256Verifier {
    key: PublicKey,
    options: ValidationOptions,
}

impl Es256Verifier {
    /// Take ownership of public key material, with default validation options
    ///
    /// # Errors
    /// Returns `JwtError::KeyParse` if the material is a private key
    pub fn new(material: KeyMaterial) -> JwtResult<Self> {
        Ok(Self::from_public_key(material.into_public()?))
    }

    /// Verify with an already parsed public key
    #[must_use]
    pub fn from_public_key(key: PublicKey) -> Self {
        Self {
            key,
            options: ValidationOptions::default(),
        }
    }

    /// Replace the validation options
    #[must_use]
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Validation options in effect
    #[must_use]
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Verify `token` at the current time
    ///
    /// # Errors
    /// `MalformedToken`, `UnsupportedAlgorithm`, `InvalidSignature` or
    /// `TokenExpired` describing the first failed check, or `Clock` if the
    /// clock cannot be read while expiry is enforced
    pub fn verify(&self, token: &str) -> JwtResult<VerifiedToken> {
        let now = if self.options.validate_exp {
            claims::unix_now()?
        } else {
            0
        };
        self.verify_at(token, now)
    }

    /// Verify `token` as if the current time were `now` (unix seconds)
    ///
    /// # Errors
    /// As [`Es256Verifier::verify`]
    pub fn verify_at(&self, token: &str, now: i64) -> JwtResult<VerifiedToken> {
        let result = self.verify_inner(token, now);
        match &result {
            Ok(verified) => LoggingTransformer::log_token_verified(verified.header.kid.as_deref(), true),
            Err(e) => {
                tracing::warn!(kind = e.kind(), "rejected compact token: {e}");
                LoggingTransformer::log_token_verified(None, false);
            }
        }
        result
    }

    fn verify_inner(&self, token: &str, now: i64) -> JwtResult<VerifiedToken> {
        let segments = TokenSegments::split(token)?;

        let header_json = decode_segment(segments.header, "header")?;
        let claims_json = decode_segment(segments.payload, "payload")?;
        let signature_bytes = decode_segment(segments.signature, "signature")?;

        let header: JwtHeader = serde_json::from_slice(&header_json)
            .map_err(|e| JwtError::malformed(&format!("header is not a JWS header: {e}")))?;
        if header.alg != ES256 {
            let declared = if header.alg.is_empty() {
                "<missing alg>"
            } else {
                header.alg.as_str()
            };
            return Err(JwtError::unsupported_algorithm(declared));
        }

        // r and s must each be in [1, n - 1]
        let signature = RawSignature::from_slice(&signature_bytes)?;
        self.key
            .verifying_key()
            .verify(segments.signing_input.as_bytes(), signature.as_ecdsa())
            .map_err(|_| JwtError::InvalidSignature)?;

        // Only decode claims after signature verification succeeds
        let claims: ClaimSet = serde_json::from_slice(&claims_json)
            .map_err(|e| JwtError::malformed(&format!("payload is not a reader claim set: {e}")))?;

        if self.options.validate_exp
            && now > claims.exp.saturating_add(self.options.leeway_seconds())
        {
            return Err(JwtError::TokenExpired {
                exp: claims.exp,
                now,
            });
        }

        tracing::debug!(
            alg = ES256,
            kid = header.kid.as_deref().unwrap_or_default(),
            "verified compact token"
        );
        Ok(VerifiedToken { header, claims })
    }
}

fn decode_segment(segment: &str, name: &str) -> JwtResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| JwtError::malformed(&format!("{name} segment is not base64url: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{keys::PrivateKey, signer::Es256Signer};
    use p256::ecdsa::SigningKey;

    fn key_pair(seed: u8) -> (Es256Signer, Es256Verifier) {
        let key = PrivateKey::from(SigningKey::from_slice(&[seed; 32]).unwrap());
        let verifier = Es256Verifier::from_public_key(key.public_key());
        (Es256Signer::from_private_key(key), verifier)
    }

    fn claims() -> ClaimSet {
        ClaimSet {
            iss: "KLMNOPQRST".to_string(),
            sub: "UVWXYZ1234".to_string(),
            aud: "apple-identityservices-v1".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_000_300,
        }
    }

    fn encode(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json.as_bytes())
    }

    #[test]
    fn test_roundtrip_at_fixed_time() {
        let (signer, verifier) = key_pair(0x11);
        let token = signer.sign(&JwtHeader::es256("ABCDEFGHIJ"), &claims()).unwrap();

        let verified = verifier.verify_at(token.as_str(), 1_700_000_100).unwrap();
        assert_eq!(verified.claims, claims());
        assert_eq!(verified.header.kid.as_deref(), Some("ABCDEFGHIJ"));
    }

    #[test]
    fn test_expiry_boundary() {
        let (signer, verifier) = key_pair(0x12);
        let token = signer.sign(&JwtHeader::es256("ABCDEFGHIJ"), &claims()).unwrap();

        assert!(verifier.verify_at(token.as_str(), 1_700_000_300).is_ok());
        assert_eq!(
            verifier.verify_at(token.as_str(), 1_700_000_301),
            Err(JwtError::TokenExpired {
                exp: 1_700_000_300,
                now: 1_700_000_301
            })
        );
    }

    #[test]
    fn test_leeway_extends_expiry() {
        let (signer, verifier) = key_pair(0x13);
        let verifier = verifier
            .with_options(ValidationOptions::default().with_leeway(chrono::Duration::seconds(60)));
        let token = signer.sign(&JwtHeader::es256("ABCDEFGHIJ"), &claims()).unwrap();

        assert!(verifier.verify_at(token.as_str(), 1_700_000_360).is_ok());
        assert!(verifier.verify_at(token.as_str(), 1_700_000_361).is_err());
    }

    #[test]
    fn test_private_material_rejected() {
        let key = PrivateKey::from(SigningKey::from_slice(&[0x14; 32]).unwrap());
        assert!(matches!(
            Es256Verifier::new(KeyMaterial::Private(key)),
            Err(JwtError::KeyParse(_))
        ));
    }

    #[test]
    fn test_header_not_json() {
        let (_, verifier) = key_pair(0x15);
        let token = format!("{}.{}.{}", encode("not json"), encode("{}"), encode("sig"));
        assert!(matches!(
            verifier.verify_at(&token, 0),
            Err(JwtError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_missing_alg_is_unsupported() {
        let (_, verifier) = key_pair(0x16);
        let token = format!("{}.{}.{}", encode(r#"{"typ":"JWT"}"#), encode("{}"), encode("sig"));
        assert_eq!(
            verifier.verify_at(&token, 0),
            Err(JwtError::UnsupportedAlgorithm("<missing alg>".to_string()))
        );
    }

    #[test]
    fn test_claims_checked_only_after_signature() {
        let (signer, verifier) = key_pair(0x17);
        let token = signer.sign(&JwtHeader::es256("ABCDEFGHIJ"), &claims()).unwrap();
        let segments = token.segments().unwrap();

        let forged = format!("{}.{}.{}", segments.header, encode("[]"), segments.signature);
        assert_eq!(verifier.verify_at(&forged, 0), Err(JwtError::InvalidSignature));
    }
}
