//! ES256 signing with ECDSA P-256

use crate::{
    claims,
    config::TokenConfig,
    error::{JwtError, JwtResult},
    keys::{KeyMaterial, PrivateKey, PublicKey},
    signature::RawSignature,
    types::{ClaimSet, CompactToken, JwtHeader, ES256},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use p256::ecdsa::{signature::Signer, Signature};
use readertoken_common::LoggingTransformer;
use serde::Serialize;

/// Issues ES256 compact tokens with a P-256 private key
#[derive(Debug)]
pub struct Es256Signer {
    key: PrivateKey,
}

impl Es256Signer {
    /// Take ownership of private key material
    ///
    /// # Errors
    /// Returns `JwtError::Signing` if the material is a public key
    pub fn new(material: KeyMaterial) -> JwtResult<Self> {
        match material {
            KeyMaterial::Private(key) => Ok(Self::from_private_key(key)),
            KeyMaterial::Public(_) => Err(JwtError::signing(
                "ES256 signing requires a private key, found a public key",
            )),
        }
    }

    /// Sign with an already parsed private key
    #[must_use]
    pub fn from_private_key(key: PrivateKey) -> Self {
        Self { key }
    }

    /// Public key matching the signing key
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    /// Assemble header and claims for `config` at the current time and sign them
    ///
    /// # Errors
    /// Returns `JwtError::Clock` if the clock cannot be read, or
    /// `JwtError::Signing` if signing fails
    pub fn issue(&self, config: &TokenConfig) -> JwtResult<CompactToken> {
        let (header, claims) = claims::assemble(config)?;
        let token = self.sign(&header, &claims)?;
        LoggingTransformer::log_token_issued(&config.key_id, &config.issuer, claims.exp);
        Ok(token)
    }

    /// Sign `header` and `claims` into a compact token
    ///
    /// # Errors
    /// Returns `JwtError::Signing` if the header does not declare ES256, the
    /// key curve does not match, serialization fails, or the ECDSA primitive
    /// reports an error
    pub fn sign(&self, header: &JwtHeader, claims: &ClaimSet) -> JwtResult<CompactToken> {
        let result = self.sign_inner(header, claims);
        if let Err(e) = &result {
            LoggingTransformer::log_jwt_error("jwt_signing", ES256, &e.to_string());
        }
        result
    }

    fn sign_inner(&self, header: &JwtHeader, claims: &ClaimSet) -> JwtResult<CompactToken> {
        if header.alg != ES256 {
            return Err(JwtError::signing(&format!(
                "header declares `{}` but the signer only produces {ES256}",
                header.alg
            )));
        }
        if self.key.curve().jws_algorithm() != header.alg {
            return Err(JwtError::signing(&format!(
                "{} key cannot produce {} signatures",
                self.key.curve(),
                header.alg
            )));
        }

        let header_b64 = encode_segment(header)?;
        let claims_b64 = encode_segment(claims)?;

        let mut signing_input = String::with_capacity(header_b64.len() + 1 + claims_b64.len());
        signing_input.push_str(&header_b64);
        signing_input.push('.');
        signing_input.push_str(&claims_b64);

        let signature = self.sign_bytes(signing_input.as_bytes())?;
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature.to_bytes());

        tracing::debug!(
            alg = ES256,
            kid = header.kid.as_deref().unwrap_or_default(),
            exp = claims.exp,
            "signed compact token"
        );
        Ok(CompactToken::from_segments(&signing_input, &signature_b64))
    }

    /// ECDSA over SHA-256 of `message`, RFC 6979 deterministic nonce
    fn sign_bytes(&self, message: &[u8]) -> JwtResult<RawSignature> {
        let signature: Signature = self
            .key
            .signing_key()
            .try_sign(message)
            .map_err(|e| JwtError::signing(&format!("ECDSA signing failed: {e}")))?;
        Ok(RawSignature::from(signature))
    }
}

fn encode_segment<T: Serialize>(value: &T) -> JwtResult<String> {
    let json =
        serde_json::to_vec(value).map_err(|e| JwtError::signing(&format!("serialization failed: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::SigningKey;

    fn signer() -> Es256Signer {
        let key = SigningKey::from_slice(&[0x42; 32]).unwrap();
        Es256Signer::from_private_key(PrivateKey::from(key))
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

    #[test]
    fn test_signature_segment_is_raw_64_bytes() {
        let token = signer()
            .sign(&JwtHeader::es256("ABCDEFGHIJ"), &claims())
            .unwrap();
        let segments = token.segments().unwrap();
        let signature = URL_SAFE_NO_PAD.decode(segments.signature).unwrap();

        assert_eq!(signature.len(), 64);
        // DER would start with a SEQUENCE tag and be 70-72 bytes
        assert!(RawSignature::from_slice(&signature).is_ok());
    }

    #[test]
    fn test_signing_is_deterministic() {
        let header = JwtHeader::es256("ABCDEFGHIJ");
        let first = signer().sign(&header, &claims()).unwrap();
        let second = signer().sign(&header, &claims()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_header_segment_encoding() {
        let token = signer()
            .sign(&JwtHeader::es256("ABCDEFGHIJ"), &claims())
            .unwrap();
        assert!(token
            .as_str()
            .starts_with("eyJhbGciOiJFUzI1NiIsInR5cCI6IkpXVCIsImtpZCI6IkFCQ0RFRkdISUoifQ."));
        assert!(!token.as_str().contains('='));
    }

    #[test]
    fn test_rejects_foreign_algorithm_header() {
        let mut header = JwtHeader::es256("ABCDEFGHIJ");
        header.alg = "HS256".to_string();

        match signer().sign(&header, &claims()) {
            Err(JwtError::Signing(msg)) => assert!(msg.contains("HS256")),
            other => panic!("Expected signing error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_public_key_material() {
        let public = signer().public_key();
        match Es256Signer::new(KeyMaterial::Public(public)) {
            Err(JwtError::Signing(_)) => {}
            other => panic!("Expected signing error, got {other:?}"),
        }
    }
}
