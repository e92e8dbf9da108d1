//! JWT type definitions

use crate::error::{JwtError, JwtResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// JWS algorithm identifier for ECDSA P-256 with SHA-256
pub const ES256: &str = "ES256";

/// Token type carried in the `typ` header
pub const JWT_TYPE: &str = "JWT";

/// JWT header structure
///
/// Fields serialize in the order `alg`, `typ`, `kid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtHeader {
    /// Signing algorithm; empty when the header omits it
    #[serde(default)]
    pub alg: String,
    /// Token type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Identifier of the registered signing key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl JwtHeader {
    /// ES256 header for the given key id
    #[must_use]
    pub fn es256(kid: &str) -> Self {
        Self {
            alg: ES256.to_string(),
            typ: Some(JWT_TYPE.to_string()),
            kid: Some(kid.to_string()),
        }
    }
}

/// The fixed reader-token claim set
///
/// Fields serialize in the order `iss`, `sub`, `aud`, `iat`, `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Issuer
    pub iss: String,
    /// Subject
    pub sub: String,
    /// Audience
    pub aud: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

/// JWS compact serialization: `header.payload.signature`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactToken(String);

impl CompactToken {
    /// Assemble a token from its three already encoded segments
    pub(crate) fn from_segments(signing_input: &str, signature_b64: &str) -> Self {
        let mut token = String::with_capacity(signing_input.len() + 1 + signature_b64.len());
        token.push_str(signing_input);
        token.push('.');
        token.push_str(signature_b64);
        Self(token)
    }

    /// Split the token into its three encoded segments
    ///
    /// # Errors
    /// Returns `JwtError::MalformedToken` unless there are exactly three segments
    pub fn segments(&self) -> JwtResult<TokenSegments<'_>> {
        TokenSegments::split(&self.0)
    }

    /// `header.payload`, the bytes covered by the signature
    ///
    /// # Errors
    /// Returns `JwtError::MalformedToken` unless there are exactly three segments
    pub fn signing_input(&self) -> JwtResult<&str> {
        self.segments().map(|segments| segments.signing_input)
    }

    /// Borrow the token text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the token text
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for CompactToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl AsRef<str> for CompactToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompactToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three base64url segments of a compact token, still encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSegments<'a> {
    /// Encoded header
    pub header: &'a str,
    /// Encoded payload
    pub payload: &'a str,
    /// Encoded signature
    pub signature: &'a str,
    /// `header.payload`, exactly as it appears in the token
    pub signing_input: &'a str,
}

impl<'a> TokenSegments<'a> {
    /// Split `token` on `.`
    ///
    /// # Errors
    /// Returns `JwtError::MalformedToken` unless there are exactly three segments
    pub fn split(token: &'a str) -> JwtResult<Self> {
        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(JwtError::malformed(
                "expected three '.'-separated segments",
            ));
        };

        Ok(Self {
            header,
            payload,
            signature,
            signing_input: &token[..header.len() + 1 + payload.len()],
        })
    }
}

/// Header and claims of a token whose signature and validity were checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// Decoded header
    pub header: JwtHeader,
    /// Decoded claims
    pub claims: ClaimSet,
}
