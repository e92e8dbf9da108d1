//! Token identity configuration with a compile-time checked builder.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Audience of the identity services verifier
pub const DEFAULT_AUDIENCE: &str = "apple-identityservices-v1";

/// Lifetime of every issued token; `exp` is always `iat` plus this
pub const TOKEN_TTL_SECONDS: i64 = 300;

/// Typestate markers for builder pattern.
pub mod ts {
    /// Marker for a field that has been set.
    pub struct Set;
    /// Marker for a field that has not been set.
    pub struct Unset;
}

/// Identifiers that go into every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Identifier of the signing key registered with the verifier (`kid`).
    pub key_id: String,
    /// Issuer (`iss`), the registered brand identifier.
    pub issuer: String,
    /// Subject (`sub`), the reader instance identifier.
    pub subject: String,
    /// Audience (`aud`).
    #[serde(default = "default_audience")]
    pub audience: String,
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

impl TokenConfig {
    /// Start a builder; `build()` is available once key id, issuer and
    /// subject are set.
    #[must_use]
    pub fn builder() -> TokenConfigBuilder {
        TokenConfigBuilder::new()
    }
}

/// Compile-time checked builder for [`TokenConfig`].
pub struct TokenConfigBuilder<Kid = ts::Unset, Iss = ts::Unset, Sub = ts::Unset> {
    key_id: String,
    issuer: String,
    subject: String,
    audience: String,
    _phantom: PhantomData<(Kid, Iss, Sub)>,
}

impl TokenConfigBuilder {
    /// Create a new builder with the default audience.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key_id: String::new(),
            issuer: String::new(),
            subject: String::new(),
            audience: default_audience(),
            _phantom: PhantomData,
        }
    }
}

impl Default for TokenConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<Iss, Sub> TokenConfigBuilder<ts::Unset, Iss, Sub> {
    /// Set the signing key identifier (`kid`).
    pub fn key_id(self, kid: impl Into<String>) -> TokenConfigBuilder<ts::Set, Iss, Sub> {
        TokenConfigBuilder {
            key_id: kid.into(),
            issuer: self.issuer,
            subject: self.subject,
            audience: self.audience,
            _phantom: PhantomData,
        }
    }
}

impl<Kid, Sub> TokenConfigBuilder<Kid, ts::Unset, Sub> {
    /// Set the issuer (`iss`).
    pub fn issuer(self, iss: impl Into<String>) -> TokenConfigBuilder<Kid, ts::Set, Sub> {
        TokenConfigBuilder {
            key_id: self.key_id,
            issuer: iss.into(),
            subject: self.subject,
            audience: self.audience,
            _phantom: PhantomData,
        }
    }
}

impl<Kid, Iss> TokenConfigBuilder<Kid, Iss, ts::Unset> {
    /// Set the subject (`sub`).
    pub fn subject(self, sub: impl Into<String>) -> TokenConfigBuilder<Kid, Iss, ts::Set> {
        TokenConfigBuilder {
            key_id: self.key_id,
            issuer: self.issuer,
            subject: sub.into(),
            audience: self.audience,
            _phantom: PhantomData,
        }
    }
}

impl<Kid, Iss, Sub> TokenConfigBuilder<Kid, Iss, Sub> {
    /// Override the audience (`aud`).
    #[must_use]
    pub fn audience(mut self, aud: impl Into<String>) -> Self {
        self.audience = aud.into();
        self
    }
}

impl TokenConfigBuilder<ts::Set, ts::Set, ts::Set> {
    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> TokenConfig {
        TokenConfig {
            key_id: self.key_id,
            issuer: self.issuer,
            subject: self.subject,
            audience: self.audience,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_audience() {
        let config = TokenConfig::builder()
            .key_id("ABCDEFGHIJ")
            .issuer("KLMNOPQRST")
            .subject("UVWXYZ1234")
            .build();

        assert_eq!(config.key_id, "ABCDEFGHIJ");
        assert_eq!(config.issuer, "KLMNOPQRST");
        assert_eq!(config.subject, "UVWXYZ1234");
        assert_eq!(config.audience, DEFAULT_AUDIENCE);
    }

    #[test]
    fn test_builder_any_order() {
        let config = TokenConfig::builder()
            .audience("custom-audience")
            .subject("sub")
            .key_id("kid")
            .issuer("iss")
            .build();

        assert_eq!(config.audience, "custom-audience");
        assert_eq!(config.key_id, "kid");
    }

    #[test]
    fn test_deserialize_without_audience() {
        let config: TokenConfig = serde_json::from_str(
            r#"{"key_id":"ABCDEFGHIJ","issuer":"KLMNOPQRST","subject":"UVWXYZ1234"}"#,
        )
        .unwrap();
        assert_eq!(config.audience, DEFAULT_AUDIENCE);
    }

    #[test]
    fn test_deserialize_requires_identifiers() {
        let result = serde_json::from_str::<TokenConfig>(r#"{"key_id":"ABCDEFGHIJ"}"#);
        assert!(result.is_err());
    }
}
