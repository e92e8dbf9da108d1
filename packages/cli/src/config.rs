//! Token identity configuration for the CLI
//!
//! Values come from, in increasing precedence: the demonstration defaults, an
//! optional JSON file, and command line flags.

use crate::error::{CliError, CliResult};
use readertoken_jwt::{TokenConfig, DEFAULT_AUDIENCE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Key id used when none is configured
pub const DEMO_KEY_ID: &str = "ABCDEFGHIJ";
/// Issuer used when none is configured
pub const DEMO_ISSUER: &str = "KLMNOPQRST";
/// Subject used when none is configured
pub const DEMO_SUBJECT: &str = "UVWXYZ1234";

/// Token identifiers as read from a JSON config file; every field is optional
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Signing key identifier (`kid`)
    pub key_id: Option<String>,
    /// Issuer (`iss`)
    pub issuer: Option<String>,
    /// Subject (`sub`)
    pub subject: Option<String>,
    /// Audience (`aud`)
    pub audience: Option<String>,
}

impl FileConfig {
    /// Load a config file
    ///
    /// # Errors
    /// `CliError::Io` if the file cannot be read, `CliError::Config` if it is
    /// not a JSON object with the known fields
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded token config");
        Ok(config)
    }

    /// Values of `overrides` take precedence over `self`
    #[must_use]
    pub fn merge(self, overrides: FileConfig) -> Self {
        Self {
            key_id: overrides.key_id.or(self.key_id),
            issuer: overrides.issuer.or(self.issuer),
            subject: overrides.subject.or(self.subject),
            audience: overrides.audience.or(self.audience),
        }
    }

    /// Fill unset values with the demonstration identifiers
    #[must_use]
    pub fn into_token_config(self) -> TokenConfig {
        TokenConfig::builder()
            .key_id(self.key_id.as_deref().unwrap_or(DEMO_KEY_ID))
            .issuer(self.issuer.as_deref().unwrap_or(DEMO_ISSUER))
            .subject(self.subject.as_deref().unwrap_or(DEMO_SUBJECT))
            .audience(self.audience.as_deref().unwrap_or(DEFAULT_AUDIENCE))
            .build()
    }
}
