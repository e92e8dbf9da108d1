//! CLI error types

use readertoken_jwt::JwtError;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Failures surfaced by the `reader-token` binary
#[derive(Debug, Error)]
pub enum CliError {
    /// A key or config file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not a valid JSON token configuration
    #[error("invalid config {}: {source}", path.display())]
    Config {
        /// Config file
        path: PathBuf,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// Key parsing, signing or verification failed
    #[error(transparent)]
    Jwt(#[from] JwtError),

    /// Writing the result lines failed
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}
