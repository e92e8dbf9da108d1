//! Reader token command line front end
//!
//! Loads a P-256 key pair from PEM files, issues a token for the configured
//! identifiers and immediately verifies it with the public key.

pub mod cli;
pub mod config;
mod error;

pub use cli::{run, Cli};
pub use config::{FileConfig, DEMO_ISSUER, DEMO_KEY_ID, DEMO_SUBJECT};
pub use error::{CliError, CliResult};
