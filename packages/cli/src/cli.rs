//! CLI definition and the sign-then-verify flow

use crate::{
    config::FileConfig,
    error::{CliError, CliResult},
};
use clap::Parser;
use readertoken_common::LoggingTransformer;
use readertoken_jwt::{
    keys::{read_key_material, KeyMaterial},
    Es256Signer, Es256Verifier, ValidationOptions, VerifiedToken,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Command line arguments of `reader-token`
#[derive(Debug, Parser)]
#[command(name = "reader-token")]
#[command(about = "Sign and verify an ES256 reader token")]
pub struct Cli {
    /// PEM private key (SEC1 `EC PRIVATE KEY` or PKCS#8 `PRIVATE KEY`)
    #[arg(long, default_value = "private-key.pem")]
    pub private_key: PathBuf,

    /// PEM public key (`PUBLIC KEY`)
    #[arg(long, default_value = "public-key.pem")]
    pub public_key: PathBuf,

    /// JSON file with `key_id`, `issuer`, `subject` and `audience`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Signing key identifier (`kid`)
    #[arg(long)]
    pub key_id: Option<String>,

    /// Issuer (`iss`)
    #[arg(long)]
    pub issuer: Option<String>,

    /// Subject (`sub`)
    #[arg(long)]
    pub subject: Option<String>,

    /// Audience (`aud`)
    #[arg(long)]
    pub audience: Option<String>,

    /// Skip the expiry check when verifying
    #[arg(long)]
    pub no_expiry_check: bool,
}

impl Cli {
    /// Identifier values given on the command line
    fn overrides(&self) -> FileConfig {
        FileConfig {
            key_id: self.key_id.clone(),
            issuer: self.issuer.clone(),
            subject: self.subject.clone(),
            audience: self.audience.clone(),
        }
    }

    fn validation_options(&self) -> ValidationOptions {
        if self.no_expiry_check {
            ValidationOptions::without_expiry()
        } else {
            ValidationOptions::default()
        }
    }
}

/// Issue a token with the private key, verify it with the public key and
/// report both steps on `out`
///
/// # Errors
/// The first failure: reading a file, parsing the config or a key, signing,
/// verifying, or writing to `out`
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> CliResult<VerifiedToken> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let token_config = file_config.merge(cli.overrides()).into_token_config();

    let signer = Es256Signer::new(load_key(&cli.private_key)?)?;
    let token = signer.issue(&token_config)?;
    writeln!(out, "JWT Signed Successfully: {token}").map_err(CliError::Output)?;

    let verifier = Es256Verifier::new(load_key(&cli.public_key)?)?.with_options(cli.validation_options());
    let verified = verifier.verify(token.as_str())?;
    writeln!(out, "JWT Verified Successfully: {token}").map_err(CliError::Output)?;

    Ok(verified)
}

fn load_key(path: &Path) -> CliResult<KeyMaterial> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match read_key_material(file) {
        Ok(material) => {
            LoggingTransformer::log_key_loaded(material.kind(), &path.display().to_string());
            Ok(material)
        }
        Err(e) => {
            LoggingTransformer::log_crypto_error("key_load", &e);
            Err(e.into())
        }
    }
}
