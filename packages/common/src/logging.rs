//! Structured logging infrastructure
//!
//! Provides `env_logger`-based logging with secure handling of identifiers
//! and integration with the standard log crate. The library crates emit
//! `tracing` events with the `log` bridge enabled, so initializing the logger
//! here is enough to surface them.

use log::{debug, error, info, warn};
use sha2::{Digest, Sha256};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging infrastructure using `env_logger`
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging system (call once at application startup)
    ///
    /// Configure logging levels via the `RUST_LOG` environment variable:
    /// - `RUST_LOG=debug` - Enable all debug logs
    /// - `RUST_LOG=info` - Enable info and above
    /// - `RUST_LOG=readertoken_jwt=debug` - Module-specific levels
    ///
    /// Without `RUST_LOG` only warnings and errors are written, so the
    /// token lines on stdout stay the only regular output.
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("warn"),
            )
            .format_timestamp_micros()
            .init();

            debug!("Structured logging initialized");
        });
    }

    /// Initialize logging for test environments
    ///
    /// Safe to call from every test; only the first call installs a logger.
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log a failed JWT operation
    ///
    /// Only the operation, algorithm and error text are logged; error texts
    /// produced by the jwt crate never contain key bytes or token contents.
    pub fn log_jwt_error(operation: &str, algorithm: &str, error: &str) {
        error!("JWT operation failed: {operation} (alg: {algorithm}): {error}");
    }

    /// Log that key material was loaded from a source
    pub fn log_key_loaded(kind: &str, source: &str) {
        info!("Loaded {kind} key material from {source}");
    }

    /// Log a freshly issued token
    ///
    /// Key id and issuer are hashed, the token itself is never logged.
    pub fn log_token_issued(key_id: &str, issuer: &str, expires_at: i64) {
        info!(
            "Issued reader token (kid_hash: {}, iss_hash: {}, exp: {expires_at})",
            Self::secure_hash_key(key_id),
            Self::secure_hash_key(issuer)
        );
    }

    /// Log the outcome of a token verification
    pub fn log_token_verified(key_id: Option<&str>, success: bool) {
        let kid_hash = key_id.map_or_else(|| "none".to_string(), Self::secure_hash_key);
        if success {
            info!("Reader token verified (kid_hash: {kid_hash})");
        } else {
            warn!("Reader token rejected (kid_hash: {kid_hash})");
        }
    }

    /// Secure logging of cryptographic errors
    ///
    /// Logs the error type without its contents
    pub fn log_crypto_error(operation: &str, error: &dyn std::error::Error) {
        error!(
            "Cryptographic operation failed: {} (error_type: {})",
            operation,
            std::any::type_name_of_val(error)
        );
    }

    /// SHA-256 based hashing of identifiers for logging
    ///
    /// Returns `#` followed by the first 12 hex characters of the digest.
    fn secure_hash_key(key: &str) -> String {
        let hash = Sha256::digest(key.as_bytes());
        let hex_hash = hex::encode(hash);
        format!("#{}", &hex_hash[..12])
    }
}
