//! Claims assembly for reader tokens.

use crate::config::{TokenConfig, TOKEN_TTL_SECONDS};
use crate::error::{JwtError, JwtResult};
use crate::types::{ClaimSet, JwtHeader};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in unix seconds.
///
/// # Errors
/// Returns `JwtError::Clock` if the system clock is before the epoch or out
/// of range.
pub fn unix_now() -> JwtResult<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| JwtError::clock("system time is before the unix epoch"))?;
    i64::try_from(elapsed.as_secs()).map_err(|_| JwtError::clock("system time out of range"))
}

/// Build header and claims issued now.
///
/// # Errors
/// Returns `JwtError::Clock` if the clock cannot be read.
pub fn assemble(config: &TokenConfig) -> JwtResult<(JwtHeader, ClaimSet)> {
    assemble_at(config, unix_now()?)
}

/// Build header and claims issued at `issued_at` (unix seconds).
///
/// # Errors
/// Returns `JwtError::Clock` if `issued_at + 300` overflows.
pub fn assemble_at(config: &TokenConfig, issued_at: i64) -> JwtResult<(JwtHeader, ClaimSet)> {
    let expires_at = issued_at
        .checked_add(TOKEN_TTL_SECONDS)
        .ok_or_else(|| JwtError::clock("expiry time out of range"))?;

    let header = JwtHeader::es256(&config.key_id);
    let claims = ClaimSet {
        iss: config.issuer.clone(),
        sub: config.subject.clone(),
        aud: config.audience.clone(),
        iat: issued_at,
        exp: expires_at,
    };
    Ok((header, claims))
}
