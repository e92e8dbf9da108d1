//! Fixed-width ES256 signature encoding
//!
//! JWS carries ECDSA signatures as `r || s`, each integer left-padded to 32
//! bytes (RFC 7518 §3.4). Most ECDSA tooling (OpenSSL, HSMs, cloud KMS)
//! emits the ASN.1 DER `SEQUENCE { INTEGER r, INTEGER s }` form instead,
//! whose integers are variable length and may carry a leading sign byte.
//! [`RawSignature`] is always the 64-byte form; DER only appears at the
//! conversion boundary.

use crate::error::{JwtError, JwtResult};
use p256::ecdsa::Signature;
use std::fmt;

/// Length of one big-endian P-256 scalar
pub const SCALAR_LEN: usize = 32;

/// Length of an ES256 signature in JWS form
pub const SIGNATURE_LEN: usize = 2 * SCALAR_LEN;

/// ES256 signature in JWS form: `r || s`, 32 bytes each, big-endian
///
/// Construction guarantees both integers lie in `[1, n - 1]`.
#[derive(Clone, PartialEq, Eq)]
pub struct RawSignature(Signature);

impl RawSignature {
    /// Interpret 64 raw bytes as `r || s`
    ///
    /// # Errors
    /// Returns `JwtError::InvalidSignature` if the length is not 64 or
    /// either integer is zero or not below the curve order
    pub fn from_slice(bytes: &[u8]) -> JwtResult<Self> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(JwtError::InvalidSignature);
        }
        Signature::from_slice(bytes)
            .map(Self)
            .map_err(|_| JwtError::InvalidSignature)
    }

    /// Convert a DER `SEQUENCE { INTEGER r, INTEGER s }` signature
    ///
    /// Sign bytes are stripped and each integer is left-padded to 32 bytes
    /// independently.
    ///
    /// # Errors
    /// Returns `JwtError::InvalidSignature` for malformed DER or integers
    /// outside `[1, n - 1]`
    pub fn from_der(der: &[u8]) -> JwtResult<Self> {
        Signature::from_der(der)
            .map(Self)
            .map_err(|_| JwtError::InvalidSignature)
    }

    /// DER encoding of this signature
    #[must_use]
    pub fn to_der(&self) -> Vec<u8> {
        self.0.to_der().as_bytes().to_vec()
    }

    /// The 64 signature bytes, `r || s`
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut raw = [0u8; SIGNATURE_LEN];
        raw.copy_from_slice(&self.0.to_bytes());
        raw
    }

    /// Big-endian `r`, left-padded to 32 bytes
    #[must_use]
    pub fn r(&self) -> [u8; SCALAR_LEN] {
        let mut r = [0u8; SCALAR_LEN];
        r.copy_from_slice(&self.to_bytes()[..SCALAR_LEN]);
        r
    }

    /// Big-endian `s`, left-padded to 32 bytes
    #[must_use]
    pub fn s(&self) -> [u8; SCALAR_LEN] {
        let mut s = [0u8; SCALAR_LEN];
        s.copy_from_slice(&self.to_bytes()[SCALAR_LEN..]);
        s
    }

    pub(crate) fn as_ecdsa(&self) -> &Signature {
        &self.0
    }
}

impl From<Signature> for RawSignature {
    fn from(signature: Signature) -> Self {
        Self(signature)
    }
}

impl fmt::Debug for RawSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSignature")
            .field("r", &hex::encode(self.r()))
            .field("s", &hex::encode(self.s()))
            .finish()
    }
}
