//! JWT error types

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// Errors produced while parsing keys, issuing or verifying tokens.
///
/// None of these are transient; callers should not retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtError {
    /// Bad PEM framing, bad DER, wrong curve or wrong key type
    #[error("Key parse error: {0}")]
    KeyParse(String),
    /// Internal signing fault or key/algorithm mismatch
    #[error("Signing error: {0}")]
    Signing(String),
    /// Token is not three decodable base64url segments with JSON header and claims
    #[error("Malformed token: {0}")]
    MalformedToken(String),
    /// Header declares an algorithm other than ES256
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// Signature does not verify against the public key
    #[error("Invalid JWT signature")]
    InvalidSignature,
    /// Token expiry lies in the past
    #[error("JWT token has expired (exp: {exp}, now: {now})")]
    TokenExpired {
        /// `exp` claim of the token
        exp: i64,
        /// Time the token was evaluated at
        now: i64,
    },
    /// System clock could not be read
    #[error("Clock error: {0}")]
    Clock(String),
}

impl JwtError {
    /// Create a key parse error
    #[inline]
    #[must_use]
    pub fn key_parse(msg: &str) -> Self {
        JwtError::KeyParse(msg.to_string())
    }

    /// Create a signing error
    #[inline]
    #[must_use]
    pub fn signing(msg: &str) -> Self {
        JwtError::Signing(msg.to_string())
    }

    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed(msg: &str) -> Self {
        JwtError::MalformedToken(msg.to_string())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        JwtError::UnsupportedAlgorithm(alg.to_string())
    }

    /// Create a clock error
    #[inline]
    #[must_use]
    pub fn clock(msg: &str) -> Self {
        JwtError::Clock(msg.to_string())
    }

    /// Stable snake_case name of the error kind, for logs and exit reporting
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            JwtError::KeyParse(_) => "key_parse",
            JwtError::Signing(_) => "signing",
            JwtError::MalformedToken(_) => "malformed_token",
            JwtError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            JwtError::InvalidSignature => "signature_invalid",
            JwtError::TokenExpired { .. } => "expired_token",
            JwtError::Clock(_) => "clock",
        }
    }
}
