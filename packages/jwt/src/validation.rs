//! JWT validation options and configuration.

use chrono::Duration;

/// Time-based checks applied after the signature verifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Leeway for time-based claims.
    pub leeway: Duration,
    /// Reject tokens whose `exp` lies in the past.
    pub validate_exp: bool,
}

impl Default for ValidationOptions {
    /// Expiry is enforced with no leeway.
    fn default() -> Self {
        Self {
            leeway: Duration::zero(),
            validate_exp: true,
        }
    }
}

impl ValidationOptions {
    /// Options that only check structure, algorithm and signature.
    ///
    /// Useful for inspecting tokens that are known to be expired, such as
    /// archived tokens or fixtures.
    #[must_use]
    pub fn without_expiry() -> Self {
        Self {
            leeway: Duration::zero(),
            validate_exp: false,
        }
    }

    /// Set the time leeway for validation.
    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Set whether to validate expiration.
    #[must_use]
    pub fn validate_expiration(mut self, validate: bool) -> Self {
        self.validate_exp = validate;
        self
    }

    /// Leeway in whole seconds, clamped to be non-negative.
    pub(crate) fn leeway_seconds(&self) -> i64 {
        self.leeway.num_seconds().max(0)
    }
}
