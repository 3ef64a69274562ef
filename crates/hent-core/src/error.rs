//! Error types for nonce operations.
//!
//! A failed verification is not an error: it is reported as
//! [`Verification::Invalid`](crate::Verification::Invalid). Only malformed
//! input and a broken environment (clock, key, configuration) surface here.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while deriving, issuing or verifying nonces.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NonceError {
    /// An input was malformed or out of bounds.
    #[error("invalid input for field {field}: {reason}")]
    InvalidInput {
        /// The field name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The environment cannot support token operations (clock unreadable,
    /// secret key missing).
    #[error("environment failure: {reason}")]
    Environment {
        /// What is unavailable.
        reason: String,
    },

    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl NonceError {
    pub(crate) fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn environment(reason: impl Into<String>) -> Self {
        Self::Environment {
            reason: reason.into(),
        }
    }

    /// Returns `true` for failures no retry can fix without operator action.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Environment { .. } | Self::Config(_))
    }
}

/// Error reported by a [`VerificationFailureSink`](crate::VerificationFailureSink).
///
/// The verifier logs and discards it.
#[derive(Debug, Error)]
#[error("verification failure sink error: {message}")]
pub struct SinkError {
    /// Human-readable description.
    pub message: String,
}

impl SinkError {
    /// Creates a new sink error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NonceError::invalid_input("actor_id", "not an integer");
        assert_eq!(
            err.to_string(),
            "invalid input for field actor_id: not an integer"
        );

        let err = NonceError::environment("clock is before the UNIX epoch");
        assert_eq!(
            err.to_string(),
            "environment failure: clock is before the UNIX epoch"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(NonceError::environment("no key").is_fatal());
        assert!(NonceError::Config(ConfigError::Validation("zero".into())).is_fatal());
        assert!(!NonceError::invalid_input("window", "bad").is_fatal());
    }
}
