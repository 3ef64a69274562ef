//! Application-wide signing key.
//!
//! The key is provisioned by the host (configuration, environment, a secret
//! manager). This crate never generates, persists or rotates it.

use secrecy::{ExposeSecret, SecretSlice};

use crate::error::NonceError;

/// Environment variable consulted by [`SecretKey::from_env`] callers that do
/// not name their own.
pub const DEFAULT_SECRET_KEY_ENV: &str = "HENT_SECRET_KEY";

/// Keyed-hash key shared by every issued token.
///
/// Wrapped in [`SecretSlice`] so it is zeroized on drop and never printed by
/// `Debug`.
#[derive(Debug)]
pub struct SecretKey(SecretSlice<u8>);

impl SecretKey {
    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::Environment`] if the key is empty.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, NonceError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(NonceError::environment("secret key is empty"));
        }
        Ok(Self(SecretSlice::from(bytes)))
    }

    /// Reads the key from an environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::Environment`] if the variable is unset, not
    /// valid UTF-8, or blank.
    pub fn from_env(var: &str) -> Result<Self, NonceError> {
        let value = std::env::var(var)
            .map_err(|e| NonceError::environment(format!("secret key variable {var}: {e}")))?;
        if value.trim().is_empty() {
            return Err(NonceError::environment(format!(
                "secret key variable {var} is blank"
            )));
        }
        Self::new(value.into_bytes())
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}
