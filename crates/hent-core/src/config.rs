//! Nonce configuration parsing and validation.
//!
//! The configuration is a small TOML document:
//!
//! ```toml
//! token_length = 16
//! window_seconds = 43200
//! truncation_offset = -18
//! ```
//!
//! Every field is optional and falls back to the legacy-compatible default.

use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::digest::HMAC_SHA256_HEX_LEN;

/// Default token length in characters.
pub const DEFAULT_TOKEN_LENGTH: usize = 16;

/// Default window length: half of a one-day token lifetime.
pub const DEFAULT_WINDOW_SECONDS: u64 = 43_200;

/// Default tail offset into the digest hex. Skips the final two characters.
pub const DEFAULT_TRUNCATION_OFFSET: i64 = -18;

/// Errors raised while loading or validating a [`NonceConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The TOML could not be produced.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value violates a configuration invariant.
    #[error("invalid config: {0}")]
    Validation(String),
}

/// Token derivation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NonceConfig {
    /// Output token length in characters.
    pub token_length: usize,

    /// Size of one time window in seconds.
    pub window_seconds: u64,

    /// Start of the token slice within the digest hex. Negative values count
    /// from the end of the hex string.
    pub truncation_offset: i64,
}

impl Default for NonceConfig {
    fn default() -> Self {
        Self {
            token_length: DEFAULT_TOKEN_LENGTH,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            truncation_offset: DEFAULT_TRUNCATION_OFFSET,
        }
    }
}

impl NonceConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML is invalid or contains unknown keys
    /// - The resulting configuration fails [`NonceConfig::validate`]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Sets the token length.
    #[must_use]
    pub const fn with_token_length(mut self, token_length: usize) -> Self {
        self.token_length = token_length;
        self
    }

    /// Sets the window length in seconds.
    #[must_use]
    pub const fn with_window_seconds(mut self, window_seconds: u64) -> Self {
        self.window_seconds = window_seconds;
        self
    }

    /// Sets the truncation offset.
    #[must_use]
    pub const fn with_truncation_offset(mut self, truncation_offset: i64) -> Self {
        self.truncation_offset = truncation_offset;
        self
    }

    /// Validates the configuration against the HMAC-SHA256 digest width.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.slice_range(HMAC_SHA256_HEX_LEN).map(|_| ())
    }

    /// Returns the byte range of the token inside a digest hex string of
    /// `hex_len` characters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the window is zero, the token
    /// length is zero, or the slice does not fit inside the digest.
    pub fn slice_range(&self, hex_len: usize) -> Result<Range<usize>, ConfigError> {
        if self.window_seconds == 0 {
            return Err(ConfigError::Validation(
                "window_seconds must be at least 1".to_string(),
            ));
        }
        if self.token_length == 0 {
            return Err(ConfigError::Validation(
                "token_length must be at least 1".to_string(),
            ));
        }

        let hex_len_signed = i64::try_from(hex_len)
            .map_err(|_| ConfigError::Validation("digest width out of range".to_string()))?;
        let start = if self.truncation_offset < 0 {
            hex_len_signed + self.truncation_offset
        } else {
            self.truncation_offset
        };
        let start = usize::try_from(start).map_err(|_| {
            ConfigError::Validation(format!(
                "truncation_offset {} reaches before the start of a {hex_len}-character digest",
                self.truncation_offset
            ))
        })?;

        match start.checked_add(self.token_length) {
            Some(end) if end <= hex_len => Ok(start..end),
            _ => Err(ConfigError::Validation(format!(
                "token slice (offset {}, length {}) exceeds the {hex_len}-character digest",
                self.truncation_offset, self.token_length
            ))),
        }
    }
}
