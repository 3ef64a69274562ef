//! Keyed digest and constant-time comparison.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::NonceError;
use crate::key::SecretKey;

type HmacSha256 = Hmac<Sha256>;

/// Width of a hex-encoded HMAC-SHA256 digest.
pub const HMAC_SHA256_HEX_LEN: usize = 64;

/// Keyed hash used to derive tokens.
///
/// Implementations must be deterministic for a given key and message.
pub trait KeyedDigest: Send + Sync {
    /// Returns the lowercase hex digest of `message`.
    fn digest_hex(&self, message: &[u8]) -> String;

    /// Width of [`KeyedDigest::digest_hex`] output in characters.
    fn hex_len(&self) -> usize;
}

/// HMAC-SHA256 keyed with the application secret.
#[derive(Clone)]
pub struct HmacSha256Digest {
    mac: HmacSha256,
}

impl HmacSha256Digest {
    /// Keys a new digest.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::Environment`] if the key is rejected by the MAC.
    pub fn new(key: &SecretKey) -> Result<Self, NonceError> {
        let mac = HmacSha256::new_from_slice(key.expose())
            .map_err(|e| NonceError::environment(format!("invalid secret key: {e}")))?;
        Ok(Self { mac })
    }
}

impl std::fmt::Debug for HmacSha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSha256Digest").finish_non_exhaustive()
    }
}

impl KeyedDigest for HmacSha256Digest {
    fn digest_hex(&self, message: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(message);
        hex::encode(mac.finalize().into_bytes())
    }

    fn hex_len(&self) -> usize {
        HMAC_SHA256_HEX_LEN
    }
}

/// Compares two tokens without short-circuiting on the first differing byte.
///
/// Inputs of different length are never equal; only the length is observable
/// through timing.
#[must_use]
pub fn constant_time_eq(expected: &str, candidate: &str) -> bool {
    if expected.len() != candidate.len() {
        return false;
    }
    expected.as_bytes().ct_eq(candidate.as_bytes()).into()
}
