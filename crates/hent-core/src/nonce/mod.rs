//! Nonce issuance and verification.
//!
//! [`NonceService`] binds a token to four inputs:
//!
//! ```text
//! token = slice(hex(HMAC-SHA256(key, "{window}|{action}|{actor}|{session}")))
//! ```
//!
//! - **Derive**: pure function of the window and the three context fields.
//! - **Issue**: derive for the current window.
//! - **Verify**: accept the current window ([`Verification::Valid`]) or the
//!   one before it ([`Verification::ValidStale`]), comparing in constant time.
//!
//! # Statelessness
//!
//! Nothing is stored between calls. A token is valid for between one and two
//! windows depending on where in its window it was issued. The service holds
//! only read-only state and is safe to share across threads.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use hent_core::{
//!     ActionContext, ActorId, FixedClock, NonceConfig, NonceService, SecretKey,
//!     SessionBinding, Verification,
//! };
//!
//! # fn example() -> Result<(), hent_core::NonceError> {
//! let service = NonceService::builder()
//!     .config(NonceConfig::default().with_window_seconds(100))
//!     .secret_key(&SecretKey::new(b"K".to_vec())?)
//!     .clock(Arc::new(FixedClock::new(100_000)))
//!     .build()?;
//!
//! let action = ActionContext::new("delete-post:42")?;
//! let session = SessionBinding::new("sess-abc")?;
//! let token = service.issue(&action, ActorId::new(7), &session)?;
//! assert_eq!(token.len(), 16);
//!
//! let outcome = service.verify(token.as_str(), &action, ActorId::new(7), &session)?;
//! assert_eq!(outcome, Verification::Valid);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod derive;
mod issue;
mod verify;


use std::fmt;
use std::ops::Range;
use std::sync::Arc;

pub use verify::Verification;

use crate::clock::{Clock, SystemClock};
use crate::collaborators::{
    AnonymousActorHook, KeepAnonymous, TracingFailureSink, VerificationFailureSink,
};
use crate::config::NonceConfig;
use crate::digest::{HmacSha256Digest, KeyedDigest};
use crate::error::NonceError;
use crate::key::SecretKey;

/// Issues and verifies nonces.
pub struct NonceService {
    config: NonceConfig,
    slice: Range<usize>,
    digest: Arc<dyn KeyedDigest>,
    clock: Arc<dyn Clock>,
    anonymous_hook: Arc<dyn AnonymousActorHook>,
    failure_sink: Arc<dyn VerificationFailureSink>,
}

impl NonceService {
    /// Creates a service with the system clock and default collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the key is
    /// rejected.
    pub fn new(config: NonceConfig, key: &SecretKey) -> Result<Self, NonceError> {
        Self::builder().config(config).secret_key(key).build()
    }

    /// Starts building a service.
    #[must_use]
    pub fn builder() -> NonceServiceBuilder {
        NonceServiceBuilder::default()
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &NonceConfig {
        &self.config
    }
}

impl fmt::Debug for NonceService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonceService")
            .field("config", &self.config)
            .field("slice", &self.slice)
            .finish_non_exhaustive()
    }
}

/// Builder for [`NonceService`].
///
/// A key (or a custom [`KeyedDigest`]) is required; everything else has a
/// default.
#[derive(Default)]
pub struct NonceServiceBuilder {
    config: NonceConfig,
    digest: Option<Arc<dyn KeyedDigest>>,
    key_error: Option<NonceError>,
    clock: Option<Arc<dyn Clock>>,
    anonymous_hook: Option<Arc<dyn AnonymousActorHook>>,
    failure_sink: Option<Arc<dyn VerificationFailureSink>>,
}

impl NonceServiceBuilder {
    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: NonceConfig) -> Self {
        self.config = config;
        self
    }

    /// Keys the default HMAC-SHA256 digest.
    #[must_use]
    pub fn secret_key(mut self, key: &SecretKey) -> Self {
        match HmacSha256Digest::new(key) {
            Ok(digest) => {
                self.digest = Some(Arc::new(digest));
                self.key_error = None;
            },
            Err(e) => self.key_error = Some(e),
        }
        self
    }

    /// Uses a custom keyed digest instead of HMAC-SHA256.
    #[must_use]
    pub fn digest(mut self, digest: Arc<dyn KeyedDigest>) -> Self {
        self.digest = Some(digest);
        self.key_error = None;
        self
    }

    /// Sets the clock. Defaults to [`SystemClock`].
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the anonymous-actor hook. Defaults to [`KeepAnonymous`].
    #[must_use]
    pub fn anonymous_hook(mut self, hook: Arc<dyn AnonymousActorHook>) -> Self {
        self.anonymous_hook = Some(hook);
        self
    }

    /// Sets the failure sink. Defaults to [`TracingFailureSink`].
    #[must_use]
    pub fn failure_sink(mut self, sink: Arc<dyn VerificationFailureSink>) -> Self {
        self.failure_sink = Some(sink);
        self
    }

    /// Builds the service.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`NonceError::Environment`] if no usable key or digest was supplied
    /// - [`NonceError::Config`] if the token slice does not fit the digest
    pub fn build(self) -> Result<NonceService, NonceError> {
        if let Some(e) = self.key_error {
            return Err(e);
        }
        let digest = self
            .digest
            .ok_or_else(|| NonceError::environment("no secret key configured"))?;
        let slice = self.config.slice_range(digest.hex_len())?;

        Ok(NonceService {
            config: self.config,
            slice,
            digest,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            anonymous_hook: self
                .anonymous_hook
                .unwrap_or_else(|| Arc::new(KeepAnonymous)),
            failure_sink: self
                .failure_sink
                .unwrap_or_else(|| Arc::new(TracingFailureSink)),
        })
    }
}
