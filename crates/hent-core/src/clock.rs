//! Clock abstraction and time windows.
//!
//! Token freshness is decided by coarse windows, never by raw timestamps:
//!
//! ```text
//! window = floor(now_secs / window_seconds)
//! ```
//!
//! Time-dependent operations take an injected [`Clock`] instead of reading
//! `SystemTime` directly so tests can pin or advance time.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::NonceError;

/// Source of wall-clock time.
pub trait Clock: Send + Sync {
    /// Returns the current Unix timestamp in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::Environment`] if the time cannot be read.
    fn now_secs(&self) -> Result<u64, NonceError>;
}

/// System clock backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> Result<u64, NonceError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| NonceError::environment(format!("system clock is before the UNIX epoch: {e}")))
    }
}

/// Clock that always returns the same timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// The fixed timestamp to return.
    pub timestamp: u64,
}

impl FixedClock {
    /// Creates a new fixed clock with the given timestamp.
    #[must_use]
    pub const fn new(timestamp: u64) -> Self {
        Self { timestamp }
    }
}

impl Clock for FixedClock {
    fn now_secs(&self) -> Result<u64, NonceError> {
        Ok(self.timestamp)
    }
}

/// Clock that only moves when told to. Shareable across threads.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a clock reading `timestamp`.
    #[must_use]
    pub const fn new(timestamp: u64) -> Self {
        Self {
            now: AtomicU64::new(timestamp),
        }
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    /// Sets the clock to `timestamp`.
    pub fn set(&self, timestamp: u64) {
        self.now.store(timestamp, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> Result<u64, NonceError> {
        Ok(self.now.load(Ordering::SeqCst))
    }
}

/// Index of a fixed-length time bucket.
///
/// Any `i64` is a legal window for derivation, including negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeWindow(i64);

impl TimeWindow {
    /// Wraps a raw window index.
    #[must_use]
    pub const fn new(index: i64) -> Self {
        Self(index)
    }

    /// Window containing `now_secs` for a window length of `window_seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::InvalidInput`] if `window_seconds` is zero.
    pub fn at(now_secs: u64, window_seconds: u64) -> Result<Self, NonceError> {
        if window_seconds == 0 {
            return Err(NonceError::invalid_input(
                "window_seconds",
                "must be at least 1",
            ));
        }
        // Overflows i64 only when window_seconds == 1.
        let index = i64::try_from(now_secs / window_seconds).unwrap_or(i64::MAX);
        Ok(Self(index))
    }

    /// The raw index.
    #[must_use]
    pub const fn index(self) -> i64 {
        self.0
    }

    /// The immediately preceding window.
    #[must_use]
    pub const fn previous(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TimeWindow {
    type Err = NonceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| NonceError::invalid_input("window", format!("{s:?} is not an integer: {e}")))
    }
}
