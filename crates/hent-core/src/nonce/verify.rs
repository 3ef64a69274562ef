//! Token verification.

use std::fmt;

use super::NonceService;
use crate::collaborators::{ActorResolver, VerificationFailure};
use crate::digest::constant_time_eq;
use crate::error::NonceError;
use crate::types::{ActionContext, ActorId, SessionBinding};

/// Outcome of checking a candidate token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verification {
    /// Issued in the current window.
    Valid,
    /// Issued in the previous window.
    ValidStale,
    /// Matches neither window, or empty.
    Invalid,
}

impl Verification {
    /// Returns `true` for [`Verification::Valid`] and
    /// [`Verification::ValidStale`].
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Valid | Self::ValidStale)
    }

    /// The legacy integer code: `1` current window, `2` previous window,
    /// `0` invalid.
    #[must_use]
    pub const fn legacy_code(self) -> u8 {
        match self {
            Self::Valid => 1,
            Self::ValidStale => 2,
            Self::Invalid => 0,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::ValidStale => "valid-stale",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NonceService {
    /// Checks `candidate` against the current and previous windows.
    ///
    /// An empty candidate is rejected before any hashing and is not reported
    /// to the failure sink. Any other mismatch is reported to the sink; sink
    /// errors are logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::Environment`] if the clock cannot be read.
    /// Mismatches are never errors.
    pub fn verify(
        &self,
        candidate: &str,
        action: &ActionContext,
        actor: ActorId,
        session: &SessionBinding,
    ) -> Result<Verification, NonceError> {
        // Resolved once: both windows must see the same id.
        let actor = self.effective_actor(action, actor);

        if candidate.is_empty() {
            tracing::debug!(%action, %actor, "rejected empty nonce");
            return Ok(Verification::Invalid);
        }

        let window = self.current_window()?;

        let expected = self.derive(window, action, actor, session)?;
        if constant_time_eq(expected.as_str(), candidate) {
            tracing::debug!(%window, %action, %actor, "nonce valid");
            return Ok(Verification::Valid);
        }

        let previous = window.previous();
        let expected = self.derive(previous, action, actor, session)?;
        if constant_time_eq(expected.as_str(), candidate) {
            tracing::debug!(window = %previous, %action, %actor, "nonce valid from previous window");
            return Ok(Verification::ValidStale);
        }

        self.report_failure(&VerificationFailure {
            candidate,
            action,
            actor,
            session,
        });
        Ok(Verification::Invalid)
    }

    /// Verifies for the actor reported by `resolver`.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::Environment`] if the clock cannot be read.
    pub fn verify_for(
        &self,
        resolver: &dyn ActorResolver,
        candidate: &str,
        action: &ActionContext,
    ) -> Result<Verification, NonceError> {
        let actor = resolver.current_actor();
        self.verify(candidate, action, actor.id, &actor.session)
    }

    fn report_failure(&self, failure: &VerificationFailure<'_>) {
        if let Err(e) = self.failure_sink.on_verification_failed(failure) {
            tracing::warn!(
                action = %failure.action,
                actor = %failure.actor,
                error = %e,
                "failed to report nonce verification failure"
            );
        }
    }
}
