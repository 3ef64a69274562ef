//! Host-supplied collaborators.
//!
//! The embedding system tells the nonce service who is asking, may remap
//! anonymous principals per action, and receives failed verifications for
//! audit. Each seam is a trait so tests can substitute fakes.

use std::sync::Mutex;

use crate::error::SinkError;
use crate::types::{ActionContext, Actor, ActorId, SessionBinding};

/// Resolves the requesting principal and its session secret.
pub trait ActorResolver: Send + Sync {
    /// Returns the current actor.
    fn current_actor(&self) -> Actor;
}

/// Resolver that always returns the same actor.
#[derive(Debug, Clone, Default)]
pub struct StaticActor(pub Actor);

impl ActorResolver for StaticActor {
    fn current_actor(&self) -> Actor {
        self.0.clone()
    }
}

/// Override for anonymous principals.
///
/// Invoked only when the actor id is [`ActorId::ANONYMOUS`], at most once
/// per issue or verify call.
pub trait AnonymousActorHook: Send + Sync {
    /// Returns the id to use for an anonymous actor performing `action`.
    fn resolve_anonymous(&self, action: &ActionContext) -> ActorId;
}

impl<F> AnonymousActorHook for F
where
    F: Fn(&ActionContext) -> ActorId + Send + Sync,
{
    fn resolve_anonymous(&self, action: &ActionContext) -> ActorId {
        self(action)
    }
}

/// Default hook: anonymous stays anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAnonymous;

impl AnonymousActorHook for KeepAnonymous {
    fn resolve_anonymous(&self, _action: &ActionContext) -> ActorId {
        ActorId::ANONYMOUS
    }
}

/// A verification that matched neither the current nor the previous window.
#[derive(Debug, Clone, Copy)]
pub struct VerificationFailure<'a> {
    /// The rejected candidate.
    pub candidate: &'a str,
    /// The action it was presented for.
    pub action: &'a ActionContext,
    /// The effective actor id (after the anonymous hook).
    pub actor: ActorId,
    /// The session it was checked against.
    pub session: &'a SessionBinding,
}

/// Receives failed verifications.
///
/// Fire-and-forget: errors are logged by the verifier and never change the
/// verification outcome. Implementations must not block.
pub trait VerificationFailureSink: Send + Sync {
    /// Records a failed verification.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the event could not be recorded.
    fn on_verification_failed(&self, failure: &VerificationFailure<'_>) -> Result<(), SinkError>;
}

/// Default sink: a `warn` event without the candidate or session secret.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFailureSink;

impl VerificationFailureSink for TracingFailureSink {
    fn on_verification_failed(&self, failure: &VerificationFailure<'_>) -> Result<(), SinkError> {
        tracing::warn!(
            action = %failure.action,
            actor = %failure.actor,
            candidate_len = failure.candidate.len(),
            has_session = !failure.session.is_empty(),
            "nonce verification failed"
        );
        Ok(())
    }
}

/// Owned copy of a [`VerificationFailure`], minus the session secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFailure {
    /// The rejected candidate.
    pub candidate: String,
    /// The action it was presented for.
    pub action: ActionContext,
    /// The effective actor id.
    pub actor: ActorId,
}

/// Sink that keeps failures in memory, for tests and audit buffers.
#[derive(Debug, Default)]
pub struct RecordingFailureSink {
    failures: Mutex<Vec<RecordedFailure>>,
}

impl RecordingFailureSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded failures.
    #[must_use]
    pub fn failures(&self) -> Vec<RecordedFailure> {
        self.failures
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VerificationFailureSink for RecordingFailureSink {
    fn on_verification_failed(&self, failure: &VerificationFailure<'_>) -> Result<(), SinkError> {
        let mut failures = self
            .failures
            .lock()
            .map_err(|_| SinkError::new("recording sink lock poisoned"))?;
        failures.push(RecordedFailure {
            candidate: failure.candidate.to_string(),
            action: failure.action.clone(),
            actor: failure.actor,
        });
        Ok(())
    }
}
