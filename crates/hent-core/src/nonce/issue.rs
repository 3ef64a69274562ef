//! Token issuance and window resolution.

use super::NonceService;
use crate::clock::TimeWindow;
use crate::collaborators::ActorResolver;
use crate::error::NonceError;
use crate::types::{ActionContext, ActorId, SessionBinding, Token};

impl NonceService {
    /// Issues a token for the current window.
    ///
    /// An anonymous `actor` is passed through the anonymous-actor hook first.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::Environment`] if the clock cannot be read.
    pub fn issue(
        &self,
        action: &ActionContext,
        actor: ActorId,
        session: &SessionBinding,
    ) -> Result<Token, NonceError> {
        let actor = self.effective_actor(action, actor);
        let window = self.current_window()?;
        let token = self.derive(window, action, actor, session)?;
        tracing::debug!(%window, %action, %actor, "issued nonce");
        Ok(token)
    }

    /// Issues a token for the actor reported by `resolver`.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::Environment`] if the clock cannot be read.
    pub fn issue_for(
        &self,
        resolver: &dyn ActorResolver,
        action: &ActionContext,
    ) -> Result<Token, NonceError> {
        let actor = resolver.current_actor();
        self.issue(action, actor.id, &actor.session)
    }

    /// The window the clock currently falls in.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::Environment`] if the clock cannot be read.
    pub fn current_window(&self) -> Result<TimeWindow, NonceError> {
        let now = self.clock.now_secs()?;
        self.window_at(now)
    }

    /// The window containing `now_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::InvalidInput`] only for a zero window length,
    /// which a built service never has.
    pub fn window_at(&self, now_secs: u64) -> Result<TimeWindow, NonceError> {
        TimeWindow::at(now_secs, self.config.window_seconds)
    }

    pub(super) fn effective_actor(&self, action: &ActionContext, actor: ActorId) -> ActorId {
        if actor.is_anonymous() {
            self.anonymous_hook.resolve_anonymous(action)
        } else {
            actor
        }
    }
}
