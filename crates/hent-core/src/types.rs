//! Token inputs and outputs.

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};

use crate::error::NonceError;

/// Maximum length of an action context in bytes.
pub const MAX_ACTION_CONTEXT_LEN: usize = 1024;

/// Maximum length of a session binding in bytes.
pub const MAX_SESSION_BINDING_LEN: usize = 1024;

/// Action context used when the caller names none.
pub const NO_ACTION: &str = "-1";

/// Names the operation a token protects, e.g. `delete-post:42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionContext(String);

impl ActionContext {
    /// Creates an action context.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::InvalidInput`] if the value exceeds
    /// [`MAX_ACTION_CONTEXT_LEN`].
    pub fn new(action: impl Into<String>) -> Result<Self, NonceError> {
        let action = action.into();
        if action.len() > MAX_ACTION_CONTEXT_LEN {
            return Err(NonceError::invalid_input(
                "action",
                format!(
                    "length {} exceeds maximum {MAX_ACTION_CONTEXT_LEN}",
                    action.len()
                ),
            ));
        }
        Ok(Self(action))
    }

    /// The unspecified action, rendered as `-1`.
    #[must_use]
    pub fn none() -> Self {
        Self(NO_ACTION.to_string())
    }

    /// Returns `true` for the unspecified action.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0 == NO_ACTION
    }

    /// The action as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ActionContext {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ActionContext {
    type Err = NonceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Identity of the requesting principal. `0` is anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ActorId(u64);

impl ActorId {
    /// The anonymous (logged-out) principal.
    pub const ANONYMOUS: Self = Self(0);

    /// Wraps a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` for the anonymous principal.
    #[must_use]
    pub const fn is_anonymous(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for ActorId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActorId {
    type Err = NonceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self).map_err(|e| {
            NonceError::invalid_input(
                "actor_id",
                format!("{s:?} is not a non-negative integer: {e}"),
            )
        })
    }
}

/// Secret tied to the actor's current session. Empty when there is none.
///
/// Never printed by `Debug`.
pub struct SessionBinding(SecretString);

impl SessionBinding {
    /// Creates a session binding.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::InvalidInput`] if the value exceeds
    /// [`MAX_SESSION_BINDING_LEN`].
    pub fn new(binding: impl Into<String>) -> Result<Self, NonceError> {
        let binding = binding.into();
        if binding.len() > MAX_SESSION_BINDING_LEN {
            return Err(NonceError::invalid_input(
                "session_binding",
                format!(
                    "length {} exceeds maximum {MAX_SESSION_BINDING_LEN}",
                    binding.len()
                ),
            ));
        }
        Ok(Self(SecretString::from(binding)))
    }

    /// No session.
    #[must_use]
    pub fn none() -> Self {
        Self(SecretString::from(String::new()))
    }

    /// Returns `true` if no session is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Default for SessionBinding {
    fn default() -> Self {
        Self::none()
    }
}

impl Clone for SessionBinding {
    fn clone(&self) -> Self {
        Self(SecretString::from(self.expose().to_string()))
    }
}

impl fmt::Debug for SessionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionBinding([REDACTED])")
    }
}

/// A resolved principal and its session.
#[derive(Debug, Clone, Default)]
pub struct Actor {
    /// Principal id.
    pub id: ActorId,
    /// Session secret.
    pub session: SessionBinding,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(id: ActorId, session: SessionBinding) -> Self {
        Self { id, session }
    }

    /// An anonymous actor without a session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// A derived nonce.
///
/// Compare candidates through the verifier, not with `==`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub(crate) const fn new(token: String) -> Self {
        Self(token)
    }

    /// The token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the token has no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the token, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_action_is_legacy_sentinel() {
        let action = ActionContext::default();
        assert_eq!(action.as_str(), "-1");
        assert!(action.is_none());
        assert!(!ActionContext::new("delete-post:42").unwrap().is_none());
    }

    #[test]
    fn test_overlong_action_rejected() {
        let long = "a".repeat(MAX_ACTION_CONTEXT_LEN + 1);
        assert!(matches!(
            ActionContext::new(long),
            Err(NonceError::InvalidInput { field: "action", .. })
        ));
        assert!(ActionContext::new("a".repeat(MAX_ACTION_CONTEXT_LEN)).is_ok());
    }

    #[test]
    fn test_actor_id_parse() {
        assert_eq!("7".parse::<ActorId>().unwrap(), ActorId::new(7));
        assert!("0".parse::<ActorId>().unwrap().is_anonymous());
        assert!(matches!(
            "-1".parse::<ActorId>(),
            Err(NonceError::InvalidInput { field: "actor_id", .. })
        ));
        assert!("7.0".parse::<ActorId>().is_err());
        assert!("".parse::<ActorId>().is_err());
    }

    #[test]
    fn test_session_binding_redacted() {
        let binding = SessionBinding::new("sess-abc").unwrap();
        assert_eq!(format!("{binding:?}"), "SessionBinding([REDACTED])");
        assert_eq!(binding.clone().expose(), "sess-abc");
        assert!(SessionBinding::none().is_empty());
    }

    #[test]
    fn test_overlong_session_rejected() {
        let long = "s".repeat(MAX_SESSION_BINDING_LEN + 1);
        assert!(SessionBinding::new(long).is_err());
    }
}
