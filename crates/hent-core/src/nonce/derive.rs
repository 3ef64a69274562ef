//! Token derivation.

use secrecy::zeroize::Zeroizing;

use super::NonceService;
use crate::clock::TimeWindow;
use crate::error::NonceError;
use crate::types::{ActionContext, ActorId, SessionBinding, Token};

/// Field delimiter inside the hashed message.
const FIELD_DELIMITER: char = '|';

impl NonceService {
    /// Derives the token for an explicit window.
    ///
    /// The hashed message is `window|action|actor|session`. The session
    /// secret only lives in a zeroizing buffer.
    ///
    /// # Errors
    ///
    /// Returns [`NonceError::Environment`] if a custom digest produced less
    /// output than its declared width.
    pub fn derive(
        &self,
        window: TimeWindow,
        action: &ActionContext,
        actor: ActorId,
        session: &SessionBinding,
    ) -> Result<Token, NonceError> {
        let message = Zeroizing::new(format!(
            "{window}{d}{action}{d}{actor}{d}{session}",
            window = window.index(),
            action = action.as_str(),
            actor = actor.get(),
            session = session.expose(),
            d = FIELD_DELIMITER,
        ));
        let hex = Zeroizing::new(self.digest.digest_hex(message.as_bytes()));

        hex.get(self.slice.clone())
            .map(|slice| Token::new(slice.to_string()))
            .ok_or_else(|| {
                NonceError::environment(format!(
                    "digest produced {} characters, token slice needs {:?}",
                    hex.len(),
                    self.slice
                ))
            })
    }
}
