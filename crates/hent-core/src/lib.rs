//! # hent-core
//!
//! Time-windowed, context-bound keyed nonces.
//!
//! A nonce proves that a request was authorized recently, for one action, by
//! one actor, within one session. Tokens are derived, never stored: any
//! process holding the same secret key can verify a token another process
//! issued.
//!
//! ## Modules
//!
//! - [`nonce`]: [`NonceService`] with derive, issue and verify
//! - [`config`]: [`NonceConfig`] and its TOML form
//! - [`clock`]: injected clocks and [`TimeWindow`]
//! - [`collaborators`]: host-supplied actor resolution, anonymous override
//!   and failure reporting
//! - [`digest`]: the keyed hash and constant-time comparison
//!
//! ## Security Properties
//!
//! - Tokens are scoped to action, actor and session; changing any of them
//!   invalidates the token
//! - Comparison never short-circuits on a matching prefix
//! - The session binding and secret key are never logged or printed by
//!   `Debug`

pub mod clock;
pub mod collaborators;
pub mod config;
pub mod digest;
pub mod error;
pub mod key;
pub mod nonce;
pub mod types;

pub use clock::{Clock, FixedClock, ManualClock, SystemClock, TimeWindow};
pub use collaborators::{
    ActorResolver, AnonymousActorHook, KeepAnonymous, RecordedFailure, RecordingFailureSink,
    StaticActor, TracingFailureSink, VerificationFailure, VerificationFailureSink,
};
pub use config::{ConfigError, NonceConfig};
pub use digest::{HmacSha256Digest, KeyedDigest, constant_time_eq};
pub use error::{NonceError, SinkError};
pub use key::{DEFAULT_SECRET_KEY_ENV, SecretKey};
pub use nonce::{NonceService, NonceServiceBuilder, Verification};
pub use types::{ActionContext, Actor, ActorId, SessionBinding, Token};
