//! Fuzz harness for `NonceService::verify`.
//!
//! Feeds arbitrary candidate tokens, actions and session bindings through the
//! verifier. The verifier must never panic, must never accept a candidate of
//! the wrong length, and must reject the empty candidate.

#![no_main]
use std::sync::{Arc, LazyLock};

use hent_core::{
    ActionContext, ActorId, FixedClock, NonceConfig, NonceService, SecretKey, SessionBinding,
    Verification,
};
use libfuzzer_sys::fuzz_target;

static SERVICE: LazyLock<NonceService> = LazyLock::new(|| {
    let key = SecretKey::new(b"fuzz-key".to_vec()).expect("static key is non-empty");
    NonceService::builder()
        .config(NonceConfig::default().with_window_seconds(60))
        .secret_key(&key)
        .clock(Arc::new(FixedClock::new(1_700_000_000)))
        .build()
        .expect("default config is valid")
});

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut parts = text.splitn(4, '\u{0}');
    let candidate = parts.next().unwrap_or_default();
    let action = parts.next().unwrap_or_default();
    let session = parts.next().unwrap_or_default();
    let actor = parts
        .next()
        .map_or(0, |rest| rest.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b))));

    let (Ok(action), Ok(session)) = (ActionContext::new(action), SessionBinding::new(session)) else {
        return;
    };

    let outcome = SERVICE
        .verify(candidate, &action, ActorId::new(actor), &session)
        .expect("fixed clock never fails");

    if candidate.len() != SERVICE.config().token_length {
        assert_eq!(outcome, Verification::Invalid);
    }

    let token = SERVICE
        .issue(&action, ActorId::new(actor), &session)
        .expect("fixed clock never fails");
    assert_eq!(
        SERVICE
            .verify(token.as_str(), &action, ActorId::new(actor), &session)
            .expect("fixed clock never fails"),
        Verification::Valid
    );
});
