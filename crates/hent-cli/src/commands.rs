//! Subcommand implementations.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use hent_core::{
    ActionContext, ActorId, Clock, FixedClock, NonceConfig, NonceService, SecretKey,
    SessionBinding, SystemClock, TimeWindow, Verification,
};
use tracing::debug;

/// Loads the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<NonceConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading nonce configuration");
            NonceConfig::from_file(path)
                .with_context(|| format!("cannot use config file {}", path.display()))
        },
        None => Ok(NonceConfig::default()),
    }
}

/// Builds a service keyed with `secret_key`, pinned to `at` when given.
pub fn build_service(
    config: &NonceConfig,
    secret_key: Option<&str>,
    at: Option<u64>,
) -> Result<NonceService> {
    let secret_key = secret_key.with_context(|| {
        format!(
            "no secret key: pass --secret-key or set {}",
            hent_core::DEFAULT_SECRET_KEY_ENV
        )
    })?;
    let key = SecretKey::new(secret_key.as_bytes().to_vec())?;
    let clock: Arc<dyn Clock> = match at {
        Some(timestamp) => Arc::new(FixedClock::new(timestamp)),
        None => Arc::new(SystemClock),
    };

    NonceService::builder()
        .config(config.clone())
        .secret_key(&key)
        .clock(clock)
        .build()
        .context("failed to build nonce service")
}

fn parse_inputs(
    action: &str,
    actor: &str,
    session: &str,
) -> Result<(ActionContext, ActorId, SessionBinding)> {
    let action = ActionContext::new(action)?;
    let actor: ActorId = actor.parse()?;
    let session = SessionBinding::new(session)?;
    Ok((action, actor, session))
}

/// Prints a freshly issued token.
pub fn issue(service: &NonceService, action: &str, actor: &str, session: &str) -> Result<ExitCode> {
    let (action, actor, session) = parse_inputs(action, actor, session)?;
    let token = service.issue(&action, actor, &session)?;
    println!("{token}");
    Ok(ExitCode::SUCCESS)
}

/// Prints the verification outcome. Exits 1 when the token is invalid.
pub fn verify(
    service: &NonceService,
    token: &str,
    action: &str,
    actor: &str,
    session: &str,
) -> Result<ExitCode> {
    let (action, actor, session) = parse_inputs(action, actor, session)?;
    let outcome = service.verify(token, &action, actor, &session)?;
    println!("{outcome}");
    Ok(ExitCode::from(exit_status(outcome)))
}

/// Prints the window containing `at` (or now).
pub fn window(config: &NonceConfig, at: Option<u64>) -> Result<ExitCode> {
    let now = match at {
        Some(timestamp) => timestamp,
        None => SystemClock.now_secs()?,
    };
    let window = TimeWindow::at(now, config.window_seconds)?;
    println!("{window}");
    Ok(ExitCode::SUCCESS)
}

/// Prints the effective configuration.
pub fn print_config(config: &NonceConfig) -> Result<ExitCode> {
    print!("{}", config.to_toml()?);
    Ok(ExitCode::SUCCESS)
}

const fn exit_status(outcome: Verification) -> u8 {
    if outcome.is_accepted() { 0 } else { 1 }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_build_service_requires_key() {
        let err = build_service(&NonceConfig::default(), None, Some(0)).unwrap_err();
        assert!(err.to_string().contains("no secret key"));
    }

    #[test]
    fn test_pinned_issue_verify_round_trip() {
        let config = NonceConfig::default().with_window_seconds(100);
        let service = build_service(&config, Some("K"), Some(100_000)).unwrap();
        let (action, actor, session) = parse_inputs("delete-post:42", "7", "sess-abc").unwrap();
        let token = service.issue(&action, actor, &session).unwrap();

        let later = build_service(&config, Some("K"), Some(100_100)).unwrap();
        assert_eq!(
            later.verify(token.as_str(), &action, actor, &session).unwrap(),
            Verification::ValidStale
        );
    }

    #[test]
    fn test_parse_inputs_rejects_bad_actor() {
        assert!(parse_inputs("x", "-7", "").is_err());
        assert!(parse_inputs("x", "seven", "").is_err());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "window_seconds = 60").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.window_seconds, 60);
        assert_eq!(load_config(None).unwrap(), NonceConfig::default());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_status(Verification::Valid), 0);
        assert_eq!(exit_status(Verification::ValidStale), 0);
        assert_eq!(exit_status(Verification::Invalid), 1);
    }
}
