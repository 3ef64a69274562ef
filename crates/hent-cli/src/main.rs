//! hent - issue and verify keyed nonces from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

/// hent - time-windowed, context-bound keyed nonces
#[derive(Parser, Debug)]
#[command(name = "hent")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a nonce configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Application secret key
    #[arg(long, env = hent_core::DEFAULT_SECRET_KEY_ENV, hide_env_values = true)]
    secret_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue a token for the current window
    Issue(TokenArgs),

    /// Verify a token against the current and previous windows
    Verify {
        /// Candidate token
        token: String,

        #[command(flatten)]
        args: TokenArgs,
    },

    /// Print the current time window
    Window {
        /// Unix timestamp to evaluate instead of now
        #[arg(long)]
        at: Option<u64>,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Inputs shared by `issue` and `verify`.
#[derive(Args, Debug)]
struct TokenArgs {
    /// Action the token protects
    #[arg(short, long, default_value = hent_core::types::NO_ACTION, allow_hyphen_values = true)]
    action: String,

    /// Actor id (0 for anonymous)
    #[arg(long, default_value = "0")]
    actor: String,

    /// Session binding secret
    #[arg(long, env = "HENT_SESSION", hide_env_values = true, default_value = "")]
    session: String,

    /// Unix timestamp to use instead of now
    #[arg(long)]
    at: Option<u64>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        },
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = commands::load_config(cli.config.as_deref())
        .context("failed to load nonce configuration")?;

    match cli.command {
        Commands::Issue(args) => {
            let service = commands::build_service(&config, cli.secret_key.as_deref(), args.at)?;
            commands::issue(&service, &args.action, &args.actor, &args.session)
        },
        Commands::Verify { token, args } => {
            let service = commands::build_service(&config, cli.secret_key.as_deref(), args.at)?;
            commands::verify(
                &service,
                &token,
                &args.action,
                &args.actor,
                &args.session,
            )
        },
        Commands::Window { at } => commands::window(&config, at),
        Commands::Config => commands::print_config(&config),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_verify() {
        let cli = Cli::try_parse_from([
            "hent",
            "--secret-key",
            "K",
            "verify",
            "0123456789abcdef",
            "--action",
            "delete-post:42",
            "--actor",
            "7",
            "--session",
            "sess-abc",
            "--at",
            "100000",
        ])
        .unwrap();

        match cli.command {
            Commands::Verify { token, args } => {
                assert_eq!(token, "0123456789abcdef");
                assert_eq!(args.action, "delete-post:42");
                assert_eq!(args.actor, "7");
                assert_eq!(&args.session, "sess-abc");
                assert_eq!(args.at, Some(100_000));
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_default_action_is_sentinel() {
        let cli = Cli::try_parse_from(["hent", "issue"]).unwrap();
        match cli.command {
            Commands::Issue(args) => {
                assert_eq!(args.action, "-1");
                assert_eq!(args.actor, "0");
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
