//! # idemix CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Every subcommand sets up the provider from `--dir` under `--name` first.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use idemix_cli::inspect::{run_inspect, InspectArgs};
use idemix_cli::principal::{run_check_principal, CheckPrincipalArgs};
use idemix_cli::signing::{run_sign, run_verify, SignArgs, VerifyArgs};

/// Anonymous-credential provider toolkit.
///
/// Loads a provider configuration directory (`msp/IssuerPublicKey` and an
/// optional `user/SignerConfig`), then signs, verifies, and evaluates
/// principals with it.
#[derive(Parser, Debug)]
#[command(name = "idemix", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Provider configuration directory.
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Provider name (MSP identifier).
    #[arg(long, global = true)]
    name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the issuer key schema and default signer as JSON.
    Inspect(InspectArgs),

    /// Sign a message with the default signer.
    Sign(SignArgs),

    /// Verify a signature against a serialized identity.
    Verify(VerifyArgs),

    /// Evaluate a ROLE, OU, or IDENTITY principal against a serialized identity.
    #[command(name = "check-principal")]
    CheckPrincipal(CheckPrincipalArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let Some(name) = cli.name.as_deref() else {
        tracing::error!("--name is required");
        return ExitCode::from(2);
    };

    tracing::debug!(dir = %cli.dir.display(), msp = %name, "idemix CLI starting");

    let result = match &cli.command {
        Commands::Inspect(args) => run_inspect(args, &cli.dir, name),
        Commands::Sign(args) => run_sign(args, &cli.dir, name),
        Commands::Verify(args) => run_verify(args, &cli.dir, name),
        Commands::CheckPrincipal(args) => run_check_principal(args, &cli.dir, name),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
