//! # tydoc CLI entry point
//!
//! Parses command-line arguments, loads configuration, installs logging and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tydoc_cli::check::{run_check, CheckArgs};
use tydoc_cli::collection::{run_collection, CollectionArgs};
use tydoc_cli::config::{CliConfig, LogFormat, OutputStyle};
use tydoc_cli::exists::{run_exists, ExistsArgs};
use tydoc_cli::EXIT_FAILURE;

/// Typed JSON documents: schema merge, constraint checks and collection
/// reconciliation.
#[derive(Parser, Debug)]
#[command(name = "tydoc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print JSON on a single line. Overrides `TYDOC_OUTPUT`.
    #[arg(long, global = true)]
    compact: bool,

    /// Emit logs as JSON. Overrides `TYDOC_LOG_FORMAT`.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge a document into a schema and check its typed leaves.
    Check(CheckArgs),

    /// Validate a collection and reconcile it with a previous revision.
    Collection(CollectionArgs),

    /// Test whether a collection has a member with the given id.
    Exists(ExistsArgs),
}

impl Cli {
    /// Apply flags on top of the environment configuration.
    fn configure(&self, mut config: CliConfig) -> CliConfig {
        if self.compact {
            config.output = OutputStyle::Compact;
        }
        if self.json_logs {
            config.log_format = LogFormat::Json;
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => cli.configure(config),
        Err(e) => {
            eprintln!("tydoc: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    init_tracing(cli.verbose, config.log_format);
    tracing::debug!(?config, "tydoc starting");

    let result = match &cli.command {
        Commands::Check(args) => run_check(args, &config),
        Commands::Collection(args) => run_collection(args, &config),
        Commands::Exists(args) => run_exists(args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// `RUST_LOG` wins over the verbosity flags when set.
fn env_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity_level(verbose)))
}

fn verbosity_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8, format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
