//! Command line client for the Mail-in-a-Box admin API.
//!
//! Credentials resolve from flags, the `MIABCTL_*` environment variables or
//! a TOML config file (see [`settings`]); the actual API work lives in
//! `miabctl-client`. The process prints errors to stderr and exits
//! non-zero; nothing below the command layer terminates the process.

mod commands;
mod settings;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(
    name = "miabctl",
    version,
    about = "A command line client for the Mail-in-a-Box admin API",
    long_about = "A command line client for the Mail-in-a-Box admin API.\n\
                  Mail-in-a-Box can be found at https://mailinabox.email"
)]
struct Cli {
    #[command(flatten)]
    connection: settings::ConnectionArgs,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go to stderr so stdout stays clean for rendered output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .init();

    let cli = Cli::parse();

    let config = match settings::resolve(&cli.connection) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    match commands::run(&config, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
