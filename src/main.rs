//! stable-pick CLI entry point

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli::run_pick(&cli).await {
        Ok(()) => ExitCode::from(stable_pick::error::EXIT_OK),
        Err(e) => {
            anstream::eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
