// ZenithScan - local security-posture scanner

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use zenithscan::cli::{Cli, Commands};
use zenithscan::output;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Scan(cmd) => {
            let settings = cli.load_settings().context("failed to load settings")?;
            cmd.execute(&settings, cli.verbose, cli.quiet).await?;
        }
        Commands::Settings(cmd) => cmd.execute(cli.config.as_deref(), cli.quiet)?,
        Commands::Services(cmd) => cmd.execute()?,
    }
    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default = match (verbose, quiet) {
        (true, _) => "info",
        (_, true) => "error",
        _ => "warn",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
