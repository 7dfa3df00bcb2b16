//! combine-prs CLI entry point

mod cli;

use clap::Parser;
use cli::Cli;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "combine_prs=debug"
    } else {
        "combine_prs=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli::run::run_combine(cli).await {
        Ok(code) => code,
        Err(e) => {
            cli::report_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
