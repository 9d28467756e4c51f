mod cli;
mod output;

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use iris_verifysort::SortVerifier;
use iris_verifysort::segment::snapshot::load_index;

use crate::cli::Cli;

/// Exit status when the index cannot be loaded.
const EXIT_LOAD_FAILURE: u8 = 2;

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_LOAD_FAILURE)
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    let index = load_index(&cli.index)
        .with_context(|| format!("Failed to load index from {}", cli.index.display()))?;

    let outcome = SortVerifier::new(cli.options()).verify(&index);
    output::print_outcome(&outcome, cli.format);

    Ok(outcome.exit_code())
}

/// Log to stderr so that the report on stdout stays machine-readable.
fn init_logging() {
    let ansi = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
