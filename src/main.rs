use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tandem::cli::{run_cli, Cli};
use tandem::commands::Outcome;
use tandem::logging::init_logging;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run_cli(cli)? {
        Outcome::Locked { .. } | Outcome::CheckPassed => Ok(ExitCode::SUCCESS),
        Outcome::CheckFailed { .. } => Ok(ExitCode::FAILURE),
    }
}
