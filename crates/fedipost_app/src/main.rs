mod cli;
mod platform;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use platform::logging::{self, LogDestination};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let destination = match &cli.log_file {
        Some(path) => LogDestination::TerminalAndFile(path.clone()),
        None => LogDestination::Terminal,
    };
    logging::initialize(
        destination,
        fedipost_logging::level_for_verbosity(cli.verbose),
    );

    match platform::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            failure.log();
            failure.exit_code()
        }
    }
}
