use clap::Parser;
use std::process::ExitCode;
use typesort::cli::{Cli, run_cli};
use typesort::output::OutputFormatter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_cli(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}
