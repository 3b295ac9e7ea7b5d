use std::process::ExitCode;

use ankiflow::cli::{
    self,
    args::Cli,
    output::print_error,
};
use clap::Parser;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli::run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(&error.to_string());
            ExitCode::FAILURE
        }
    }
}
