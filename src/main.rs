//! Entry point for the `prompt` CLI.
//!
//! Parses arguments, configures logging, dispatches to the command handler,
//! and maps errors to exit codes.

use env_logger::Env;
use log::LevelFilter;
use prompt_template::cli::Cli;
use prompt_template::{commands, exit_codes};
use std::process::ExitCode;

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        _ => {
            builder.filter_level(LevelFilter::Debug);
        }
    }
    builder.format_timestamp(None).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    match commands::dispatch(cli.command, &cli.paths) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
