use std::process::ExitCode;

use clap::Parser;

mod cli;
mod configuration;
mod error;

use crate::cli::Cli;
use crate::error::CliError;

fn main() -> ExitCode {
    // Enable basic logging; set RUST_LOG=debug for visibility.
    env_logger::init();

    let cli = Cli::parse();

    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            if let CliError::MissingPrefix(usage) = e {
                eprintln!();
                eprintln!("Usage:");
                eprintln!("  {}", usage.synopsis());
                eprintln!();
                eprintln!("You can also provide the prefix via the CYBERTOKEN_PREFIX environment variable.");
                eprintln!("For example:");
                eprintln!("  {}", usage.env_example());
            }
            e.exit_code()
        }
    }
}
