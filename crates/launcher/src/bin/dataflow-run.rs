//! dataflow-run binary entry point
//!
//! Resolves the worker configuration and prints it to stdout as JSON.
//! Exits with status 2 on any configuration error.

use std::process::ExitCode;

use clap::Parser;

use launcher::{init_tracing, resolve, write_config, Args};
use worker_config::SystemSource;

fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    let config = match resolve(&args, SystemSource) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(input = %e.raw_input(), "Configuration error: {}", e);
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = write_config(&config, std::io::stdout().lock()) {
        tracing::error!("Failed to write configuration: {:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
