//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use std::error::Error;

use env_logger::Env;
use roadnet_cli::CliError;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    match roadnet_cli::run() {
        Ok(report) => {
            log::info!(
                "wrote {} ({} elements from {} countries)",
                report.output,
                report.summary.total(),
                report.countries.len()
            );
        }
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("roadnet: {err}");
            let mut cause = err.source();
            while let Some(inner) = cause {
                eprintln!("  caused by: {inner}");
                cause = inner.source();
            }
            std::process::exit(1);
        }
    }
}
