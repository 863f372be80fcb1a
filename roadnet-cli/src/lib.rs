//! Command-line interface of the road-network converter.
#![forbid(unsafe_code)]

mod error;
mod pipeline;
mod settings;

use std::{ffi::OsString, num::NonZeroUsize};

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use roadnet_data::ShapefileConversion;

pub use error::{CliError, PipelineError};
pub use pipeline::{CountryOutput, PipelineConfig, PipelineOrchestrator, PipelineReport};

use settings::SettingsArgs;

/// Run the converter with the current process arguments and environment.
pub fn run() -> Result<PipelineReport, CliError> {
    run_with(std::env::args_os())
}

/// Run the converter with explicit arguments.
///
/// Tag derivation settings are merged from configuration files and
/// `ROADNET_*` environment variables beneath the flags in `args`.
pub fn run_with<I, T>(args: I) -> Result<PipelineReport, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cli = Cli::try_parse_from(args)?;
    let settings = std::mem::take(&mut cli.settings).into_settings()?;
    let config = cli.into_config()?;
    info!(
        "converting {} with {} workers into {}",
        config.countries.join(","),
        config.workers,
        config.output_root.join(&config.output_file_name)
    );
    let report = PipelineOrchestrator::new(config, ShapefileConversion::new(settings)).run()?;
    Ok(report)
}

#[derive(Debug, Parser)]
#[command(
    name = "roadnet",
    about = "Convert road-network shapefiles into a consolidated feature archive",
    version
)]
struct Cli {
    /// Comma-separated country directory names, merged in this order.
    #[arg(value_name = "COUNTRIES")]
    countries: String,
    /// Directory holding one sub-directory per country.
    #[arg(value_name = "INPUT_ROOT")]
    input_root: Utf8PathBuf,
    /// Directory receiving per-zone, per-country and final archives.
    #[arg(value_name = "OUTPUT_ROOT")]
    output_root: Utf8PathBuf,
    /// File name of the final archive inside the output directory.
    #[arg(value_name = "OUTPUT_FILE")]
    output_file_name: String,
    /// Number of zones converted concurrently.
    #[arg(value_name = "WORKERS")]
    workers: NonZeroUsize,
    #[command(flatten)]
    settings: SettingsArgs,
}

impl Cli {
    fn into_config(self) -> Result<PipelineConfig, CliError> {
        let countries = parse_countries(&self.countries);
        if countries.is_empty() {
            return Err(CliError::NoCountries(self.countries));
        }
        Ok(PipelineConfig {
            countries,
            input_root: self.input_root,
            output_root: self.output_root,
            output_file_name: self.output_file_name,
            workers: self.workers,
        })
    }
}

/// Split a comma-separated country list, trimming blanks.
fn parse_countries(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|country| !country.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests;
