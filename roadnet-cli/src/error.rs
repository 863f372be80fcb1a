//! Error types emitted by the pipeline and the command line.

use std::sync::Arc;

use camino::Utf8PathBuf;
use roadnet_core::MergeError;
use roadnet_data::{ConversionError, DiscoveryError};
use thiserror::Error;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A country could not be discovered; nothing was converted.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    /// The worker pool could not be started.
    #[error("failed to start {workers} conversion workers: {source}")]
    WorkerPool {
        workers: usize,
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
    /// A zone conversion failed; its country was not merged.
    #[error("conversion of zone {zone} in {country} failed: {source}")]
    Conversion {
        country: String,
        zone: String,
        #[source]
        source: Box<ConversionError>,
    },
    /// A merge failed.
    #[error("failed to merge {output}: {source}")]
    Merge {
        output: Utf8PathBuf,
        #[source]
        source: MergeError,
    },
    /// An output directory could not be created.
    #[error("failed to create {path}: {source}")]
    OutputDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors emitted by the command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// The country list holds no country codes.
    #[error("no countries given in {0:?}")]
    NoCountries(String),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A settings entry does not have the expected shape.
    #[error("invalid {field} setting {value:?}")]
    InvalidSetting { field: &'static str, value: String },
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
