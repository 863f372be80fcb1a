//! Hierarchical conversion and merge of countries and their zones.

use std::num::NonZeroUsize;

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use roadnet_core::{MergeSummary, merge};
use roadnet_data::{ARCHIVE_EXTENSION, ConvertZone, ZoneJob, discover_zones};

use crate::PipelineError;

/// Inputs of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Countries in merge order.
    pub countries: Vec<String>,
    pub input_root: Utf8PathBuf,
    pub output_root: Utf8PathBuf,
    /// File name of the final archive under `output_root`.
    pub output_file_name: String,
    pub workers: NonZeroUsize,
}

/// Result of a country's zone merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryOutput {
    pub country: String,
    pub zones: usize,
    pub path: Utf8PathBuf,
    pub summary: MergeSummary,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub countries: Vec<CountryOutput>,
    pub output: Utf8PathBuf,
    pub summary: MergeSummary,
}

/// Discovers zones, converts them on a bounded pool and merges the results.
///
/// All countries are discovered before anything is converted. Zones of a
/// country convert in parallel; the first failure in zone order aborts the
/// run once the country's conversions have finished, before any merge of
/// that country. Zone archives merge in lexicographic zone order, country
/// archives in the order the countries were given.
#[derive(Debug)]
pub struct PipelineOrchestrator<C> {
    config: PipelineConfig,
    converter: C,
}

impl<C> PipelineOrchestrator<C>
where
    C: ConvertZone,
{
    #[must_use]
    pub const fn new(config: PipelineConfig, converter: C) -> Self {
        Self { config, converter }
    }

    /// Location of the final archive.
    #[must_use]
    pub fn output_path(&self) -> Utf8PathBuf {
        self.config.output_root.join(&self.config.output_file_name)
    }

    /// Run every stage. The worker pool lives for the duration of the call.
    pub fn run(&self) -> Result<PipelineReport, PipelineError> {
        let discovered = self.discover()?;
        let pool = self.worker_pool()?;

        let mut countries = Vec::with_capacity(discovered.len());
        for (country, zones) in &discovered {
            countries.push(self.convert_country(&pool, country, zones)?);
        }

        let output = self.output_path();
        let inputs: Vec<&Utf8Path> = countries.iter().map(|c| c.path.as_path()).collect();
        info!("merging {} countries into {output}", inputs.len());
        let summary = merge_into(&inputs, &output)?;
        Ok(PipelineReport {
            countries,
            output,
            summary,
        })
    }

    fn discover(&self) -> Result<Vec<(String, Vec<String>)>, PipelineError> {
        self.config
            .countries
            .iter()
            .map(|country| -> Result<(String, Vec<String>), PipelineError> {
                let zones = discover_zones(&self.config.input_root, country)?;
                info!("country {country}: {} zones to convert", zones.len());
                Ok((country.clone(), zones))
            })
            .collect()
    }

    fn worker_pool(&self) -> Result<ThreadPool, PipelineError> {
        let workers = self.config.workers.get();
        ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("roadnet-zone-{index}"))
            .build()
            .map_err(|source| PipelineError::WorkerPool { workers, source })
    }

    fn convert_country(
        &self,
        pool: &ThreadPool,
        country: &str,
        zones: &[String],
    ) -> Result<CountryOutput, PipelineError> {
        let jobs: Vec<ZoneJob> = zones
            .iter()
            .map(|zone| {
                ZoneJob::new(
                    country,
                    zone,
                    &self.config.input_root,
                    &self.config.output_root,
                )
            })
            .collect();

        let converter = &self.converter;
        let results: Vec<_> =
            pool.install(|| jobs.par_iter().map(|job| converter.convert(job)).collect());

        let mut zone_paths = Vec::with_capacity(results.len());
        for (job, result) in jobs.iter().zip(results) {
            let path = result.map_err(|source| PipelineError::Conversion {
                country: country.to_owned(),
                zone: job.zone.clone(),
                source: Box::new(source),
            })?;
            zone_paths.push(path);
        }

        let path = self
            .config
            .output_root
            .join(country)
            .join(format!("{country}.{ARCHIVE_EXTENSION}"));
        info!("country {country}: merging {} zones into {path}", zone_paths.len());
        let summary = merge_into(&zone_paths, &path)?;
        Ok(CountryOutput {
            country: country.to_owned(),
            zones: zone_paths.len(),
            path,
            summary,
        })
    }
}

fn merge_into<P>(inputs: &[P], output: &Utf8Path) -> Result<MergeSummary, PipelineError>
where
    P: AsRef<Utf8Path>,
{
    roadnet_fs::ensure_parent_dir(output).map_err(|source| PipelineError::OutputDir {
        path: output.to_path_buf(),
        source,
    })?;
    let std_inputs: Vec<&std::path::Path> =
        inputs.iter().map(|input| input.as_ref().as_std_path()).collect();
    merge(&std_inputs, output.as_std_path()).map_err(|source| PipelineError::Merge {
        output: output.to_path_buf(),
        source,
    })
}
