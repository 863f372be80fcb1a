//! Stub zone conversion and input trees for orchestrator tests.

use super::*;
use roadnet_core::{ArchiveWriter, Element, ElementSink, Tags, Way, read_archive};
use roadnet_data::{ConversionError, ConvertZone, ZoneJob};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    sync::{Arc, Mutex},
};
use tempfile::TempDir;

pub(super) struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub(super) fn zones(&self) -> Vec<String> {
        self.0.lock().expect("calls lock").clone()
    }
}

/// Writes a one-way archive per zone instead of reading shapefiles.
#[derive(Debug, Default)]
pub(super) struct StubConversion {
    ways: BTreeMap<String, Vec<i64>>,
    failing: BTreeSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubConversion {
    pub(super) fn with_ways(mut self, zone: &str, ids: &[i64]) -> Self {
        self.ways.insert(zone.to_owned(), ids.to_vec());
        self
    }

    pub(super) fn failing(mut self, zone: &str) -> Self {
        self.failing.insert(zone.to_owned());
        self
    }

    /// Shared record of converted zones, readable after the stub is moved.
    pub(super) fn call_log(&self) -> CallLog {
        CallLog(Arc::clone(&self.calls))
    }
}

impl ConvertZone for StubConversion {
    fn convert(&self, job: &ZoneJob) -> Result<Utf8PathBuf, ConversionError> {
        self.calls.lock().expect("calls lock").push(job.zone.clone());
        if self.failing.contains(&job.zone) {
            return Err(ConversionError::MissingId {
                zone: job.zone.clone(),
            });
        }
        let path = job.output_path();
        roadnet_fs::ensure_parent_dir(&path).map_err(|source| ConversionError::Io {
            path: path.clone(),
            source,
        })?;
        let mut writer = ArchiveWriter::create(path.as_std_path())?;
        for &id in self.ways.get(&job.zone).into_iter().flatten() {
            writer.append(&way(id))?;
        }
        writer.finish()?;
        Ok(path)
    }
}

pub(super) fn way(id: i64) -> Element {
    Element::Way(Way {
        id,
        nodes: Vec::new(),
        tags: Tags::new(),
    })
}

/// Temporary input and output roots.
pub(super) struct Workspace {
    _dir: TempDir,
    pub(super) input_root: Utf8PathBuf,
    pub(super) output_root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
        Self {
            input_root: root.join("input"),
            output_root: root.join("output"),
            _dir: dir,
        }
    }

    /// Create a network theme file so discovery finds `zone` in `country`.
    pub(super) fn add_zone(&self, country: &str, zone: &str) {
        self.add_file(country, &format!("{zone}___________nw.shp"));
    }

    pub(super) fn add_file(&self, country: &str, name: &str) {
        let dir = self.input_root.join(country);
        fs::create_dir_all(&dir).expect("create country dir");
        fs::write(dir.join(name), b"").expect("write input file");
    }

    pub(super) fn config(&self, countries: &[&str]) -> PipelineConfig {
        PipelineConfig {
            countries: countries.iter().map(|&c| c.to_owned()).collect(),
            input_root: self.input_root.clone(),
            output_root: self.output_root.clone(),
            output_file_name: "europe.osm.pbf".to_owned(),
            workers: NonZeroUsize::new(2).expect("non-zero"),
        }
    }
}

/// Way ids of an archive in file order.
pub(super) fn way_ids(path: &Utf8Path) -> Vec<i64> {
    read_archive(path.as_std_path())
        .expect("read archive")
        .iter()
        .map(Element::id)
        .collect()
}
