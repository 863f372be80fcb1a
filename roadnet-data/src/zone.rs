//! Zone identity, output layout and source file lookup.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Extension of every feature archive written by the pipeline.
///
/// The name follows the distribution's output layout; the files themselves
/// are `RNFA` bincode archives, not Protobuf-encoded OSM PBF.
pub const ARCHIVE_EXTENSION: &str = "osm.pbf";

/// Sub-directory of a country's output holding per-zone archives.
pub const ZONE_OUTPUT_DIR: &str = "pbfFiles";

/// Scratch directory under the output root.
pub const SCRATCH_DIR: &str = "splitter";

/// Everything needed to convert one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneJob {
    pub country: String,
    pub zone: String,
    /// Country directory holding the zone's source files.
    pub input_dir: Utf8PathBuf,
    /// Country output directory; the zone archive lands in its `pbfFiles/`.
    pub output_dir: Utf8PathBuf,
    /// Directory for partially written archives.
    pub scratch_dir: Utf8PathBuf,
}

impl ZoneJob {
    /// Job for `zone` of `country` using the standard directory layout.
    ///
    /// # Examples
    /// ```
    /// use camino::Utf8Path;
    /// use roadnet_data::ZoneJob;
    ///
    /// let job = ZoneJob::new("and", "andorra", Utf8Path::new("/in"), Utf8Path::new("/out"));
    /// assert_eq!(job.input_dir, "/in/and");
    /// assert_eq!(job.output_path(), "/out/and/pbfFiles/andorra.osm.pbf");
    /// assert_eq!(job.scratch_path(), "/out/splitter/andorra.osm.pbf.partial");
    /// ```
    #[must_use]
    pub fn new(country: &str, zone: &str, input_root: &Utf8Path, output_root: &Utf8Path) -> Self {
        Self {
            country: country.to_owned(),
            zone: zone.to_owned(),
            input_dir: input_root.join(country),
            output_dir: output_root.join(country),
            scratch_dir: output_root.join(SCRATCH_DIR),
        }
    }

    /// Final location of the zone archive.
    #[must_use]
    pub fn output_path(&self) -> Utf8PathBuf {
        self.output_dir
            .join(ZONE_OUTPUT_DIR)
            .join(format!("{}.{ARCHIVE_EXTENSION}", self.zone))
    }

    /// Location of the archive while it is being written.
    #[must_use]
    pub fn scratch_path(&self) -> Utf8PathBuf {
        self.scratch_dir
            .join(format!("{}.{ARCHIVE_EXTENSION}.partial", self.zone))
    }

    /// Source file lookup for this zone.
    pub fn folder(&self) -> Result<ZoneFolder, FolderError> {
        ZoneFolder::open(&self.input_dir, &self.zone)
    }
}

/// Errors raised while listing a zone's folder.
#[derive(Debug, Error)]
#[error("failed to list zone folder {path}: {source}")]
pub struct FolderError {
    /// Directory that could not be listed.
    pub path: Utf8PathBuf,
    #[source]
    pub source: io::Error,
}

/// Resolves logical table names to a zone's files.
///
/// Files are named `<zone>`, one or more underscores, then the table name,
/// e.g. `andorra___________nw.shp` for table `nw.shp` of zone `andorra`.
#[derive(Debug, Clone)]
pub struct ZoneFolder {
    dir: Utf8PathBuf,
    zone: String,
    files: Vec<String>,
}

impl ZoneFolder {
    /// List `dir` once and keep the names belonging to `zone`.
    pub fn open(dir: &Utf8Path, zone: &str) -> Result<Self, FolderError> {
        let files = roadnet_fs::list_file_names(dir).map_err(|source| FolderError {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self::from_names(dir, zone, files))
    }

    /// Lookup over an explicit list of file names.
    #[must_use]
    pub fn from_names(dir: &Utf8Path, zone: &str, names: Vec<String>) -> Self {
        let files = names
            .into_iter()
            .filter(|name| table_name(name, zone).is_some())
            .collect();
        Self {
            dir: dir.to_path_buf(),
            zone: zone.to_owned(),
            files,
        }
    }

    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Path of the file holding `table`, if the zone has one.
    #[must_use]
    pub fn resolve(&self, table: &str) -> Option<Utf8PathBuf> {
        self.files
            .iter()
            .find(|name| table_name(name, &self.zone) == Some(table))
            .map(|name| self.dir.join(name))
    }

    /// Whether the zone has a file for `table`.
    #[must_use]
    pub fn contains(&self, table: &str) -> bool {
        self.resolve(table).is_some()
    }
}

fn table_name<'a>(file_name: &'a str, zone: &str) -> Option<&'a str> {
    let rest = file_name.strip_prefix(zone)?;
    let table = rest.trim_start_matches('_');
    (table.len() < rest.len() && !table.is_empty()).then_some(table)
}
