//! Concatenating feature archives.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use log::info;
use thiserror::Error;

use crate::{ArchiveError, ArchiveReader, ArchiveWriter, ElementKind, ElementSink};

/// Errors raised while merging archives.
#[derive(Debug, Error)]
pub enum MergeError {
    /// An input could not be read or the output could not be written.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    /// Two inputs, or one input twice, carry the same element.
    #[error("duplicate {kind} {id} in {path}")]
    DuplicateElement {
        /// Element namespace.
        kind: ElementKind,
        /// Repeated identifier.
        id: i64,
        /// Input holding the repeated element.
        path: PathBuf,
    },
    /// The finished output could not be moved into place.
    #[error("failed to move merged archive to {path}: {source}")]
    Publish {
        /// Final output location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Element counts of a merged archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeSummary {
    pub nodes: u64,
    pub ways: u64,
    pub relations: u64,
}

impl MergeSummary {
    /// Total number of elements.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.nodes + self.ways + self.relations
    }

    const fn record(&mut self, kind: ElementKind) {
        match kind {
            ElementKind::Node => self.nodes += 1,
            ElementKind::Way => self.ways += 1,
            ElementKind::Relation => self.relations += 1,
        }
    }
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".partial");
    output.with_file_name(name)
}

/// Merge `inputs` into `output` in input order.
///
/// Identifiers, geometry and tags pass through unchanged; member references
/// are not checked. The same ordered inputs always produce the same bytes.
/// The archive is written next to `output` and renamed once complete, so an
/// existing `output` is only replaced by a finished merge.
pub fn merge<P>(inputs: &[P], output: &Path) -> Result<MergeSummary, MergeError>
where
    P: AsRef<Path>,
{
    let scratch = partial_path(output);
    let mut writer = ArchiveWriter::create(&scratch)?;
    let mut seen = HashSet::new();
    let mut summary = MergeSummary::default();

    for input in inputs {
        let path = input.as_ref();
        for element in ArchiveReader::open(path)? {
            let element = element?;
            let kind = element.kind();
            if !seen.insert((kind, element.id())) {
                return Err(MergeError::DuplicateElement {
                    kind,
                    id: element.id(),
                    path: path.to_path_buf(),
                });
            }
            writer.append(&element)?;
            summary.record(kind);
        }
    }
    writer.finish()?;

    fs::rename(&scratch, output).map_err(|source| MergeError::Publish {
        path: output.to_path_buf(),
        source,
    })?;
    info!(
        "merged {} inputs into {} ({} nodes, {} ways, {} relations)",
        inputs.len(),
        output.display(),
        summary.nodes,
        summary.ways,
        summary.relations
    );
    Ok(summary)
}
