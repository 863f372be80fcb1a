//! Zone conversion: shapefiles plus derived tags into one feature archive.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use roadnet_core::{
    ArchiveError, ArchiveWriter, AttributeError, AttributeStore, ConversionSettings,
    DerivationError, MissingTableError, SerializeError, TableKind, TagDerivationEngine,
};
use thiserror::Error;

use crate::{FolderError, Layer, LayerContext, ShapefileTables, ZoneFolder, ZoneJob};

/// Errors that abort the conversion of a zone.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The zone folder could not be listed.
    #[error(transparent)]
    Folder(#[from] FolderError),
    /// A table needed by one of the zone's layers is absent.
    #[error(transparent)]
    MissingTable(#[from] MissingTableError),
    /// An attribute table could not be loaded.
    #[error("failed to load attributes of zone {zone}: {source}")]
    Attributes {
        zone: String,
        #[source]
        source: AttributeError,
    },
    /// A layer's shapefile could not be read.
    #[error("failed to read {path} for zone {zone}: {source}")]
    ReadShapes {
        zone: String,
        path: Utf8PathBuf,
        #[source]
        source: shapefile::Error,
    },
    /// A shape row has no usable `ID`.
    #[error("zone {zone}: shape without an ID")]
    MissingId { zone: String },
    /// A shape type the layer does not handle.
    #[error("zone {zone}: feature {id} has unsupported shape {shape}")]
    UnsupportedShape { zone: String, id: i64, shape: String },
    /// A tag rule failed.
    #[error("zone {zone}: {source}")]
    Derivation {
        zone: String,
        #[source]
        source: DerivationError,
    },
    /// A feature could not be turned into elements.
    #[error("zone {zone}: failed to serialise feature {id}: {source}")]
    Serialize {
        zone: String,
        id: i64,
        #[source]
        source: SerializeError,
    },
    /// The zone archive could not be written.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    /// An output directory could not be prepared or the archive moved.
    #[error("failed to prepare {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Converts one zone and returns the path of its archive.
pub trait ConvertZone: Sync {
    /// Convert `job`, returning the final archive location.
    fn convert(&self, job: &ZoneJob) -> Result<Utf8PathBuf, ConversionError>;
}

/// Builds a [`ZoneConverter`] per job from shared settings.
#[derive(Debug, Clone, Default)]
pub struct ShapefileConversion {
    engine: TagDerivationEngine,
}

impl ShapefileConversion {
    #[must_use]
    pub const fn new(settings: ConversionSettings) -> Self {
        Self {
            engine: TagDerivationEngine::new(settings),
        }
    }

    /// Converter for a single zone.
    #[must_use]
    pub const fn converter<'a>(&'a self, job: &'a ZoneJob) -> ZoneConverter<'a> {
        ZoneConverter {
            job,
            engine: &self.engine,
        }
    }
}

impl ConvertZone for ShapefileConversion {
    fn convert(&self, job: &ZoneJob) -> Result<Utf8PathBuf, ConversionError> {
        self.converter(job).convert()
    }
}

/// Converter bound to one [`ZoneJob`].
#[derive(Debug)]
pub struct ZoneConverter<'a> {
    job: &'a ZoneJob,
    engine: &'a TagDerivationEngine,
}

fn io_error(path: &Utf8Path) -> impl FnOnce(io::Error) -> ConversionError + '_ {
    move |source| ConversionError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl ZoneConverter<'_> {
    /// Convert every layer present in the zone folder.
    ///
    /// The archive is written under the scratch directory and moved into
    /// `pbfFiles/` once complete.
    pub fn convert(self) -> Result<Utf8PathBuf, ConversionError> {
        let job = self.job;
        let folder = job.folder()?;
        let layers: Vec<(Layer, Utf8PathBuf)> = Layer::all()
            .into_iter()
            .filter_map(|layer| folder.resolve(&layer.file_name()).map(|path| (layer, path)))
            .collect();
        let store = load_attributes(&folder, layers.iter().map(|(layer, _)| *layer))?;

        let scratch = job.scratch_path();
        let output = job.output_path();
        roadnet_fs::ensure_parent_dir(&scratch).map_err(io_error(&scratch))?;
        roadnet_fs::ensure_parent_dir(&output).map_err(io_error(&output))?;

        let mut writer = ArchiveWriter::create(scratch.as_std_path())?;
        let mut context = LayerContext::new(&job.zone, &store, self.engine, &mut writer);
        for (layer, path) in &layers {
            context.convert_file(*layer, path)?;
        }
        let written = writer.finish()?;

        roadnet_fs::replace_file(&scratch, &output).map_err(io_error(&output))?;
        info!(
            "zone {}/{}: wrote {written} elements from {} layers to {output}",
            job.country,
            job.zone,
            layers.len()
        );
        Ok(output)
    }
}

fn load_attributes<I>(folder: &ZoneFolder, layers: I) -> Result<AttributeStore, ConversionError>
where
    I: IntoIterator<Item = Layer>,
{
    let mut kinds: Vec<TableKind> = layers
        .into_iter()
        .flat_map(|layer| layer.required_tables().iter().copied())
        .collect();
    kinds.sort_unstable();
    kinds.dedup();
    if let Some(&table) = kinds.iter().find(|kind| !folder.contains(kind.file_name())) {
        return Err(ConversionError::MissingTable(MissingTableError {
            table,
            zone: folder.zone().to_owned(),
        }));
    }
    debug!("zone {}: loading tables {kinds:?}", folder.zone());
    let source = ShapefileTables::new(folder.clone());
    AttributeStore::load(&source, &kinds).map_err(|err| match err {
        AttributeError::Missing(missing) => ConversionError::MissingTable(missing),
        other => ConversionError::Attributes {
            zone: folder.zone().to_owned(),
            source: other,
        },
    })
}
