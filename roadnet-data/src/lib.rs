//! Source data access for the road-network converter.
//!
//! Responsibilities:
//! - Discover zones and resolve their files inside a country directory.
//! - Read DBF and shapefile attribute tables into generic rows.
//! - Convert a zone's layers into one feature archive.
//!
//! Boundaries:
//! - Tag rules live in `roadnet-core`; this crate only feeds them.
//! - Scheduling and merging across zones belong to the caller.

mod convert;
mod discovery;
#[cfg(test)]
mod fixtures;
mod layers;
mod tables;
mod zone;

pub use convert::{ConversionError, ConvertZone, ShapefileConversion, ZoneConverter};
pub use discovery::{DiscoveryError, ZONE_SUFFIXES, discover_zones, zone_name};
pub use layers::{Layer, LayerContext, ShapeRecord};
pub use tables::ShapefileTables;
pub use zone::{ARCHIVE_EXTENSION, FolderError, SCRATCH_DIR, ZONE_OUTPUT_DIR, ZoneFolder, ZoneJob};
