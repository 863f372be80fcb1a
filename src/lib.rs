//! Facade crate for the road-network converter.
//!
//! This crate re-exports the tag derivation, serialisation and merge types of
//! `roadnet-core` together with the shapefile zone conversion of
//! `roadnet-data`.

#![forbid(unsafe_code)]

pub use roadnet_core::{
    AdminLevelClassifier, AdminLevelTable, ArchiveError, ArchiveReader, ArchiveWriter,
    AttributeError, AttributeStore, BoundaryFeatures, BoundaryPolygon, ConversionSettings,
    DerivationError, Element, ElementKind, ElementSerializer, ElementSink, Feature,
    FeatureGeometry, MergeError, MergeSummary, MissingTableError, SerializeError, SideConflict,
    TableKind, TableSource, Tags, TagDerivationEngine, derived_id, merge, read_archive,
};

pub use roadnet_data::{
    ConversionError, ConvertZone, DiscoveryError, Layer, ShapefileConversion, ShapefileTables,
    ZoneConverter, ZoneJob, discover_zones,
};

#[cfg(feature = "test-support")]
pub use roadnet_core::test_support;
