//! Core model of the road-network converter.
//!
//! Attribute rows are decoded and indexed per zone by [`AttributeStore`],
//! turned into tags by [`TagDerivationEngine`], attached to [`Feature`]s and
//! serialised into OSM-style [`Element`]s. Elements are stored in feature
//! archives ([`ArchiveWriter`], [`ArchiveReader`]) which [`merge`] combines.

pub mod archive;
pub mod attributes;
pub mod derive;
pub mod element;
pub mod feature;
pub mod merge;
pub mod serializer;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use archive::{
    ARCHIVE_MAGIC, ARCHIVE_VERSION, ArchiveError, ArchiveReader, ArchiveWriter, ElementSink,
    read_archive,
};
pub use attributes::{
    AddressRange, AttributeError, AttributeStore, Centroid, DecodeError, Direction, FieldValue,
    GeocodeRow, HouseNumberBounds, InterpolationKind, MissingTableError, NameRow, NameSide,
    Record, Row, Side, SpeedRow, TableError, TableKind, TableSource,
};
pub use derive::{
    AdminLevelClassifier, AdminLevelTable, BoundaryFeatures, BoundaryPolygon, ConversionSettings,
    DerivationError, SideConflict, SpeedRestriction, TagDerivationEngine, Validity, place_class,
};
pub use element::{Element, ElementKind, Member, Node, Relation, Way};
pub use feature::{AreaGeometry, Feature, FeatureGeometry, LabelPoint, MemberRole, Ring, Tags, tags};
pub use merge::{MergeError, MergeSummary, merge};
pub use serializer::{DERIVED_ID_SPAN, ElementSerializer, SerializeError, derived_id};
