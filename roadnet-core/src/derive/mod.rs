//! Derived tag rules.
//!
//! Each rule is a pure function over [`AttributeStore`] lookups. The engine
//! bundles them with the [`ConversionSettings`] they read and an
//! [`AdminLevelClassifier`] for boundaries.

mod address;
mod boundary;
mod names;
mod settings;
mod speed;

use thiserror::Error;

use crate::{AttributeStore, GeocodeRow, MissingTableError, SpeedRow, Tags};

pub use boundary::{AdminLevelClassifier, BoundaryFeatures, BoundaryPolygon, place_class};
pub use settings::{AdminLevelTable, ConversionSettings, SideConflict};
pub use speed::{SpeedRestriction, Validity};

/// Errors raised while deriving tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// A rule needed a table the zone does not provide.
    #[error(transparent)]
    MissingTable(#[from] MissingTableError),
    /// The classifier has no admin level for a polygon's level code.
    #[error("zone {zone}: boundary {id} has unmapped level code {level_code}")]
    UnmappedAdminLevel {
        /// Zone being converted.
        zone: String,
        /// Boundary polygon id.
        id: i64,
        /// Level code read from the layer name.
        level_code: u8,
    },
}

/// Computes derived tag sets for road segments and boundaries.
///
/// # Examples
/// ```
/// use roadnet_core::{ConversionSettings, TagDerivationEngine};
///
/// let engine = TagDerivationEngine::new(ConversionSettings::default());
/// assert_eq!(engine.postcode(&[]), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TagDerivationEngine {
    settings: ConversionSettings,
}

impl TagDerivationEngine {
    #[must_use]
    pub const fn new(settings: ConversionSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// `name:<lang>`, `name:left:<lang>` and `name:right:<lang>` tags.
    ///
    /// Values sharing a language and side are joined with `;` in source
    /// order. Identical left and right values collapse into the side-less
    /// key; differing ones follow [`SideConflict`]. Rows in languages
    /// missing from the settings are ignored.
    #[must_use]
    pub fn alternate_names(&self, rows: &[&GeocodeRow]) -> Tags {
        names::alternate_names(&self.settings, rows)
    }

    /// `addr:postcode` value: `LEFT;RIGHT`, or the single value when both
    /// sides agree. Missing sides render as empty strings.
    #[must_use]
    pub fn postcode(&self, rows: &[&GeocodeRow]) -> Option<String> {
        address::postcode(rows)
    }

    /// `interpolation:left` and `interpolation:right` house-number ranges,
    /// only for sides with both bounds.
    #[must_use]
    pub fn interpolations(&self, rows: &[&GeocodeRow]) -> Tags {
        address::interpolations(rows)
    }

    /// `addr:interpolation:<side>` numbering pattern of the sides that carry
    /// a range.
    #[must_use]
    pub fn interpolation_kinds(&self, rows: &[&GeocodeRow]) -> Tags {
        address::interpolation_kinds(rows)
    }

    /// Restrictions in source order, one per row.
    #[must_use]
    pub fn speed_restrictions(&self, rows: &[&SpeedRow]) -> Vec<SpeedRestriction> {
        speed::restrictions(rows)
    }

    /// `maxspeed`, `maxspeed:forward` and `maxspeed:backward` tags.
    #[must_use]
    pub fn speed_tags(&self, restrictions: &[SpeedRestriction]) -> Tags {
        speed::speed_tags(restrictions)
    }

    /// Every derived tag of a road segment.
    pub fn segment_tags(
        &self,
        store: &AttributeStore,
        segment: i64,
    ) -> Result<Tags, MissingTableError> {
        let geocodes = store.geocodes(segment)?;
        let speeds = store.speed_rows(segment)?;

        let mut tags = self.alternate_names(&geocodes);
        tags.extend(self.interpolations(&geocodes));
        tags.extend(self.interpolation_kinds(&geocodes));
        if let Some(postcode) = self.postcode(&geocodes) {
            tags.insert("addr:postcode".to_owned(), postcode);
        }
        tags.extend(self.speed_tags(&self.speed_restrictions(&speeds)));
        Ok(tags)
    }

    /// Boundary relation, label and place node for an administrative polygon.
    pub fn boundary<C>(
        &self,
        classifier: &C,
        store: &AttributeStore,
        polygon: &BoundaryPolygon,
    ) -> Result<BoundaryFeatures, DerivationError>
    where
        C: AdminLevelClassifier + ?Sized,
    {
        boundary::assemble(&self.settings, classifier, store, polygon)
    }
}
