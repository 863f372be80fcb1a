//! Converted map features prior to element serialisation.
//!
//! A [`Feature`] is what a zone layer produces for one source shape: a point,
//! a line, or an area that becomes a relation once serialised.

use std::collections::BTreeMap;

use geo::{LineString, Point};

/// OpenStreetMap-style key/value tags.
///
/// Ordered so that encoded archives are reproducible byte for byte.
pub type Tags = BTreeMap<String, String>;

/// Build a [`Tags`] map from string pairs.
///
/// # Examples
/// ```
/// use roadnet_core::tags;
///
/// let tags = tags([("highway", "primary"), ("name", "Avinguda Meritxell")]);
/// assert_eq!(tags.get("highway").map(String::as_str), Some("primary"));
/// ```
pub fn tags<'a, I>(pairs: I) -> Tags
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

/// Role played by a member of an area relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberRole {
    /// Outer ring of an area.
    Outer,
    /// Hole inside an outer ring.
    Inner,
    /// Point used to place the area's name label.
    Label,
}

impl MemberRole {
    /// Role string stored in relation members.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outer => "outer",
            Self::Inner => "inner",
            Self::Label => "label",
        }
    }
}

/// One ring of an area, serialised as a closed way.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// Member role of the ring way.
    pub role: MemberRole,
    /// Ring coordinates; closed rings repeat the first vertex.
    pub line: LineString<f64>,
    /// Tags carried by the ring way itself.
    pub tags: Tags,
}

/// Synthetic label point attached to an area.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPoint {
    /// Label position.
    pub location: Point<f64>,
    /// Tags carried by the label node.
    pub tags: Tags,
}

/// Area geometry: ring ways plus an optional label point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AreaGeometry {
    /// Ring ways in member order.
    pub rings: Vec<Ring>,
    /// Label member appended after the rings.
    pub label: Option<LabelPoint>,
}

/// Geometry of a converted feature.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    /// Serialised as a single node.
    Point(Point<f64>),
    /// Serialised as a way over vertex nodes.
    Line(LineString<f64>),
    /// Serialised as a relation over ring ways and a label node.
    Area(AreaGeometry),
}

/// A converted map feature.
///
/// `id` is the source attribute identifier and must be positive; it is reused
/// verbatim as the identifier of the feature's own element.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Source identifier.
    pub id: i64,
    /// Feature geometry.
    pub geometry: FeatureGeometry,
    /// Tags of the feature's own element.
    pub tags: Tags,
}

impl Feature {
    /// Construct a point feature.
    #[must_use]
    pub const fn point(id: i64, location: Point<f64>, tags: Tags) -> Self {
        Self {
            id,
            geometry: FeatureGeometry::Point(location),
            tags,
        }
    }

    /// Construct a line feature.
    #[must_use]
    pub const fn line(id: i64, line: LineString<f64>, tags: Tags) -> Self {
        Self {
            id,
            geometry: FeatureGeometry::Line(line),
            tags,
        }
    }

    /// Construct an area feature.
    #[must_use]
    pub const fn area(id: i64, area: AreaGeometry, tags: Tags) -> Self {
        Self {
            id,
            geometry: FeatureGeometry::Area(area),
            tags,
        }
    }
}
