//! Feature to element serialisation.
//!
//! A feature's own element keeps the source id. Elements synthesised for it
//! (vertex nodes, ring ways, label nodes) get negative ids derived from the
//! source id and a per-feature ordinal, see [`derived_id`].

use std::collections::HashMap;

use geo::{Coord, LineString};
use thiserror::Error;

use crate::{
    ArchiveError, AreaGeometry, Element, ElementKind, ElementSink, Feature, FeatureGeometry,
    Member, MemberRole, Node, Relation, Tags, Way,
};

/// Number of derived ids reserved per source id; ordinals run from 1 to
/// `DERIVED_ID_SPAN - 1`.
pub const DERIVED_ID_SPAN: i64 = 10_000;

/// Identifier of the `ordinal`-th element derived from `source_id`.
///
/// Returns `None` when the source id is not positive, the ordinal is outside
/// `1..DERIVED_ID_SPAN`, or the result would overflow.
///
/// # Examples
/// ```
/// use roadnet_core::derived_id;
///
/// assert_eq!(derived_id(10_200_000_002_470, 1), Some(-102_000_000_024_700_001));
/// assert_eq!(derived_id(-5, 1), None);
/// assert_eq!(derived_id(5, 10_000), None);
/// ```
#[must_use]
pub fn derived_id(source_id: i64, ordinal: i64) -> Option<i64> {
    if source_id <= 0 || !(1..DERIVED_ID_SPAN).contains(&ordinal) {
        return None;
    }
    source_id
        .checked_mul(DERIVED_ID_SPAN)?
        .checked_add(ordinal)
        .map(|id| -id)
}

/// Errors raised while serialising a feature.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// Source ids must be positive and small enough to derive ids from.
    #[error("feature id {id} cannot be used to derive element ids")]
    InvalidId {
        /// Offending feature id.
        id: i64,
    },
    /// The feature needs more derived elements than its id range holds.
    #[error("feature {id} needs more than {} derived elements", DERIVED_ID_SPAN - 1)]
    TooManyElements {
        /// Offending feature id.
        id: i64,
    },
    /// A line or ring has fewer than two vertices.
    #[error("feature {id} has a degenerate line")]
    DegenerateLine {
        /// Offending feature id.
        id: i64,
    },
    /// The sink rejected an element.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

struct IdAllocator {
    source_id: i64,
    next: i64,
}

impl IdAllocator {
    fn new(source_id: i64) -> Result<Self, SerializeError> {
        if derived_id(source_id, DERIVED_ID_SPAN - 1).is_none() {
            return Err(SerializeError::InvalidId { id: source_id });
        }
        Ok(Self { source_id, next: 1 })
    }

    fn allocate(&mut self) -> Result<i64, SerializeError> {
        let id = derived_id(self.source_id, self.next).ok_or(SerializeError::TooManyElements {
            id: self.source_id,
        })?;
        self.next += 1;
        Ok(id)
    }
}

/// Converts features into elements for one zone.
///
/// Line and ring vertices at identical coordinates share a node; the first
/// feature to reach a coordinate owns its id.
#[derive(Debug, Default)]
pub struct ElementSerializer {
    vertices: HashMap<(u64, u64), i64>,
}

impl ElementSerializer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the elements of `feature` to `sink`, dependencies first.
    ///
    /// Returns the number of elements written.
    pub fn serialize<S>(&mut self, feature: &Feature, sink: &mut S) -> Result<usize, SerializeError>
    where
        S: ElementSink + ?Sized,
    {
        match &feature.geometry {
            FeatureGeometry::Point(location) => {
                if feature.id <= 0 {
                    return Err(SerializeError::InvalidId { id: feature.id });
                }
                sink.append(&Element::Node(Node {
                    id: feature.id,
                    location: location.0,
                    tags: feature.tags.clone(),
                }))?;
                Ok(1)
            }
            FeatureGeometry::Line(line) => {
                let mut ids = IdAllocator::new(feature.id)?;
                let mut written = 0;
                let nodes = self.vertices(feature.id, line, &mut ids, sink, &mut written)?;
                sink.append(&Element::Way(Way {
                    id: feature.id,
                    nodes,
                    tags: feature.tags.clone(),
                }))?;
                Ok(written + 1)
            }
            FeatureGeometry::Area(area) => self.area(feature, area, sink),
        }
    }

    fn area<S>(
        &mut self,
        feature: &Feature,
        area: &AreaGeometry,
        sink: &mut S,
    ) -> Result<usize, SerializeError>
    where
        S: ElementSink + ?Sized,
    {
        let mut ids = IdAllocator::new(feature.id)?;
        let mut written = 0;
        let mut members = Vec::with_capacity(area.rings.len() + 1);
        for ring in &area.rings {
            let nodes = self.vertices(feature.id, &ring.line, &mut ids, sink, &mut written)?;
            let way_id = ids.allocate()?;
            sink.append(&Element::Way(Way {
                id: way_id,
                nodes,
                tags: ring.tags.clone(),
            }))?;
            written += 1;
            members.push(member(ElementKind::Way, way_id, ring.role));
        }
        if let Some(label) = &area.label {
            let node_id = ids.allocate()?;
            sink.append(&Element::Node(Node {
                id: node_id,
                location: label.location.0,
                tags: label.tags.clone(),
            }))?;
            written += 1;
            members.push(member(ElementKind::Node, node_id, MemberRole::Label));
        }
        sink.append(&Element::Relation(Relation {
            id: feature.id,
            members,
            tags: feature.tags.clone(),
        }))?;
        Ok(written + 1)
    }

    fn vertices<S>(
        &mut self,
        feature_id: i64,
        line: &LineString<f64>,
        ids: &mut IdAllocator,
        sink: &mut S,
        written: &mut usize,
    ) -> Result<Vec<i64>, SerializeError>
    where
        S: ElementSink + ?Sized,
    {
        let mut nodes: Vec<i64> = Vec::with_capacity(line.0.len());
        for coord in line.coords() {
            let key = vertex_key(*coord);
            let id = if let Some(&existing) = self.vertices.get(&key) {
                existing
            } else {
                let id = ids.allocate()?;
                sink.append(&Element::Node(Node {
                    id,
                    location: *coord,
                    tags: Tags::new(),
                }))?;
                *written += 1;
                self.vertices.insert(key, id);
                id
            };
            if nodes.last() != Some(&id) {
                nodes.push(id);
            }
        }
        if nodes.len() < 2 {
            return Err(SerializeError::DegenerateLine { id: feature_id });
        }
        Ok(nodes)
    }
}

fn vertex_key(coord: Coord<f64>) -> (u64, u64) {
    (coord.x.to_bits(), coord.y.to_bits())
}

fn member(kind: ElementKind, id: i64, role: MemberRole) -> Member {
    Member {
        kind,
        id,
        role: role.as_str().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LabelPoint, Ring, tags};
    use geo::Point;
    use rstest::{fixture, rstest};

    #[fixture]
    fn serializer() -> ElementSerializer {
        ElementSerializer::new()
    }

    fn line(coords: &[(f64, f64)]) -> LineString<f64> {
        coords.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[rstest]
    fn line_emits_vertices_before_way(mut serializer: ElementSerializer) {
        let mut sink = Vec::new();
        let feature = Feature::line(
            7,
            line(&[(0.0, 0.0), (1.0, 0.0)]),
            tags([("highway", "residential")]),
        );
        assert_eq!(serializer.serialize(&feature, &mut sink).expect("serialize"), 3);
        let kinds: Vec<_> = sink.iter().map(Element::kind).collect();
        assert_eq!(kinds, vec![ElementKind::Node, ElementKind::Node, ElementKind::Way]);
        let Some(Element::Way(way)) = sink.last() else {
            panic!("expected a way");
        };
        assert_eq!(way.id, 7);
        assert_eq!(way.nodes, vec![-70_001, -70_002]);
    }

    #[rstest]
    fn shared_vertices_keep_first_owner(mut serializer: ElementSerializer) {
        let mut sink = Vec::new();
        let first = Feature::line(7, line(&[(0.0, 0.0), (1.0, 0.0)]), Tags::new());
        let second = Feature::line(8, line(&[(1.0, 0.0), (2.0, 0.0)]), Tags::new());
        serializer.serialize(&first, &mut sink).expect("first");
        assert_eq!(serializer.serialize(&second, &mut sink).expect("second"), 2);
        let Some(Element::Way(way)) = sink.last() else {
            panic!("expected a way");
        };
        assert_eq!(way.nodes, vec![-70_002, -80_001]);
        let vertices = sink
            .iter()
            .filter(|element| element.kind() == ElementKind::Node)
            .count();
        assert_eq!(vertices, 3);
    }

    #[rstest]
    fn area_becomes_relation_with_label(mut serializer: ElementSerializer) {
        let mut sink = Vec::new();
        let area = AreaGeometry {
            rings: vec![Ring {
                role: MemberRole::Outer,
                line: line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
                tags: tags([("boundary", "administrative")]),
            }],
            label: Some(LabelPoint {
                location: Point::new(0.5, 0.4),
                tags: tags([("name", "Canillo")]),
            }),
        };
        let feature = Feature::area(3, area, tags([("type", "boundary")]));
        serializer.serialize(&feature, &mut sink).expect("serialize");

        let Some(Element::Relation(relation)) = sink.last() else {
            panic!("expected a relation");
        };
        let roles: Vec<_> = relation.members.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["outer", "label"]);
        let Some(Element::Way(ring)) = sink.iter().find(|e| e.kind() == ElementKind::Way) else {
            panic!("expected a ring way");
        };
        assert_eq!(ring.nodes.first(), ring.nodes.last());
        assert_eq!(ring.nodes.len(), 4);
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    #[case(i64::MAX)]
    fn rejects_unusable_ids(mut serializer: ElementSerializer, #[case] id: i64) {
        let feature = Feature::line(id, line(&[(0.0, 0.0), (1.0, 0.0)]), Tags::new());
        let err = serializer
            .serialize(&feature, &mut Vec::new())
            .expect_err("invalid id");
        assert!(matches!(err, SerializeError::InvalidId { .. }));
    }

    #[rstest]
    fn rejects_features_exceeding_the_id_range(mut serializer: ElementSerializer) {
        let coords: Vec<_> = (0..10_000).map(|i| (f64::from(i), 0.0)).collect();
        let feature = Feature::line(1, line(&coords), Tags::new());
        let err = serializer
            .serialize(&feature, &mut Vec::new())
            .expect_err("too many vertices");
        assert!(matches!(err, SerializeError::TooManyElements { id: 1 }));
    }

    #[rstest]
    fn rejects_degenerate_lines(mut serializer: ElementSerializer) {
        let feature = Feature::line(1, line(&[(0.0, 0.0), (0.0, 0.0)]), Tags::new());
        let err = serializer
            .serialize(&feature, &mut Vec::new())
            .expect_err("degenerate");
        assert!(matches!(err, SerializeError::DegenerateLine { id: 1 }));
    }
}
