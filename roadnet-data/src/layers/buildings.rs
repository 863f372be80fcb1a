//! Building footprints as multipolygon relations.

use roadnet_core::{AreaGeometry, ElementSink, Feature, MemberRole, Ring, Row, Tags, tags};
use shapefile::{PolygonRing, Shape};

use super::{LayerContext, feature_id, to_line, unsupported};
use crate::ConversionError;

/// Rings of a polygon shape with their member roles.
pub(super) fn polygon_rings<'s>(
    zone: &str,
    id: i64,
    shape: &'s Shape,
) -> Result<Vec<(MemberRole, &'s [shapefile::Point])>, ConversionError> {
    match shape {
        Shape::Polygon(polygon) => Ok(polygon
            .rings()
            .iter()
            .map(|ring| match ring {
                PolygonRing::Outer(points) => (MemberRole::Outer, points.as_slice()),
                PolygonRing::Inner(points) => (MemberRole::Inner, points.as_slice()),
            })
            .collect()),
        other => Err(unsupported(zone, id, other)),
    }
}

pub(super) fn convert_building<S>(
    context: &mut LayerContext<'_, S>,
    shape: &Shape,
    row: &Row,
) -> Result<(), ConversionError>
where
    S: ElementSink + ?Sized,
{
    let id = feature_id(context.zone, row)?;
    let rings = polygon_rings(context.zone, id, shape)?
        .into_iter()
        .map(|(role, points)| Ring {
            role,
            line: to_line(points),
            tags: Tags::new(),
        })
        .collect();
    let mut building_tags = tags([("type", "multipolygon"), ("building", "yes")]);
    building_tags.insert("ref:tomtom".to_owned(), id.to_string());
    let area = AreaGeometry { rings, label: None };
    context.emit(&Feature::area(id, area, building_tags))
}
