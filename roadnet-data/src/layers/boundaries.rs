//! Administrative boundaries, one layer per level.

use roadnet_core::{BoundaryPolygon, ElementSink, Row};
use shapefile::Shape;

use super::{LayerContext, buildings::polygon_rings, feature_id, to_line};
use crate::ConversionError;

pub(super) fn convert_boundary<S>(
    context: &mut LayerContext<'_, S>,
    level_code: u8,
    shape: &Shape,
    row: &Row,
) -> Result<(), ConversionError>
where
    S: ElementSink + ?Sized,
{
    let zone = context.zone;
    let id = feature_id(zone, row)?;
    // Holes are kept as outer members as well.
    let rings = polygon_rings(zone, id, shape)?
        .into_iter()
        .map(|(_, points)| to_line(points))
        .collect();
    let polygon = BoundaryPolygon {
        id,
        level_code,
        rings,
        name: row.text("NAME").map(str::to_owned),
        population: row.integer("POP"),
        official_code: row.display("OFFCODE"),
        city_center: row.integer("CITYCENTER"),
    };

    let features = context
        .engine
        .boundary(&context.engine.settings().admin_levels, context.store, &polygon)
        .map_err(|source| ConversionError::Derivation {
            zone: zone.to_owned(),
            source,
        })?;
    context.emit(&features.relation)?;
    if let Some(place) = &features.place {
        context.emit_place(place)?;
    }
    Ok(())
}
