//! Roads and ferry routes.

use geo::LineString;
use roadnet_core::{ElementSink, Feature, Row, Tags};
use shapefile::Shape;

use super::{LayerContext, feature_id, to_line, unsupported};
use crate::ConversionError;

/// `highway` value for a functional road class.
#[must_use]
pub const fn highway_class(frc: i64) -> &'static str {
    match frc {
        0 => "motorway",
        1 => "trunk",
        2 => "primary",
        3 => "secondary",
        4 => "tertiary",
        5 => "unclassified",
        6 => "residential",
        7 => "service",
        _ => "road",
    }
}

/// `oneway` value for the distribution's flow direction code.
fn oneway(code: &str) -> Option<&'static str> {
    match code {
        "FT" => Some("yes"),
        "TF" => Some("-1"),
        _ => None,
    }
}

fn polyline(zone: &str, id: i64, shape: &Shape) -> Result<LineString<f64>, ConversionError> {
    match shape {
        Shape::Polyline(line) => Ok(line
            .parts()
            .iter()
            .flat_map(|part| to_line(part))
            .collect()),
        other => Err(unsupported(zone, id, other)),
    }
}

fn base_tags(id: i64, row: &Row) -> Tags {
    let mut tags = Tags::new();
    if let Some(name) = row.text("NAME") {
        tags.insert("name".to_owned(), name.to_owned());
    }
    tags.insert("ref:tomtom".to_owned(), id.to_string());
    tags
}

pub(super) fn convert_road<S>(
    context: &mut LayerContext<'_, S>,
    shape: &Shape,
    row: &Row,
) -> Result<(), ConversionError>
where
    S: ElementSink + ?Sized,
{
    let id = feature_id(context.zone, row)?;
    let line = polyline(context.zone, id, shape)?;

    let mut tags = context
        .engine
        .segment_tags(context.store, id)
        .map_err(ConversionError::MissingTable)?;
    tags.extend(base_tags(id, row));
    let highway = row.integer("FRC").map_or("road", highway_class);
    tags.insert("highway".to_owned(), highway.to_owned());
    if let Some(value) = row.text("ONEWAY").and_then(oneway) {
        tags.insert("oneway".to_owned(), value.to_owned());
    }

    context.emit(&Feature::line(id, line, tags))
}

pub(super) fn convert_ferry<S>(
    context: &mut LayerContext<'_, S>,
    shape: &Shape,
    row: &Row,
) -> Result<(), ConversionError>
where
    S: ElementSink + ?Sized,
{
    let id = feature_id(context.zone, row)?;
    let line = polyline(context.zone, id, shape)?;
    let mut tags = base_tags(id, row);
    tags.insert("route".to_owned(), "ferry".to_owned());
    context.emit(&Feature::line(id, line, tags))
}
