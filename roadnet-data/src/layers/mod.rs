//! Shapefile layers of a zone and their conversion into features.

mod boundaries;
mod buildings;
mod network;

use std::{collections::HashSet, fmt};

use camino::Utf8Path;
use geo::{Coord, LineString};
use log::debug;
use roadnet_core::{
    AttributeStore, ElementSerializer, ElementSink, Feature, Row, TableKind, TagDerivationEngine,
};
use shapefile::Shape;

use crate::{ConversionError, tables::record_to_row};

/// A shape with its attribute row.
pub type ShapeRecord = (Shape, Row);

/// Theme layers converted for a zone, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Road network, `nw.shp`.
    Roads,
    /// Ferry routes, `fe.shp`.
    Ferries,
    /// Building footprints, `2dbd.shp`.
    Buildings,
    /// Administrative areas of one level, `a<level>.shp`.
    Boundaries(u8),
}

impl Layer {
    /// Every layer, in output order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        let mut layers = vec![Self::Roads, Self::Ferries, Self::Buildings];
        layers.extend((0..=9).map(Self::Boundaries));
        layers
    }

    /// Logical file name inside the zone folder.
    #[must_use]
    pub fn file_name(self) -> String {
        match self {
            Self::Roads => "nw.shp".to_owned(),
            Self::Ferries => "fe.shp".to_owned(),
            Self::Buildings => "2dbd.shp".to_owned(),
            Self::Boundaries(level) => format!("a{level}.shp"),
        }
    }

    /// Attribute tables the layer's tag rules read.
    #[must_use]
    pub const fn required_tables(self) -> &'static [TableKind] {
        match self {
            Self::Roads => &[TableKind::Geocodes, TableKind::SpeedRestrictions],
            Self::Ferries | Self::Buildings => &[],
            Self::Boundaries(_) => &[
                TableKind::AreaNames,
                TableKind::CityNames,
                TableKind::Centroids,
            ],
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// Mutable state shared by the layers of one zone.
pub struct LayerContext<'a, S: ?Sized> {
    pub zone: &'a str,
    pub store: &'a AttributeStore,
    pub engine: &'a TagDerivationEngine,
    pub sink: &'a mut S,
    serializer: ElementSerializer,
    places: HashSet<i64>,
}

impl<'a, S> LayerContext<'a, S>
where
    S: ElementSink + ?Sized,
{
    pub fn new(
        zone: &'a str,
        store: &'a AttributeStore,
        engine: &'a TagDerivationEngine,
        sink: &'a mut S,
    ) -> Self {
        Self {
            zone,
            store,
            engine,
            sink,
            serializer: ElementSerializer::new(),
            places: HashSet::new(),
        }
    }

    fn emit(&mut self, feature: &Feature) -> Result<(), ConversionError> {
        self.serializer
            .serialize(feature, &mut *self.sink)
            .map_err(|source| ConversionError::Serialize {
                zone: self.zone.to_owned(),
                id: feature.id,
                source,
            })?;
        Ok(())
    }

    /// Emit a place node unless the zone already has one with this id.
    fn emit_place(&mut self, feature: &Feature) -> Result<(), ConversionError> {
        if self.places.insert(feature.id) {
            self.emit(feature)
        } else {
            Ok(())
        }
    }

    /// Convert every shape of `layer`.
    pub fn convert_layer<I>(&mut self, layer: Layer, shapes: I) -> Result<usize, ConversionError>
    where
        I: IntoIterator<Item = Result<ShapeRecord, ConversionError>>,
    {
        let mut count = 0;
        for item in shapes {
            let (shape, row) = item?;
            match layer {
                Layer::Roads => network::convert_road(self, &shape, &row)?,
                Layer::Ferries => network::convert_ferry(self, &shape, &row)?,
                Layer::Buildings => buildings::convert_building(self, &shape, &row)?,
                Layer::Boundaries(level) => {
                    boundaries::convert_boundary(self, level, &shape, &row)?;
                }
            }
            count += 1;
        }
        debug!("zone {}: converted {count} shapes from {layer}", self.zone);
        Ok(count)
    }

    /// Stream a layer's shapefile through [`LayerContext::convert_layer`].
    pub fn convert_file(
        &mut self,
        layer: Layer,
        path: &Utf8Path,
    ) -> Result<usize, ConversionError> {
        let zone = self.zone;
        let read_error = |source| ConversionError::ReadShapes {
            zone: zone.to_owned(),
            path: path.to_path_buf(),
            source,
        };
        let mut reader = shapefile::Reader::from_path(path).map_err(read_error)?;
        let shapes = reader.iter_shapes_and_records().map(|item| {
            item.map(|(shape, record)| (shape, record_to_row(record)))
                .map_err(read_error)
        });
        self.convert_layer(layer, shapes)
    }
}

/// Source id of a row.
fn feature_id(zone: &str, row: &Row) -> Result<i64, ConversionError> {
    row.integer("ID").ok_or_else(|| ConversionError::MissingId {
        zone: zone.to_owned(),
    })
}

fn to_line(points: &[shapefile::Point]) -> LineString<f64> {
    points
        .iter()
        .map(|point| Coord {
            x: point.x,
            y: point.y,
        })
        .collect()
}

fn unsupported(zone: &str, id: i64, shape: &Shape) -> ConversionError {
    ConversionError::UnsupportedShape {
        zone: zone.to_owned(),
        id,
        shape: format!("{:?}", shape.shapetype()),
    }
}
