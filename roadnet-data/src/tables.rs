//! Attribute tables read from a zone's DBF and point shapefiles.

use std::collections::HashMap;

use camino::Utf8Path;
use geo::Point;
use roadnet_core::{FieldValue, Row, TableError, TableKind, TableSource};
use shapefile::{Shape, dbase};

use crate::ZoneFolder;

/// Convert a DBF record into a generic row.
pub(crate) fn record_to_row(record: dbase::Record) -> Row {
    let mut row = Row::new();
    for (column, value) in HashMap::<String, dbase::FieldValue>::from(record) {
        row.insert(&column, field_value(value));
    }
    row
}

fn field_value(value: dbase::FieldValue) -> FieldValue {
    match value {
        dbase::FieldValue::Character(Some(text)) => FieldValue::Text(text),
        dbase::FieldValue::Numeric(Some(number)) | dbase::FieldValue::Double(number) => {
            FieldValue::Number(number)
        }
        dbase::FieldValue::Float(Some(number)) => FieldValue::Number(f64::from(number)),
        dbase::FieldValue::Integer(number) => FieldValue::Integer(i64::from(number)),
        _ => FieldValue::Null,
    }
}

fn read_error<E>(table: TableKind, source: E) -> TableError
where
    E: std::error::Error + Send + Sync + 'static,
{
    TableError::Read {
        table,
        source: Box::new(source),
    }
}

/// [`TableSource`] over a zone folder on disk.
#[derive(Debug, Clone)]
pub struct ShapefileTables {
    folder: ZoneFolder,
}

impl ShapefileTables {
    #[must_use]
    pub const fn new(folder: ZoneFolder) -> Self {
        Self { folder }
    }

    fn read_dbf(table: TableKind, path: &Utf8Path) -> Result<Vec<Row>, TableError> {
        let mut reader =
            dbase::Reader::from_path(path).map_err(|source| read_error(table, source))?;
        reader
            .iter_records()
            .map(|record| {
                record
                    .map(record_to_row)
                    .map_err(|source| read_error(table, source))
            })
            .collect()
    }

    fn read_points(table: TableKind, path: &Utf8Path) -> Result<Vec<Row>, TableError> {
        let mut reader =
            shapefile::Reader::from_path(path).map_err(|source| read_error(table, source))?;
        reader
            .iter_shapes_and_records()
            .map(|item| {
                let (shape, record) = item.map_err(|source| read_error(table, source))?;
                let row = record_to_row(record);
                Ok(match shape {
                    Shape::Point(point) => row.with_location(Point::new(point.x, point.y)),
                    _ => row,
                })
            })
            .collect()
    }
}

impl TableSource for ShapefileTables {
    fn zone(&self) -> &str {
        self.folder.zone()
    }

    fn read_table(&self, kind: TableKind) -> Result<Vec<Row>, TableError> {
        let path = self
            .folder
            .resolve(kind.file_name())
            .ok_or(TableError::Absent { table: kind })?;
        match kind {
            TableKind::Centroids => Self::read_points(kind, &path),
            _ => Self::read_dbf(kind, &path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{CENTROID_COLUMNS, GEOCODE_COLUMNS, SPEED_COLUMNS, ZONE, ZoneFixture};
    use roadnet_core::{AttributeStore, Direction};
    use rstest::{fixture, rstest};

    const SEGMENT: i64 = 12_500_067_305_696;

    #[fixture]
    fn zone() -> ZoneFixture {
        let zone = ZoneFixture::new();
        zone.write_table(
            "sr.dbf",
            SPEED_COLUMNS,
            &[
                &["12500067305696", "30", "2"],
                &["12500067305696", "50", "3"],
                &["12500067326986", "90", ""],
            ],
        );
        zone.write_table(
            "gc.dbf",
            GEOCODE_COLUMNS,
            &[&[
                "12500067305696",
                "Carretera General 1",
                "CAT",
                "0",
                "1",
                "3",
                "",
                "",
                "117",
                "111",
                "",
                "AD700",
            ]],
        );
        zone.write_points(
            "sm.shp",
            CENTROID_COLUMNS,
            &[((1.5218, 42.5063), &["500", "Andorra la Vella", "0", "1"])],
        );
        zone
    }

    #[rstest]
    fn speed_rows_are_read_from_dbf(zone: ZoneFixture) {
        let tables = ShapefileTables::new(zone.folder());
        assert_eq!(tables.zone(), ZONE);

        let rows = tables
            .read_table(TableKind::SpeedRestrictions)
            .expect("read sr.dbf");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].integer("ID"), Some(SEGMENT));
        assert_eq!(rows[0].integer("SPEED"), Some(30));
        assert_eq!(rows[2].integer("VALDIR"), None);

        let store =
            AttributeStore::load(&tables, &[TableKind::SpeedRestrictions]).expect("load store");
        let speeds = store.speed_rows(SEGMENT).expect("speed rows");
        let directions: Vec<_> = speeds.iter().map(|row| row.direction).collect();
        assert_eq!(directions, vec![Direction::Positive, Direction::Negative]);
    }

    #[rstest]
    fn geocode_text_is_trimmed_and_blanks_are_null(zone: ZoneFixture) {
        let rows = ShapefileTables::new(zone.folder())
            .read_table(TableKind::Geocodes)
            .expect("read gc.dbf");
        let [row] = rows.as_slice() else {
            panic!("expected one geocode row, found {}", rows.len());
        };
        assert_eq!(row.text("FULLNAME"), Some("Carretera General 1"));
        assert_eq!(row.text("R_PC"), Some("AD700"));
        assert_eq!(row.display("R_F_ADD").as_deref(), Some("117"));
        assert_eq!(row.get("L_PC"), Some(&FieldValue::Null));
        assert_eq!(row.integer("R_STRUCT"), Some(3));
    }

    #[rstest]
    fn centroids_carry_point_locations(zone: ZoneFixture) {
        let tables = ShapefileTables::new(zone.folder());
        let store = AttributeStore::load(&tables, &[TableKind::Centroids]).expect("load store");
        let centroid = store
            .centroid(500)
            .expect("centroid table")
            .expect("centroid 500");
        assert_eq!(centroid.name.as_deref(), Some("Andorra la Vella"));
        assert_eq!(centroid.admin_class, Some(0));
        assert_eq!(centroid.display_class, Some(1));
        assert_eq!(centroid.location, Point::new(1.5218, 42.5063));
    }

    #[rstest]
    fn absent_table_is_reported(zone: ZoneFixture) {
        let err = ShapefileTables::new(zone.folder())
            .read_table(TableKind::AreaNames)
            .expect_err("an.dbf is absent");
        assert!(matches!(
            err,
            TableError::Absent {
                table: TableKind::AreaNames
            }
        ));
    }

    #[rstest]
    fn corrupt_table_is_a_read_error(zone: ZoneFixture) {
        std::fs::write(zone.path("smnm.dbf"), b"not a dbf").expect("write");
        let err = ShapefileTables::new(zone.folder())
            .read_table(TableKind::CityNames)
            .expect_err("corrupt smnm.dbf");
        assert!(matches!(
            err,
            TableError::Read {
                table: TableKind::CityNames,
                ..
            }
        ));
    }
}
