//! Zone folders written as real DBF tables and shapefiles.

use camino::{Utf8Path, Utf8PathBuf};
use shapefile::{
    Point, Polyline, Writer,
    dbase::{FieldName, FieldValue, Record, TableWriterBuilder},
};
use tempfile::TempDir;

use crate::{ZoneFolder, ZoneJob};

pub(crate) const COUNTRY: &str = "and";
pub(crate) const ZONE: &str = "andorra";

/// Column of a fixture table; numbers are written as `N(18, 0)`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Column {
    Number(&'static str),
    Text(&'static str),
}

pub(crate) const ROAD_COLUMNS: &[Column] = &[
    Column::Number("ID"),
    Column::Text("NAME"),
    Column::Number("FRC"),
    Column::Text("ONEWAY"),
];

pub(crate) const SPEED_COLUMNS: &[Column] = &[
    Column::Number("ID"),
    Column::Number("SPEED"),
    Column::Number("VALDIR"),
];

pub(crate) const GEOCODE_COLUMNS: &[Column] = &[
    Column::Number("ID"),
    Column::Text("FULLNAME"),
    Column::Text("NAMELC"),
    Column::Number("SOL"),
    Column::Number("L_STRUCT"),
    Column::Number("R_STRUCT"),
    Column::Text("L_F_ADD"),
    Column::Text("L_T_ADD"),
    Column::Text("R_F_ADD"),
    Column::Text("R_T_ADD"),
    Column::Text("L_PC"),
    Column::Text("R_PC"),
];

pub(crate) const CENTROID_COLUMNS: &[Column] = &[
    Column::Number("ID"),
    Column::Text("NAME"),
    Column::Number("ADMINCLASS"),
    Column::Number("DISPCLASS"),
];

impl Column {
    const fn name(self) -> &'static str {
        match self {
            Self::Number(name) | Self::Text(name) => name,
        }
    }

    fn add_to(self, builder: TableWriterBuilder) -> TableWriterBuilder {
        let name = FieldName::try_from(self.name()).expect("short field name");
        match self {
            Self::Number(_) => builder.add_numeric_field(name, 18, 0),
            Self::Text(_) => builder.add_character_field(name, 40),
        }
    }

    /// Blank cells are written as nulls.
    fn value(self, raw: &str) -> FieldValue {
        match self {
            Self::Number(_) if raw.is_empty() => FieldValue::Numeric(None),
            Self::Number(_) => FieldValue::Numeric(Some(raw.parse().expect("numeric cell"))),
            Self::Text(_) if raw.is_empty() => FieldValue::Character(None),
            Self::Text(_) => FieldValue::Character(Some(raw.to_owned())),
        }
    }
}

fn table_builder(columns: &[Column]) -> TableWriterBuilder {
    columns
        .iter()
        .fold(TableWriterBuilder::new(), |builder, column| column.add_to(builder))
}

fn record(columns: &[Column], cells: &[&str]) -> Record {
    assert_eq!(columns.len(), cells.len(), "one cell per column");
    let mut record = Record::default();
    for (column, cell) in columns.iter().zip(cells) {
        record.insert(column.name().to_owned(), column.value(cell));
    }
    record
}

/// Temporary input and output roots holding one zone of one country.
pub(crate) struct ZoneFixture {
    _dir: TempDir,
    pub(crate) input: Utf8PathBuf,
    pub(crate) output: Utf8PathBuf,
}

impl ZoneFixture {
    pub(crate) fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        let input = root.join("in");
        std::fs::create_dir_all(input.join(COUNTRY)).expect("country dir");
        Self {
            _dir: dir,
            input,
            output: root.join("out"),
        }
    }

    /// Distribution file name for a logical table, e.g. `sr.dbf`.
    pub(crate) fn path(&self, table: &str) -> Utf8PathBuf {
        self.input
            .join(COUNTRY)
            .join(format!("{ZONE}___________{table}"))
    }

    pub(crate) fn job(&self) -> ZoneJob {
        ZoneJob::new(COUNTRY, ZONE, &self.input, &self.output)
    }

    pub(crate) fn folder(&self) -> ZoneFolder {
        ZoneFolder::open(&self.input.join(COUNTRY), ZONE).expect("open zone folder")
    }

    /// Write a standalone DBF table.
    pub(crate) fn write_table(&self, table: &str, columns: &[Column], rows: &[&[&str]]) {
        write_table(&self.path(table), columns, rows);
    }

    /// Write a point shapefile with its DBF attributes.
    pub(crate) fn write_points(
        &self,
        table: &str,
        columns: &[Column],
        rows: &[((f64, f64), &[&str])],
    ) {
        let mut writer =
            Writer::from_path(self.path(table), table_builder(columns)).expect("create points");
        for &((x, y), cells) in rows {
            writer
                .write_shape_and_record(&Point::new(x, y), &record(columns, cells))
                .expect("write point");
        }
    }

    /// Write a polyline shapefile with its DBF attributes.
    pub(crate) fn write_lines(
        &self,
        table: &str,
        columns: &[Column],
        rows: &[(&[(f64, f64)], &[&str])],
    ) {
        let mut writer =
            Writer::from_path(self.path(table), table_builder(columns)).expect("create lines");
        for &(coords, cells) in rows {
            let line = Polyline::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect());
            writer
                .write_shape_and_record(&line, &record(columns, cells))
                .expect("write line");
        }
    }
}

fn write_table(path: &Utf8Path, columns: &[Column], rows: &[&[&str]]) {
    let mut writer = table_builder(columns)
        .build_with_file_dest(path)
        .expect("create table");
    for cells in rows {
        writer
            .write_record(&record(columns, cells))
            .expect("write record");
    }
}
