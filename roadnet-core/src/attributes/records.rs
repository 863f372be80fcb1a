//! Typed records decoded from attribute rows, one decoder per table kind.

use std::fmt;

use geo::Point;
use thiserror::Error;

use super::Row;

/// Attribute tables consulted while deriving tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    /// Speed restrictions per road segment (`sr.dbf`).
    SpeedRestrictions,
    /// Geocoding: names, house-number ranges and postcodes per segment (`gc.dbf`).
    Geocodes,
    /// Alternate names of administrative areas (`an.dbf`).
    AreaNames,
    /// Alternate names of city centres (`smnm.dbf`).
    CityNames,
    /// City-centre points (`sm.shp`).
    Centroids,
}

impl TableKind {
    /// Every table kind, in load order.
    pub const ALL: [Self; 5] = [
        Self::SpeedRestrictions,
        Self::Geocodes,
        Self::AreaNames,
        Self::CityNames,
        Self::Centroids,
    ];

    /// Logical file name resolved inside a zone folder.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::SpeedRestrictions => "sr.dbf",
            Self::Geocodes => "gc.dbf",
            Self::AreaNames => "an.dbf",
            Self::CityNames => "smnm.dbf",
            Self::Centroids => "sm.shp",
        }
    }

    /// Decode one row of this table.
    pub fn decode(self, row: &Row) -> Result<Record, DecodeError> {
        match self {
            Self::SpeedRestrictions => SpeedRow::decode(row).map(Record::SpeedRestriction),
            Self::Geocodes => GeocodeRow::decode(row).map(Record::Geocode),
            Self::AreaNames => NameRow::decode(self, row).map(Record::AreaName),
            Self::CityNames => NameRow::decode(self, row).map(Record::CityName),
            Self::Centroids => Centroid::decode(row).map(Record::Centroid),
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A decoded attribute record.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    SpeedRestriction(SpeedRow),
    Geocode(GeocodeRow),
    AreaName(NameRow),
    CityName(NameRow),
    Centroid(Centroid),
}

impl Record {
    /// Join key of the record.
    #[must_use]
    pub const fn key(&self) -> i64 {
        match self {
            Self::SpeedRestriction(row) => row.segment,
            Self::Geocode(row) => row.segment,
            Self::AreaName(row) | Self::CityName(row) => row.id,
            Self::Centroid(row) => row.id,
        }
    }
}

/// Errors raised while decoding a row into a typed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A mandatory column is absent or empty.
    #[error("{table}: missing value for column {column}")]
    MissingValue {
        table: TableKind,
        column: &'static str,
    },
    /// A coded column holds a value outside the documented set.
    #[error("{table}: unsupported {column} code {code}")]
    UnsupportedCode {
        table: TableKind,
        column: &'static str,
        code: i64,
    },
    /// A point table row has no point geometry.
    #[error("{table}: row {id} has no point geometry")]
    MissingGeometry { table: TableKind, id: i64 },
}

fn required_integer(table: TableKind, row: &Row, column: &'static str) -> Result<i64, DecodeError> {
    row.integer(column)
        .ok_or(DecodeError::MissingValue { table, column })
}

/// Travel direction of a speed-restriction row relative to the digitised line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Applies along the digitising direction.
    Positive,
    /// Applies against the digitising direction.
    Negative,
    /// No directional indicator.
    Unspecified,
}

/// Raw speed-restriction row (`sr.dbf`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedRow {
    pub segment: i64,
    /// Speed in km/h.
    pub speed: i64,
    pub direction: Direction,
}

impl SpeedRow {
    const TABLE: TableKind = TableKind::SpeedRestrictions;

    fn decode(row: &Row) -> Result<Self, DecodeError> {
        let segment = required_integer(Self::TABLE, row, "ID")?;
        let speed = required_integer(Self::TABLE, row, "SPEED")?;
        // VALDIR: 1 both directions, 2 positive, 3 negative.
        let direction = match row.integer("VALDIR") {
            None | Some(0 | 1) => Direction::Unspecified,
            Some(2) => Direction::Positive,
            Some(3) => Direction::Negative,
            Some(code) => {
                return Err(DecodeError::UnsupportedCode {
                    table: Self::TABLE,
                    column: "VALDIR",
                    code,
                });
            }
        };
        Ok(Self {
            segment,
            speed,
            direction,
        })
    }
}

/// Side of a road segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    const fn prefix(self) -> &'static str {
        match self {
            Self::Left => "L_",
            Self::Right => "R_",
        }
    }
}

/// Side(s) a geocode name applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSide {
    Both,
    Only(Side),
}

/// House-number pattern along one side of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationKind {
    Odd,
    Even,
    All,
    Alphabetic,
    Irregular,
}

impl InterpolationKind {
    /// Structure codes: 2 even, 3 odd, 4 mixed, 5 irregular, 6 alphabetic.
    /// 0 and 1 mean the side carries no addresses.
    fn from_structure(code: i64) -> Option<Self> {
        match code {
            2 => Some(Self::Even),
            3 => Some(Self::Odd),
            4 => Some(Self::All),
            5 => Some(Self::Irregular),
            6 => Some(Self::Alphabetic),
            _ => None,
        }
    }

    /// Tag value written for this pattern.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Odd => "odd",
            Self::Even => "even",
            Self::All => "all",
            Self::Alphabetic => "alphabetic",
            Self::Irregular => "irregular:tomtom",
        }
    }
}

/// First and last house number of a side, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseNumberBounds {
    pub from: String,
    pub to: String,
}

/// Addressing of one side of a segment, from one geocode row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRange {
    pub segment: i64,
    pub side: Side,
    pub kind: Option<InterpolationKind>,
    pub postcode: Option<String>,
    pub bounds: Option<HouseNumberBounds>,
}

impl AddressRange {
    fn decode(segment: i64, side: Side, row: &Row) -> Self {
        let column = |suffix: &str| format!("{}{suffix}", side.prefix());
        let kind = row
            .integer(&column("STRUCT"))
            .and_then(InterpolationKind::from_structure);
        let bounds = match (row.display(&column("F_ADD")), row.display(&column("T_ADD"))) {
            (Some(from), Some(to)) => Some(HouseNumberBounds { from, to }),
            _ => None,
        };
        Self {
            segment,
            side,
            kind,
            postcode: row.display(&column("PC")),
            bounds,
        }
    }
}

/// Geocode row (`gc.dbf`): one name plus both sides' addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeRow {
    pub segment: i64,
    pub name: Option<String>,
    /// Distribution language code, e.g. `CAT`.
    pub language: Option<String>,
    pub name_side: NameSide,
    pub left: AddressRange,
    pub right: AddressRange,
}

impl GeocodeRow {
    const TABLE: TableKind = TableKind::Geocodes;

    fn decode(row: &Row) -> Result<Self, DecodeError> {
        let segment = required_integer(Self::TABLE, row, "ID")?;
        // SOL: side of line, 0 both, 1 left, 2 right.
        let name_side = match row.integer("SOL") {
            None | Some(0) => NameSide::Both,
            Some(1) => NameSide::Only(Side::Left),
            Some(2) => NameSide::Only(Side::Right),
            Some(code) => {
                return Err(DecodeError::UnsupportedCode {
                    table: Self::TABLE,
                    column: "SOL",
                    code,
                });
            }
        };
        Ok(Self {
            segment,
            name: row.text("FULLNAME").map(str::to_owned),
            language: row.text("NAMELC").map(str::to_owned),
            name_side,
            left: AddressRange::decode(segment, Side::Left, row),
            right: AddressRange::decode(segment, Side::Right, row),
        })
    }

    /// Addressing of the requested side.
    #[must_use]
    pub const fn range(&self, side: Side) -> &AddressRange {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Alternate name row (`an.dbf`, `smnm.dbf`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRow {
    pub id: i64,
    pub name: String,
    pub language: Option<String>,
}

impl NameRow {
    fn decode(table: TableKind, row: &Row) -> Result<Self, DecodeError> {
        let id = required_integer(table, row, "ID")?;
        let name = row
            .text("NAME")
            .ok_or(DecodeError::MissingValue {
                table,
                column: "NAME",
            })?
            .to_owned();
        Ok(Self {
            id,
            name,
            language: row.text("NAMELC").map(str::to_owned),
        })
    }
}

/// City centre (`sm.shp`).
#[derive(Debug, Clone, PartialEq)]
pub struct Centroid {
    pub id: i64,
    pub name: Option<String>,
    /// Highest administrative order the city is the seat of; 0 is the
    /// national capital.
    pub admin_class: Option<i64>,
    /// Display importance; lower is more important.
    pub display_class: Option<i64>,
    pub location: Point<f64>,
}

impl Centroid {
    const TABLE: TableKind = TableKind::Centroids;

    fn decode(row: &Row) -> Result<Self, DecodeError> {
        let id = required_integer(Self::TABLE, row, "ID")?;
        let location = row.location().ok_or(DecodeError::MissingGeometry {
            table: Self::TABLE,
            id,
        })?;
        Ok(Self {
            id,
            name: row.text("NAME").map(str::to_owned),
            admin_class: row.integer("ADMINCLASS"),
            display_class: row.integer("DISPCLASS"),
            location,
        })
    }
}
