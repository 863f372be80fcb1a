//! Per-zone attribute lookup.
//!
//! Tables are read once through a [`TableSource`], decoded into typed
//! [`Record`]s and indexed by their join key. Lookups never touch the source
//! again.

mod records;
mod row;

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use thiserror::Error;

pub use records::{
    AddressRange, Centroid, DecodeError, Direction, GeocodeRow, HouseNumberBounds,
    InterpolationKind, NameRow, NameSide, Record, Side, SpeedRow, TableKind,
};
pub use row::{FieldValue, Row};

/// Failure reported by a [`TableSource`] while reading raw rows.
#[derive(Debug, Error)]
pub enum TableError {
    /// The zone has no file for this table.
    #[error("table {table} is not present")]
    Absent {
        /// Requested table.
        table: TableKind,
    },
    /// The table exists but could not be read.
    #[error("failed to read table {table}: {source}")]
    Read {
        /// Table being read.
        table: TableKind,
        /// Reader failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Supplier of raw attribute rows for one zone.
pub trait TableSource {
    /// Zone the tables belong to, used in error messages.
    fn zone(&self) -> &str;

    /// Read every row of a table in source order.
    ///
    /// Returns [`TableError::Absent`] when the zone has no such table.
    fn read_table(&self, kind: TableKind) -> Result<Vec<Row>, TableError>;
}

/// A table was requested that the zone does not provide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("zone {zone} has no {table} table")]
pub struct MissingTableError {
    /// Requested table.
    pub table: TableKind,
    /// Zone being converted.
    pub zone: String,
}

/// Errors raised while loading an [`AttributeStore`].
#[derive(Debug, Error)]
pub enum AttributeError {
    /// A required table is absent.
    #[error(transparent)]
    Missing(#[from] MissingTableError),
    /// A table could not be read.
    #[error("zone {zone}: {source}")]
    Read {
        /// Zone being loaded.
        zone: String,
        /// Reader failure.
        #[source]
        source: TableError,
    },
    /// A row could not be decoded.
    #[error("zone {zone}, row {row}: {source}")]
    Decode {
        /// Zone being loaded.
        zone: String,
        /// Zero-based row index in the table.
        row: usize,
        /// Decoder failure.
        #[source]
        source: DecodeError,
    },
}

/// Read-only, per-zone index of decoded attribute records.
///
/// # Examples
/// ```
/// use roadnet_core::{AttributeStore, Row, TableError, TableKind, TableSource};
///
/// struct SpeedTable;
///
/// impl TableSource for SpeedTable {
///     fn zone(&self) -> &str {
///         "Andorra"
///     }
///
///     fn read_table(&self, kind: TableKind) -> Result<Vec<Row>, TableError> {
///         match kind {
///             TableKind::SpeedRestrictions => Ok(vec![
///                 Row::new().with_integer("ID", 7).with_integer("SPEED", 50),
///             ]),
///             table => Err(TableError::Absent { table }),
///         }
///     }
/// }
///
/// let store = AttributeStore::load(&SpeedTable, &[TableKind::SpeedRestrictions])?;
/// assert_eq!(store.lookup(TableKind::SpeedRestrictions, 7)?.len(), 1);
/// assert!(store.lookup(TableKind::SpeedRestrictions, 8)?.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    zone: String,
    tables: BTreeMap<TableKind, HashMap<i64, Vec<Record>>>,
}

impl AttributeStore {
    /// Load and index the requested tables.
    ///
    /// Every requested table must exist. Rows with codes outside the
    /// documented sets are skipped with a warning; rows without a key are
    /// rejected.
    pub fn load<S>(source: &S, kinds: &[TableKind]) -> Result<Self, AttributeError>
    where
        S: TableSource + ?Sized,
    {
        let zone = source.zone().to_owned();
        let mut tables = BTreeMap::new();
        for &kind in kinds {
            if tables.contains_key(&kind) {
                continue;
            }
            let rows = source.read_table(kind).map_err(|err| match err {
                TableError::Absent { table } => AttributeError::Missing(MissingTableError {
                    table,
                    zone: zone.clone(),
                }),
                other => AttributeError::Read {
                    zone: zone.clone(),
                    source: other,
                },
            })?;
            let index = index_rows(&zone, kind, &rows)?;
            debug!("zone {zone}: indexed {} keys from {kind}", index.len());
            tables.insert(kind, index);
        }
        Ok(Self { zone, tables })
    }

    /// Zone the store was loaded for.
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Records keyed by `id`, in source order.
    ///
    /// A missing row yields an empty slice; a table that was not loaded is a
    /// [`MissingTableError`].
    pub fn lookup(&self, kind: TableKind, id: i64) -> Result<&[Record], MissingTableError> {
        let table = self.tables.get(&kind).ok_or_else(|| MissingTableError {
            table: kind,
            zone: self.zone.clone(),
        })?;
        Ok(table.get(&id).map_or(&[], Vec::as_slice))
    }

    /// Speed-restriction rows of a segment.
    pub fn speed_rows(&self, segment: i64) -> Result<Vec<&SpeedRow>, MissingTableError> {
        Ok(self
            .lookup(TableKind::SpeedRestrictions, segment)?
            .iter()
            .filter_map(|record| match record {
                Record::SpeedRestriction(row) => Some(row),
                _ => None,
            })
            .collect())
    }

    /// Geocode rows of a segment.
    pub fn geocodes(&self, segment: i64) -> Result<Vec<&GeocodeRow>, MissingTableError> {
        Ok(self
            .lookup(TableKind::Geocodes, segment)?
            .iter()
            .filter_map(|record| match record {
                Record::Geocode(row) => Some(row),
                _ => None,
            })
            .collect())
    }

    /// Alternate names of an administrative area.
    pub fn area_names(&self, id: i64) -> Result<Vec<&NameRow>, MissingTableError> {
        Ok(self
            .lookup(TableKind::AreaNames, id)?
            .iter()
            .filter_map(|record| match record {
                Record::AreaName(row) => Some(row),
                _ => None,
            })
            .collect())
    }

    /// Alternate names of a city centre.
    pub fn city_names(&self, id: i64) -> Result<Vec<&NameRow>, MissingTableError> {
        Ok(self
            .lookup(TableKind::CityNames, id)?
            .iter()
            .filter_map(|record| match record {
                Record::CityName(row) => Some(row),
                _ => None,
            })
            .collect())
    }

    /// First city centre with the given id.
    pub fn centroid(&self, id: i64) -> Result<Option<&Centroid>, MissingTableError> {
        Ok(self
            .lookup(TableKind::Centroids, id)?
            .iter()
            .find_map(|record| match record {
                Record::Centroid(row) => Some(row),
                _ => None,
            }))
    }
}

fn index_rows(
    zone: &str,
    kind: TableKind,
    rows: &[Row],
) -> Result<HashMap<i64, Vec<Record>>, AttributeError> {
    let mut index: HashMap<i64, Vec<Record>> = HashMap::new();
    for (position, row) in rows.iter().enumerate() {
        match kind.decode(row) {
            Ok(record) => index.entry(record.key()).or_default().push(record),
            Err(err @ DecodeError::UnsupportedCode { .. }) => {
                warn!("zone {zone}: skipping row {position}: {err}");
            }
            Err(source) => {
                return Err(AttributeError::Decode {
                    zone: zone.to_owned(),
                    row: position,
                    source,
                });
            }
        }
    }
    Ok(index)
}
