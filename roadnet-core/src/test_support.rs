//! Test helpers shared across crates.
//!
//! Compiled for unit tests and, through the `test-support` feature, for other
//! crates' test suites.

use std::collections::BTreeMap;

use crate::{Row, TableError, TableKind, TableSource};

/// In-memory [`TableSource`].
#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    zone: String,
    tables: BTreeMap<TableKind, Vec<Row>>,
}

impl MemoryTables {
    /// Create an empty source for `zone`.
    #[must_use]
    pub fn new(zone: &str) -> Self {
        Self {
            zone: zone.to_owned(),
            tables: BTreeMap::new(),
        }
    }

    /// Add or replace a table.
    #[must_use]
    pub fn with_table(mut self, kind: TableKind, rows: Vec<Row>) -> Self {
        self.tables.insert(kind, rows);
        self
    }
}

impl TableSource for MemoryTables {
    fn zone(&self) -> &str {
        &self.zone
    }

    fn read_table(&self, kind: TableKind) -> Result<Vec<Row>, TableError> {
        self.tables
            .get(&kind)
            .cloned()
            .ok_or(TableError::Absent { table: kind })
    }
}
