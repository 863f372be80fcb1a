//! Generic attribute rows as handed over by table readers.

use std::collections::BTreeMap;

use geo::Point;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Character data; readers keep the fixed-width padding.
    Text(String),
    /// Numeric column, including integral identifiers stored as floats.
    Number(f64),
    /// Integer column.
    Integer(i64),
    /// Empty cell or a type the decoders do not use.
    Null,
}

/// One row of an attribute table, optionally with the shape's point geometry.
///
/// # Examples
/// ```
/// use roadnet_core::Row;
///
/// let row = Row::new()
///     .with_number("ID", 10200000000143.0)
///     .with_text("L_PC", "AD700   ");
/// assert_eq!(row.integer("ID"), Some(10_200_000_000_143));
/// assert_eq!(row.text("L_PC"), Some("AD700"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: BTreeMap<String, FieldValue>,
    location: Option<Point<f64>>,
}

// Integral f64 values up to 2^53 convert exactly.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing any previous one.
    pub fn insert(&mut self, column: &str, value: FieldValue) {
        self.fields.insert(column.to_owned(), value);
    }

    #[must_use]
    pub fn with_text(mut self, column: &str, value: &str) -> Self {
        self.insert(column, FieldValue::Text(value.to_owned()));
        self
    }

    #[must_use]
    pub fn with_number(mut self, column: &str, value: f64) -> Self {
        self.insert(column, FieldValue::Number(value));
        self
    }

    #[must_use]
    pub fn with_integer(mut self, column: &str, value: i64) -> Self {
        self.insert(column, FieldValue::Integer(value));
        self
    }

    #[must_use]
    pub const fn with_location(mut self, location: Point<f64>) -> Self {
        self.location = Some(location);
        self
    }

    /// Raw value of a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// Point geometry of the shape this row belongs to, if any.
    #[must_use]
    pub const fn location(&self) -> Option<Point<f64>> {
        self.location
    }

    /// Trimmed, non-empty character value.
    #[must_use]
    pub fn text(&self, column: &str) -> Option<&str> {
        match self.get(column)? {
            FieldValue::Text(value) => Some(value.trim()).filter(|trimmed| !trimmed.is_empty()),
            _ => None,
        }
    }

    /// Integral value of a numeric, integer or numeric-looking text column.
    #[must_use]
    pub fn integer(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            FieldValue::Integer(value) => Some(*value),
            FieldValue::Number(value) => float_to_integer(*value),
            FieldValue::Text(value) => value.trim().parse().ok(),
            FieldValue::Null => None,
        }
    }

    /// Column value rendered as text; integral numbers print without a fraction.
    ///
    /// House numbers and postcodes are stored as either type depending on the
    /// country.
    #[must_use]
    pub fn display(&self, column: &str) -> Option<String> {
        match self.get(column)? {
            FieldValue::Text(_) => self.text(column).map(str::to_owned),
            FieldValue::Integer(value) => Some(value.to_string()),
            FieldValue::Number(value) => float_to_integer(*value)
                .map(|integral| integral.to_string())
                .or_else(|| value.is_finite().then(|| value.to_string())),
            FieldValue::Null => None,
        }
    }
}

fn float_to_integer(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT_FLOAT)
        .then(|| value as i64)
}
