//! Core data model types for uploaded tables.
//!
//! Parsing produces a [`Table`]: an ordered list of column headers plus an ordered list of
//! [`Row`]s. Cells are [`CellValue`]s, either a number or a piece of text.

use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A single typed cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Finite 64-bit float.
    Number(f64),
    /// UTF-8 text (may be empty).
    Text(String),
}

impl CellValue {
    /// Convenience constructor for text cells.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns `true` for values that never show up as filter options: empty text and zero.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Number(n) => *n == 0.0 || n.is_nan(),
        }
    }

    /// Compare the natural text representation of this cell against `text`.
    pub fn text_eq(&self, text: &str) -> bool {
        match self {
            Self::Text(s) => s == text,
            Self::Number(_) => self.to_string() == text,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            // `-0` reads as `0` everywhere a user sees it.
            Self::Number(n) if *n == 0.0 => f.write_str("0"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Coerce a raw delimited-text field into a [`CellValue`].
///
/// The field is trimmed first. Non-empty text that parses as a finite decimal number becomes
/// [`CellValue::Number`]; everything else (including the empty string) stays
/// [`CellValue::Text`].
pub fn coerce(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Text(String::new());
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(trimmed.to_owned()),
    }
}

/// One record of a [`Table`].
///
/// Cells are kept as ordered `(header, value)` pairs so duplicate headers survive parsing.
/// Lookup by name returns the last pair with that name. Headers with no pair read as absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(Arc<str>, CellValue)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty row with room for `n` cells.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            cells: Vec::with_capacity(n),
        }
    }

    /// Append a cell.
    pub fn push(&mut self, header: Arc<str>, value: CellValue) {
        self.cells.push((header, value));
    }

    /// Value of column `name`; the last one wins when the header is duplicated.
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .rev()
            .find(|(h, _)| h.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// Iterate `(header, value)` pairs in column order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(h, v)| (h.as_ref(), v))
    }

    /// Number of cells present in this row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the row holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Serialized as a JSON object keyed by header, which is the shape persisted to the record store.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (h, v) in &self.cells {
            map.serialize_entry(h.as_ref(), v)?;
        }
        map.end()
    }
}

/// In-memory table produced by a successful parse.
///
/// Row order is the source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Ordered column headers.
    pub headers: Vec<String>,
    /// Rows in source order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of headers in the table.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Shared header names for building [`Row`]s without re-allocating each name per cell.
pub(crate) fn shared_headers(headers: &[String]) -> Vec<Arc<str>> {
    headers.iter().map(|h| Arc::from(h.as_str())).collect()
}
