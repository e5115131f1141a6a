//! Distinct values per designated filter column.

use std::collections::BTreeMap;

use crate::types::{CellValue, Table};

/// Distinct non-blank values of one column, ordered by their text representation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSet {
    values: BTreeMap<String, CellValue>,
}

impl OptionSet {
    fn insert(&mut self, value: &CellValue) {
        if value.is_blank() {
            return;
        }
        self.values
            .entry(value.to_string())
            .or_insert_with(|| value.clone());
    }

    /// Values in sorted order.
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.values.values()
    }

    /// Text labels in sorted order, as they would be offered for selection.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns `true` if a value with text representation `label` is present.
    pub fn contains(&self, label: &str) -> bool {
        self.values.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Option sets for each designated filter column, in allow-list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    columns: Vec<(String, OptionSet)>,
}

impl FilterOptions {
    /// Option set for `column`, if it is a designated filter column.
    pub fn get(&self, column: &str) -> Option<&OptionSet> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, set)| set)
    }

    /// Iterate `(column, options)` in allow-list order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionSet)> {
        self.columns.iter().map(|(name, set)| (name.as_str(), set))
    }

    /// Number of designated columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Collect the distinct non-blank values of every column in `filter_columns` across all rows of
/// `table`.
///
/// Blank means empty text or numeric zero. Columns that never occur yield an empty set. Values are
/// deduplicated by text representation, keeping the first one seen.
pub fn derive_options<S: AsRef<str>>(table: &Table, filter_columns: &[S]) -> FilterOptions {
    let mut columns: Vec<(String, OptionSet)> = Vec::with_capacity(filter_columns.len());
    for column in filter_columns {
        let column = column.as_ref();
        if columns.iter().any(|(name, _)| name == column) {
            continue;
        }

        let mut set = OptionSet::default();
        for value in table.rows.iter().filter_map(|row| row.get(column)) {
            set.insert(value);
        }
        columns.push((column.to_owned(), set));
    }

    FilterOptions { columns }
}
