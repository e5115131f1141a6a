//! Equality filters over [`crate::types::Table`] rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Row, Table};

/// Selected value per column.
///
/// An absent entry or an empty value means "no constraint on this column". Values are text; cells
/// are compared through their natural text representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSelection {
    entries: BTreeMap<String, String>,
}

impl FilterSelection {
    /// Create an empty selection (matches every row).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selected value for `column`. An empty `value` removes the constraint.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        if value.is_empty() {
            self.entries.remove(&column);
        } else {
            self.entries.insert(column, value);
        }
    }

    /// Builder-style [`Self::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    /// Selected value for `column`, if constrained.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Remove every constraint.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Active `(column, value)` constraints, ordered by column name.
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` if no constraint is active.
    pub fn is_empty(&self) -> bool {
        self.constraints().next().is_none()
    }
}

/// Returns `true` if `row` satisfies every active constraint of `selection`.
///
/// A constrained column that is absent from the row never matches.
pub fn matches(row: &Row, selection: &FilterSelection) -> bool {
    selection
        .constraints()
        .all(|(column, want)| row.get(column).is_some_and(|cell| cell.text_eq(want)))
}

/// Rows of `table` that match `selection`, in table order.
pub fn filter_rows<'a>(table: &'a Table, selection: &FilterSelection) -> Vec<&'a Row> {
    table.rows.iter().filter(|row| matches(row, selection)).collect()
}

/// Indices of the rows of `table` that match `selection`, ascending.
pub fn matching_indices(table: &Table, selection: &FilterSelection) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| matches(row, selection))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::csv::{DEFAULT_DELIMITER, ingest_csv_from_bytes};
    use crate::types::CellValue;

    fn sample_table() -> Table {
        ingest_csv_from_bytes(
            b"Name,Country,Grade\nAlice,US,3\nBob,,2\nCara,UK,3\nDan,UK,1\n",
            DEFAULT_DELIMITER,
        )
        .unwrap()
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter()
            .map(|r| r.get("Name").map(CellValue::to_string).unwrap_or_default())
            .collect()
    }

    #[test]
    fn empty_selection_matches_everything() {
        let table = sample_table();
        let selection = FilterSelection::new();
        assert!(table.rows.iter().all(|r| matches(r, &selection)));
        assert_eq!(filter_rows(&table, &selection).len(), table.row_count());
    }

    #[test]
    fn text_constraint_keeps_source_order() {
        let table = sample_table();
        let selection = FilterSelection::new().with("Country", "UK");
        assert_eq!(names(&filter_rows(&table, &selection)), vec!["Cara", "Dan"]);
        assert_eq!(matching_indices(&table, &selection), vec![2, 3]);
    }

    #[test]
    fn numeric_cells_compare_as_text() {
        let table = sample_table();
        let selection = FilterSelection::new().with("Grade", "3");
        assert_eq!(names(&filter_rows(&table, &selection)), vec!["Alice", "Cara"]);

        let selection = FilterSelection::new().with("Grade", "3.0");
        assert!(filter_rows(&table, &selection).is_empty());
    }

    #[test]
    fn constraints_combine_with_and() {
        let table = sample_table();
        let selection = FilterSelection::new().with("Country", "UK").with("Grade", "1");
        assert_eq!(names(&filter_rows(&table, &selection)), vec!["Dan"]);
    }

    #[test]
    fn empty_value_clears_constraint() {
        let mut selection = FilterSelection::new().with("Country", "UK");
        selection.set("Country", "");
        assert!(selection.is_empty());
        assert_eq!(selection.get("Country"), None);
    }

    #[test]
    fn constraint_on_missing_column_matches_nothing() {
        let table = sample_table();
        let selection = FilterSelection::new().with("Division", "R&D");
        assert!(filter_rows(&table, &selection).is_empty());
    }

    #[test]
    fn selection_serializes_as_plain_object() {
        let selection = FilterSelection::new().with("Country", "UK");
        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json, serde_json::json!({"Country": "UK"}));
        let back: FilterSelection = serde_json::from_value(json).unwrap();
        assert_eq!(back, selection);
    }
}
