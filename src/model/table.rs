//! Table model structures.

use serde::{Deserialize, Serialize};

/// A decoded row: one value per cell element, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    /// Create a row from its cell values.
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Cell values of this row.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Get a cell value by position.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if this row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over cell values.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A decoded worksheet.
///
/// Rows without cells are never stored; the table is read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, dropping rows that have no cells.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let rows = rows.into_iter().filter(|r| !r.is_empty()).collect();
        Self { rows }
    }

    /// Rows in document order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get a row by position.
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Take ownership of the rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Copy the cell values out as nested vectors.
    pub fn to_vecs(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|r| r.cells.clone()).collect()
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rows_dropped() {
        let table = Table::from_rows(vec![
            Row::from_iter(["a", "b"]),
            Row::default(),
            Row::from_iter([""]),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.to_vecs(), vec![vec!["a", "b"], vec![""]]);
    }

    #[test]
    fn test_row_access() {
        let row: Row = ["x", "y"].into_iter().collect();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get(1), Some("y"));
        assert_eq!(row.get(2), None);
        assert_eq!(row.iter().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_table_access() {
        let table: Table = vec![Row::from_iter(["a"]), Row::from_iter(["b", "c"])]
            .into_iter()
            .collect();
        assert_eq!(table.get(1).and_then(|r| r.get(0)), Some("b"));
        assert!(table.get(2).is_none());

        let rows = table.into_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells(), ["a"]);
    }

    #[test]
    fn test_serializes_as_nested_arrays() {
        let table: Table = vec![Row::from_iter(["a"]), Row::from_iter(["b", "c"])]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"[["a"],["b","c"]]"#);
    }
}
