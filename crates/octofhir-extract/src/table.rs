//! Extracted tables.

use serde_json::Value;

use crate::column::ColumnInfo;

/// One table row; values line up with the table's columns.
pub type Row = Vec<Value>;

/// Ordered rows produced by one projector across every loaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name, also used as the output file stem.
    pub name: String,

    /// Column metadata, in output order.
    pub columns: Vec<ColumnInfo>,

    /// Row data as JSON values.
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append rows after the existing ones, keeping their order.
    pub fn append(&mut self, rows: impl IntoIterator<Item = Row>) {
        self.rows.extend(rows);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert the table to a JSON array of objects.
    pub fn to_json_array(&self) -> Vec<Value> {
        (0..self.rows.len())
            .filter_map(|i| self.row_as_object(i))
            .collect()
    }

    /// Get a single row by index as a JSON object.
    pub fn row_as_object(&self, index: usize) -> Option<Value> {
        self.rows.get(index).map(|row| {
            let mut obj = serde_json::Map::new();
            for (col, value) in self.columns.iter().zip(row.iter()) {
                obj.insert(col.name.clone(), value.clone());
            }
            Value::Object(obj)
        })
    }

    /// Get column values by name.
    pub fn column_values(&self, name: &str) -> Option<Vec<&Value>> {
        let col_index = self.columns.iter().position(|c| c.name == name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(col_index))
                .collect(),
        )
    }
}
