//! NDJSON and JSON array output writers for tables.

use std::io::Write;

use serde_json::{Map, Value};

use super::OutputWriter;
use crate::table::Table;
use crate::Result;

/// Row as an object keyed by column name, without its null cells.
fn sparse_object(table: &Table, row: &[Value]) -> Value {
    let obj: Map<String, Value> = table
        .columns
        .iter()
        .zip(row)
        .filter(|(_, value)| !value.is_null())
        .map(|(col, value)| (col.name.clone(), value.clone()))
        .collect();
    Value::Object(obj)
}

/// NDJSON output writer.
///
/// Writes each row as a JSON object on its own line. Null cells are omitted.
#[derive(Debug, Clone, Default)]
pub struct NdjsonWriter;

impl NdjsonWriter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputWriter for NdjsonWriter {
    fn file_extension(&self) -> &'static str {
        "ndjson"
    }

    fn write(&self, table: &Table, output: &mut dyn Write) -> Result<()> {
        for row in &table.rows {
            serde_json::to_writer(&mut *output, &sparse_object(table, row))?;
            output.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// JSON array output writer.
///
/// Writes all rows as one array of objects. Null cells are kept as `null`.
#[derive(Debug, Clone, Default)]
pub struct JsonArrayWriter {
    /// Whether to pretty-print the output.
    pub pretty: bool,
}

impl JsonArrayWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty-printing.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl OutputWriter for JsonArrayWriter {
    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn write(&self, table: &Table, output: &mut dyn Write) -> Result<()> {
        let rows = table.to_json_array();

        if self.pretty {
            serde_json::to_writer_pretty(&mut *output, &rows)?;
        } else {
            serde_json::to_writer(&mut *output, &rows)?;
        }
        output.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnInfo;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    fn encounters() -> Table {
        let mut table = Table::new(
            "encounters",
            vec![
                ColumnInfo::string("encounter_id"),
                ColumnInfo::string("type_code"),
            ],
        );
        table.append([
            vec![json!("e1"), json!("50849002")],
            vec![json!("e2"), Value::Null],
        ]);
        table
    }

    #[test]
    fn test_ndjson_writer_omits_nulls() {
        let mut output = Vec::new();
        NdjsonWriter::new().write(&encounters(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_json_eq!(lines[0], json!({"encounter_id": "e1", "type_code": "50849002"}));
        assert_json_eq!(lines[1], json!({"encounter_id": "e2"}));
    }

    #[test]
    fn test_json_array_writer_keeps_nulls() {
        let mut output = Vec::new();
        JsonArrayWriter::new()
            .write(&encounters(), &mut output)
            .unwrap();

        let parsed: Value = serde_json::from_slice(&output).unwrap();
        assert_json_eq!(
            parsed,
            json!([
                {"encounter_id": "e1", "type_code": "50849002"},
                {"encounter_id": "e2", "type_code": null}
            ])
        );
    }

    #[test]
    fn test_json_array_writer_pretty() {
        let mut output = Vec::new();
        JsonArrayWriter::new()
            .with_pretty(true)
            .write(&encounters(), &mut output)
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("[\n  {\n"));
        assert!(text.lines().count() > 3);
    }

    #[test]
    fn test_json_array_writer_empty_table() {
        let mut output = Vec::new();
        let table = Table::new("er_encounters", vec![ColumnInfo::string("encounter_id")]);
        JsonArrayWriter::new().with_pretty(true).write(&table, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap().trim(), "[]");
    }
}
