//! CSV output writer for tables.

use std::io::Write;

use serde_json::Value;

use super::OutputWriter;
use crate::table::Table;
use crate::{Error, Result};

/// CSV output writer configuration.
#[derive(Debug, Clone)]
pub struct CsvWriter {
    /// Whether to include a header row.
    pub include_header: bool,

    /// Field delimiter (default: comma).
    pub delimiter: u8,

    /// Quote character (default: double quote).
    pub quote: u8,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self {
            include_header: true,
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl CsvWriter {
    /// Create a new CSV writer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include a header row.
    pub fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character.
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }
}

/// Render a cell. Missing values become empty fields.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn csv_error(e: csv::Error) -> Error {
    Error::output(e.to_string())
}

impl OutputWriter for CsvWriter {
    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn write(&self, table: &Table, output: &mut dyn Write) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .has_headers(false)
            .from_writer(output);

        if self.include_header {
            writer
                .write_record(table.columns.iter().map(|c| c.name.as_str()))
                .map_err(csv_error)?;
        }

        for row in &table.rows {
            writer
                .write_record(row.iter().map(cell))
                .map_err(csv_error)?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnInfo;
    use serde_json::json;

    fn patients() -> Table {
        let mut table = Table::new(
            "patients",
            vec![
                ColumnInfo::string("id"),
                ColumnInfo::string("address_street"),
                ColumnInfo::string("marital_status"),
            ],
        );
        table.append([
            vec![json!("p1"), json!("42 Elm Street, Apt 3"), json!("M")],
            vec![json!("p2"), Value::Null, json!("say \"S\"")],
        ]);
        table
    }

    fn render(writer: &CsvWriter, table: &Table) -> String {
        let mut output = Vec::new();
        writer.write(table, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_csv_writer() {
        let csv = render(&CsvWriter::new(), &patients());
        assert_eq!(
            csv,
            "id,address_street,marital_status\n\
             p1,\"42 Elm Street, Apt 3\",M\n\
             p2,,\"say \"\"S\"\"\"\n"
        );
    }

    #[test]
    fn test_csv_writer_no_header() {
        let csv = render(&CsvWriter::new().with_header(false), &patients());
        assert!(csv.starts_with("p1,"));
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_csv_writer_delimiter() {
        let csv = render(&CsvWriter::new().with_delimiter(b';'), &patients());
        assert!(csv.starts_with("id;address_street;marital_status\n"));
        assert!(csv.contains("p1;42 Elm Street, Apt 3;M\n"));
    }

    #[test]
    fn test_csv_writer_quote() {
        let csv = render(&CsvWriter::new().with_quote(b'\''), &patients());
        assert!(csv.contains("p1,'42 Elm Street, Apt 3',M\n"));
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let table = Table::new("encounters", vec![ColumnInfo::string("encounter_id")]);
        assert_eq!(render(&CsvWriter::new(), &table), "encounter_id\n");
    }

    #[test]
    fn test_cell() {
        assert_eq!(cell(&Value::Null), "");
        assert_eq!(cell(&json!(true)), "true");
        assert_eq!(cell(&json!(42)), "42");
        assert_eq!(cell(&json!("hello")), "hello");
        assert_eq!(cell(&json!(["a", "b"])), r#"["a","b"]"#);
    }
}
