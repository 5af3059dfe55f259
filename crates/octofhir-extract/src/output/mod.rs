//! Output format writers for extracted tables.
//!
//! This module provides writers for different output formats:
//! - CSV
//! - NDJSON (Newline Delimited JSON)
//! - JSON Array
//!
//! [`write_tables`] writes one `<table>.<ext>` file per table.

mod csv;
mod ndjson;

pub use csv::CsvWriter;
pub use ndjson::{JsonArrayWriter, NdjsonWriter};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::table::Table;
use crate::{Error, Result};

/// Trait for writing tables to different output formats.
pub trait OutputWriter {
    /// Get the file extension for this format.
    fn file_extension(&self) -> &'static str;

    /// Write the table to the output.
    fn write(&self, table: &Table, output: &mut dyn Write) -> Result<()>;
}

/// Output format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values.
    #[default]
    Csv,

    /// Newline-delimited JSON.
    #[serde(alias = "jsonl")]
    Ndjson,

    /// JSON array.
    Json,
}

impl OutputFormat {
    /// Parse an output format from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the format string is not recognized.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "json" => Ok(Self::Json),
            _ => Err(Error::output(format!("Unknown format: {s}"))),
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Ndjson => "ndjson",
            Self::Json => "json",
        }
    }

    /// Writer with default settings for this format.
    pub fn writer(&self) -> Box<dyn OutputWriter> {
        match self {
            Self::Csv => Box::new(CsvWriter::new()),
            Self::Ndjson => Box::new(NdjsonWriter::new()),
            Self::Json => Box::new(JsonArrayWriter::new()),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Write each table to `<dir>/<table>.<ext>` with the default writer of
/// `format`, creating `dir` if needed.
///
/// Returns the written paths in table order.
pub fn write_tables(
    tables: &[Table],
    dir: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    write_tables_with(tables, dir, format.writer().as_ref())
}

/// Like [`write_tables`], with an explicitly configured writer.
pub fn write_tables_with(
    tables: &[Table],
    dir: impl AsRef<Path>,
    writer: &dyn OutputWriter,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| {
        Error::output(format!("Cannot create output directory {}: {e}", dir.display()))
    })?;

    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let path = dir.join(format!("{}.{}", table.name, writer.file_extension()));
        let file = File::create(&path)
            .map_err(|e| Error::output(format!("Cannot create {}: {e}", path.display())))?;
        let mut out = BufWriter::new(file);
        writer.write(table, &mut out)?;
        out.flush()
            .map_err(|e| Error::output(format!("Cannot write {}: {e}", path.display())))?;

        tracing::debug!(
            table = %table.name,
            rows = table.len(),
            path = %path.display(),
            "Wrote table"
        );
        written.push(path);
    }

    Ok(written)
}
