//! Column metadata for extracted tables.

use serde::{Deserialize, Serialize};

/// Information about a column in an extracted table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Header name; also the record field it is filled from.
    pub name: String,

    /// What the cell strings hold.
    pub col_type: ColumnType,

    /// Missing source data leaves the cell null.
    pub nullable: bool,

    /// Source element, shown by `octofhir-extract tables`.
    pub description: Option<String>,
}

impl ColumnInfo {
    /// Create a new nullable column.
    pub fn new(name: impl Into<String>, col_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            col_type,
            nullable: true,
            description: None,
        }
    }

    /// Shorthand for a nullable string column.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Data types of extracted columns.
///
/// Values are carried as JSON strings in every case; the type documents
/// what the string holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text, identifiers and codes.
    #[default]
    String,

    /// Date values (YYYY-MM-DD), copied verbatim from the resource.
    Date,

    /// Date-time values copied verbatim from the resource.
    DateTime,

    /// Date-time values parsed and re-rendered in RFC 3339 form.
    Timestamp,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Date => write!(f, "date"),
            Self::DateTime => write!(f, "dateTime"),
            Self::Timestamp => write!(f, "timestamp"),
        }
    }
}
