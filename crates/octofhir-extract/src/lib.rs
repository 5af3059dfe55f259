//! Tabular extraction from FHIR Bundles for OctoFHIR.
//!
//! This crate walks a directory of FHIR JSON Bundles (for example, a Synthea
//! output folder) and flattens the resources it finds into analysis tables:
//! patients, encounters, conditions, medication requests and emergency
//! encounters.
//!
//! # Components
//!
//! - [`BundleLoader`] - Enumerates and decodes Bundle files, reporting the ones it skips
//! - [`Projector`] - Maps one matching resource onto one flat record
//! - [`Table`] - Ordered rows produced by one projector across all files
//! - [`Extractor`] - Drives the loader and a set of projectors over a directory
//! - [`output`] - CSV, NDJSON and JSON array writers for tables
//!
//! # Example
//!
//! ```ignore
//! use octofhir_extract::{Extractor, ExtractorConfig, Profile};
//! use octofhir_extract::output::{OutputFormat, write_tables};
//!
//! let config = ExtractorConfig::new("synthea/output/fhir")
//!     .with_profiles(vec![Profile::Detailed]);
//! let report = Extractor::new(config).run()?;
//!
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! write_tables(&report.tables, "data", OutputFormat::Csv)?;
//! ```

mod bundle;
mod column;
mod datetime;
mod diagnostics;
mod extractor;
mod loader;
pub mod output;
pub mod projector;
pub mod reference;
mod table;
pub mod tree;

pub use bundle::{Bundle, Resource};
pub use column::{ColumnInfo, ColumnType};
pub use datetime::{ClinicalDateTime, InvalidDateTime};
pub use diagnostics::{Diagnostic, DiagnosticKind, FieldIssue, FileError};
pub use extractor::{ExtractionReport, Extractor, ExtractorConfig};
pub use loader::{BundleIter, BundleLoader, DEFAULT_SUFFIX, LoadedFile};
pub use projector::{ExtensionMatch, Profile, Projector, ProjectorOptions, TableProjector};
pub use table::{Row, Table};

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an extraction run.
///
/// Problems with individual files or fields are not errors at this level;
/// they are collected as [`Diagnostic`]s and the run continues.
#[derive(Debug, Error)]
pub enum Error {
    /// The input directory could not be listed.
    #[error("Cannot read input directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An error occurred while generating output.
    #[error("Output error: {0}")]
    Output(String),

    /// Filesystem error outside of per-file processing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The extraction settings are inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
