//! The extraction driver.
//!
//! One pass over the input directory feeds every loaded Bundle to every
//! enabled projector. Tables are built in file order, then entry order.

use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostic;
use crate::loader::{BundleLoader, DEFAULT_SUFFIX};
use crate::projector::{Profile, ProjectorOptions, TableProjector};
use crate::table::Table;
use crate::Result;

/// Settings of one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub input_dir: PathBuf,
    pub suffix: String,
    pub sorted: bool,
    pub profiles: Vec<Profile>,
    pub options: ProjectorOptions,
}

impl ExtractorConfig {
    /// Extract the detailed profile from `input_dir`.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            suffix: DEFAULT_SUFFIX.to_string(),
            sorted: true,
            profiles: vec![Profile::Detailed],
            options: ProjectorOptions::default(),
        }
    }

    pub fn with_profiles(mut self, profiles: impl IntoIterator<Item = Profile>) -> Self {
        self.profiles = profiles.into_iter().collect();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    pub fn with_options(mut self, options: ProjectorOptions) -> Self {
        self.options = options;
        self
    }

    /// Projectors of the enabled profiles, each profile taken once.
    pub fn projectors(&self) -> Vec<Box<dyn TableProjector>> {
        let mut seen = Vec::new();
        let mut projectors = Vec::new();
        for profile in &self.profiles {
            if seen.contains(profile) {
                continue;
            }
            seen.push(*profile);
            projectors.extend(profile.projectors(&self.options));
        }
        projectors
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// One table per enabled projector, in profile order.
    pub tables: Vec<Table>,

    /// Skipped files and dropped fields, in processing order.
    pub diagnostics: Vec<Diagnostic>,

    /// Candidate files found in the input directory.
    pub files_seen: usize,

    /// Files that decoded into a usable Bundle.
    pub files_loaded: usize,

    /// Files that were skipped entirely.
    pub files_skipped: usize,
}

impl ExtractionReport {
    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Total number of rows across all tables.
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(Table::len).sum()
    }
}

/// Runs the loader and projectors over one directory.
pub struct Extractor {
    config: ExtractorConfig,
    projectors: Vec<Box<dyn TableProjector>>,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        let projectors = config.projectors();
        Self { config, projectors }
    }

    pub fn input_dir(&self) -> &Path {
        &self.config.input_dir
    }

    /// Empty tables this extractor will fill, in output order.
    pub fn tables(&self) -> Vec<Table> {
        self.projectors.iter().map(|p| p.empty_table()).collect()
    }

    /// Process every candidate file.
    ///
    /// # Errors
    ///
    /// Only a failure to list the input directory is returned; unreadable or
    /// malformed files are recorded as diagnostics and skipped.
    pub fn run(&self) -> Result<ExtractionReport> {
        let loader = BundleLoader::new(&self.config.input_dir)
            .with_suffix(self.config.suffix.clone())
            .with_sorted(self.config.sorted);

        let mut report = ExtractionReport {
            tables: self.tables(),
            ..Default::default()
        };

        for file in loader.load()? {
            report.files_seen += 1;

            let bundle = match file.bundle {
                Ok(bundle) => bundle,
                Err(e) => {
                    tracing::debug!(file = %file.file_name, error = %e, "Skipping file");
                    report.files_skipped += 1;
                    report
                        .diagnostics
                        .push(Diagnostic::for_file(&file.file_name, &e));
                    continue;
                }
            };
            report.files_loaded += 1;

            let mut issues = Vec::new();
            for (projector, table) in self.projectors.iter().zip(report.tables.iter_mut()) {
                table.append(projector.project_bundle(&bundle, &mut issues));
            }

            tracing::debug!(
                file = %file.file_name,
                entries = bundle.entries().len(),
                issues = issues.len(),
                "Processed bundle"
            );

            for issue in &issues {
                tracing::debug!(file = %file.file_name, "{issue}");
                report
                    .diagnostics
                    .push(Diagnostic::for_field(&file.file_name, issue));
            }
        }

        tracing::info!(
            dir = %self.config.input_dir.display(),
            files_seen = report.files_seen,
            files_loaded = report.files_loaded,
            files_skipped = report.files_skipped,
            rows = report.total_rows(),
            "Extraction finished"
        );

        Ok(report)
    }
}
