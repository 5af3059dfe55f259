//! Directory enumeration and Bundle decoding.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bundle::Bundle;
use crate::diagnostics::FileError;
use crate::{Error, Result};

/// File name suffix of candidate documents.
pub const DEFAULT_SUFFIX: &str = ".json";

/// Finds Bundle documents in one directory.
#[derive(Debug, Clone)]
pub struct BundleLoader {
    dir: PathBuf,
    suffix: String,
    sorted: bool,
}

impl BundleLoader {
    /// Create a loader for `dir` with the default `.json` suffix and sorted order.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            suffix: DEFAULT_SUFFIX.to_string(),
            sorted: true,
        }
    }

    /// Set the (case-sensitive) file name suffix of candidate files.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Process files by name order (`true`) or in directory enumeration order.
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List candidate files and return a lazy iterator over decoded Bundles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Directory`] when the directory cannot be listed. Problems
    /// with individual files are yielded by the iterator instead.
    pub fn load(&self) -> Result<BundleIter> {
        let directory_error = |source| Error::Directory {
            path: self.dir.clone(),
            source,
        };

        let mut candidates = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(directory_error)? {
            let entry = entry.map_err(directory_error)?;
            let name = entry.file_name();
            if name.to_string_lossy().ends_with(&self.suffix) && entry.path().is_file() {
                candidates.push(name);
            }
        }

        if self.sorted {
            candidates.sort();
        }

        tracing::debug!(
            dir = %self.dir.display(),
            candidates = candidates.len(),
            "Listed bundle candidates"
        );

        Ok(BundleIter {
            dir: self.dir.clone(),
            candidates: candidates.into_iter(),
        })
    }
}

/// Outcome of loading one candidate file.
#[derive(Debug)]
pub struct LoadedFile {
    pub file_name: String,
    pub bundle: std::result::Result<Bundle, FileError>,
}

/// Lazily reads and validates candidate files, one per `next()`.
#[derive(Debug)]
pub struct BundleIter {
    dir: PathBuf,
    candidates: std::vec::IntoIter<OsString>,
}

impl Iterator for BundleIter {
    type Item = LoadedFile;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.candidates.next()?;
        let file_name = name.to_string_lossy().into_owned();
        let bundle = read_bundle(&self.dir.join(&name), &file_name);
        Some(LoadedFile { file_name, bundle })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.candidates.size_hint()
    }
}

fn read_bundle(path: &Path, file_name: &str) -> std::result::Result<Bundle, FileError> {
    let bytes = fs::read(path)?;
    let value = serde_json::from_slice(&bytes)?;
    Bundle::from_value(file_name, value)
}
