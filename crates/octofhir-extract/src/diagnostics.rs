//! Recoverable problems found while processing individual files.
//!
//! Nothing in here stops a run. A [`FileError`] means a whole file was
//! skipped; a [`FieldIssue`] means one field of one record was dropped to
//! null. Both end up as [`Diagnostic`]s on the extraction report.

use std::fmt;

use thiserror::Error;

use crate::datetime::InvalidDateTime;

/// Why a candidate file did not reach the projectors.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("error decoding JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("document root is not a JSON object")]
    NotAnObject,

    #[error("not a FHIR Bundle or empty")]
    NotABundle,
}

impl FileError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::Io(_) => DiagnosticKind::Io,
            Self::Decode(_) => DiagnosticKind::Decode,
            Self::NotAnObject | Self::NotABundle => DiagnosticKind::Shape,
        }
    }
}

/// A present but unusable field value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldIssue {
    #[error("{resource} {field}: {source}")]
    InvalidDateTime {
        /// `Type/id` label of the resource the value came from.
        resource: String,
        field: &'static str,
        #[source]
        source: InvalidDateTime,
    },
}

/// Category of a diagnostic, for summaries and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Io,
    Decode,
    Shape,
    Field,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "io"),
            Self::Decode => write!(f, "decode"),
            Self::Shape => write!(f, "shape"),
            Self::Field => write!(f, "field"),
        }
    }
}

/// One human-readable report line, keyed by file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn for_file(file: impl Into<String>, error: &FileError) -> Self {
        Self {
            file: file.into(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn for_field(file: impl Into<String>, issue: &FieldIssue) -> Self {
        Self {
            file: file.into(),
            kind: DiagnosticKind::Field,
            message: issue.to_string(),
        }
    }

    /// Whether the whole file was skipped.
    pub fn is_file_skip(&self) -> bool {
        self.kind != DiagnosticKind::Field
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_kinds() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        assert_eq!(FileError::from(json_err).kind(), DiagnosticKind::Decode);
        assert_eq!(FileError::NotABundle.kind(), DiagnosticKind::Shape);
        assert_eq!(FileError::NotAnObject.kind(), DiagnosticKind::Shape);

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(FileError::from(io_err).kind(), DiagnosticKind::Io);
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::for_file("notes.json", &FileError::NotABundle);
        assert_eq!(diag.to_string(), "notes.json: not a FHIR Bundle or empty");
        assert!(diag.is_file_skip());
    }

    #[test]
    fn test_field_diagnostic() {
        let issue = FieldIssue::InvalidDateTime {
            resource: "Condition/c1".to_string(),
            field: "onsetDateTime",
            source: InvalidDateTime {
                value: "yesterday".to_string(),
            },
        };
        let diag = Diagnostic::for_field("bundle.json", &issue);
        assert_eq!(diag.kind, DiagnosticKind::Field);
        assert!(!diag.is_file_skip());
        assert_eq!(
            diag.to_string(),
            "bundle.json: Condition/c1 onsetDateTime: Failed to parse FHIR DateTime 'yesterday'"
        );
    }
}
