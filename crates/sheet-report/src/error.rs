//! Error types for the report pipeline.
//!
//! Only structural problems surface as [`ReportError`]. Everything that can go
//! wrong inside a single report section is a [`SectionFailure`], which the
//! section renderer turns into fallback content and never returns to callers.
//!
//! Errors are serializable so a delivery layer can forward them as
//! `{code, message}` pairs.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the report pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The table has no columns, so no section can be attempted.
    #[error("Table has no columns")]
    NoColumns,

    /// Columns of the raw table have different lengths.
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedTable {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ReportError>,
    },
}

impl ReportError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ReportError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for upstream handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoColumns => "NO_COLUMNS",
            Self::RaggedTable { .. } => "RAGGED_TABLE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error means the uploaded table itself is unusable.
    ///
    /// Upstream layers reject the upload instead of offering a report when
    /// this returns true.
    pub fn is_structural(&self) -> bool {
        match self {
            Self::NoColumns | Self::RaggedTable { .. } => true,
            Self::WithContext { source, .. } => source.is_structural(),
            _ => false,
        }
    }
}

impl Serialize for ReportError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ReportError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ReportError::Polars(e).with_context(context))
    }
}

/// Why a section could not take its rich rendering path.
///
/// Never escapes the section renderer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SectionFailure {
    /// Not enough usable data for the rich content.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A statistical computation could not produce a finite result.
    #[error("computation failed: {0}")]
    Computation(String),

    /// The chart collaborator failed or had nothing to draw.
    ///
    /// `text` carries the already-computed textual content so the fallback
    /// can still show it.
    #[error("chart rendering failed: {reason}")]
    ChartFailed { reason: String, text: String },
}

impl SectionFailure {
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData(reason.into())
    }

    /// Failures caused by data shape are expected; the others deserve a warning.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::InsufficientData(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(ReportError::NoColumns.error_code(), "NO_COLUMNS");
        assert_eq!(
            ReportError::InvalidConfig("x".to_string()).error_code(),
            "INVALID_CONFIG"
        );
    }

    #[test]
    fn test_is_structural() {
        assert!(ReportError::NoColumns.is_structural());
        assert!(
            ReportError::RaggedTable {
                column: "a".to_string(),
                expected: 3,
                actual: 2
            }
            .is_structural()
        );
        assert!(!ReportError::InvalidConfig("bad".to_string()).is_structural());
    }

    #[test]
    fn test_error_serialization() {
        let error = ReportError::RaggedTable {
            column: "Price".to_string(),
            expected: 4,
            actual: 3,
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("RAGGED_TABLE"));
        assert!(json.contains("Price"));
    }

    #[test]
    fn test_with_context_preserves_code() {
        let error = ReportError::NoColumns.with_context("During preprocessing");
        assert!(error.to_string().contains("During preprocessing"));
        assert_eq!(error.error_code(), "NO_COLUMNS");
        assert!(error.is_structural());
    }

    #[test]
    fn test_section_failure_expected() {
        assert!(SectionFailure::insufficient("no rows").is_expected());
        assert!(!SectionFailure::Computation("nan".to_string()).is_expected());
        assert!(
            !SectionFailure::ChartFailed {
                reason: "io".to_string(),
                text: String::new()
            }
            .is_expected()
        );
    }
}
