use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that terminate an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input directory missing or holding no recognized files.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("missing required field '{field}' (available columns: {available})")]
    Schema {
        field: &'static str,
        available: String,
    },
    #[error("field '{field}', row {row}: cannot interpret {value} as {expected}")]
    InvalidValue {
        field: &'static str,
        row: usize,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read {}: {cause:#}", .path.display())]
    Read { path: PathBuf, cause: anyhow::Error },
    #[error("failed to write chart to {}: {source}", .path.display())]
    Chart {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AnalysisError {
    /// Whether the run should end quietly with a diagnostic rather than fail.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AnalysisError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
