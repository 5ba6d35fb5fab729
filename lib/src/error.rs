//! Error types shared by every pipeline stage.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A configured input path does not exist.
    #[error("file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// A configured column name is absent from a loaded table.
    #[error("column `{column}` does not exist in the data")]
    MissingColumn { column: String },

    /// I/O failure other than a missing file.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed CSV structure.
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A cell that cannot be read as a number.
    #[error("invalid value `{value}` in column `{column}` at row {row}")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    /// Two row-aligned sequences have different lengths.
    #[error("length mismatch: expected {expected} rows, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Feature layout differs from the one a fitted artifact was built with.
    #[error("feature mismatch: expected {expected:?}, got {got:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    /// Invalid hyperparameter or argument value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Empty data provided where non-empty was required.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// Artifact encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The configuration document could not be read or is invalid.
    #[error("configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl PipelineError {
    /// Wraps an I/O error with the path it occurred on, turning `NotFound`
    /// into [`PipelineError::MissingFile`].
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            PipelineError::MissingFile { path }
        } else {
            PipelineError::Io { path, source }
        }
    }

    /// Wraps a CSV error; a missing file is reported as such.
    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if let csv::ErrorKind::Io(err) = source.kind() {
            if err.kind() == io::ErrorKind::NotFound {
                return PipelineError::MissingFile { path };
            }
        }
        PipelineError::Csv { path, source }
    }

    pub fn missing_column(column: impl Into<String>) -> Self {
        PipelineError::MissingColumn {
            column: column.into(),
        }
    }
}

impl From<bincode::Error> for PipelineError {
    fn from(err: bincode::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
