//! Error types for reading hyperspectral datasets.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a single stage of the read pipeline.
#[derive(Error, Debug)]
pub enum ReadError {
    /// I/O error while reading the header or the payload
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A required header key is absent
    #[error("Missing required header key: {key}")]
    MissingKey {
        /// Name of the missing key
        key: String,
    },

    /// The header declares a data type code this crate cannot decode
    #[error("Unsupported data type code '{code}'")]
    UnsupportedType {
        /// The code as written in the header
        code: String,
    },

    /// The payload does not hold exactly `lines * bands * samples` elements
    #[error("Cannot reshape payload: expected {expected} elements, found {found} ({detail})")]
    Reshape {
        /// Element count implied by the header dimensions
        expected: usize,
        /// Element count present in the payload
        found: usize,
        /// Extra context, e.g. trailing bytes
        detail: String,
    },

    /// A header value could not be interpreted
    #[error("Malformed header value for '{key}': {message}")]
    MalformedHeader {
        /// Key whose value is malformed
        key: String,
        /// Description of the problem
        message: String,
    },

    /// The debug preview could not be written
    #[error("Preview error: {0}")]
    Preview(#[from] image::ImageError),
}

impl ReadError {
    /// Create an I/O error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a missing key error.
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Create a malformed header error.
    pub fn malformed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedHeader {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// A read failure together with the dataset it happened on.
#[derive(Error, Debug)]
#[error("Failed to read dataset {}: {source}", .path.display())]
pub struct DatasetError {
    /// Path of the binary data file passed to the reader
    pub path: PathBuf,
    /// What went wrong
    #[source]
    pub source: ReadError,
}

impl DatasetError {
    /// Attach a dataset path to a stage error.
    pub fn new(path: &Path, source: ReadError) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The stage error, for matching on the failure kind.
    pub fn kind(&self) -> &ReadError {
        &self.source
    }
}
