//! Error types for adapters.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing collector output.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The collector output file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the document.
    #[error("Failed to parse collector output: {0}")]
    Parse(String),

    /// A field required by the schema is absent.
    #[error("Missing field: {0}")]
    MissingField(String),
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Parse(err.to_string())
    }
}

#[cfg(feature = "locust")]
impl From<csv::Error> for AdapterError {
    fn from(err: csv::Error) -> Self {
        AdapterError::Parse(err.to_string())
    }
}
