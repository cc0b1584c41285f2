//! Error types for jaclean library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for jaclean operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for jaclean library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An input line is not a JSON object record.
    #[error("Record parsing error: {0}")]
    RecordParse(String),

    /// A field required by a component is absent or has the wrong type.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// No hostname could be extracted from a URL.
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    /// A shared resource (dictionary, blocklist, model) is missing or corrupt.
    #[error("Failed to load resource {}: {message}", path.display())]
    ResourceLoad { path: PathBuf, message: String },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn resource(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::ResourceLoad {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::MalformedUrl(err.to_string())
    }
}
