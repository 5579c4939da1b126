use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the data layer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("column '{0}' not found in the loaded data")]
    ColumnNotFound(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        DataError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
