use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Source file unreadable: {}: {source}", path.display())]
    SourceFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to open index at {}: {reason}", path.display())]
    IndexOpenFailure { path: PathBuf, reason: String },

    #[error("Query execution failed: {0}")]
    QueryExecutionFailure(String),

    #[error("Malformed quiz record at line {line}: expected 4 lines, found {found}")]
    MalformedQuizRecord { line: usize, found: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
