//! Runtime errors: persistence and configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Save/load failures.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The file could not be opened or created. Nothing was read or written.
    #[error("Could not open file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Read or write failure after the file was opened.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Missing, mistyped or inconsistent data in a snapshot.
    #[error("Invalid data found in file at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// A decoded model failed the kernel invariant check.
    #[error("Loaded data violates invariants: {0}")]
    InvariantViolation(String),
}

impl PersistError {
    /// True for failures caused by the file's content rather than
    /// by the filesystem.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            PersistError::Malformed { .. } | PersistError::InvariantViolation(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
