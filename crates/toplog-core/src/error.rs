use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the toplog crates.
#[derive(Error, Debug)]
pub enum ToplogError {
    /// The input capture could not be opened or read from disk.
    #[error("Failed to read log file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the toplog crates.
pub type Result<T> = std::result::Result<T, ToplogError>;
