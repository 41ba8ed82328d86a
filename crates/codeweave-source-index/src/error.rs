//! Error types for building statement indexes.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a [`crate::StatementIndex`].
#[derive(Debug, Error)]
pub enum IndexError {
    /// The source text is not valid Rust.
    #[error("Failed to parse {name} at {line}:{column}: {message}")]
    Parse {
        /// Display name of the source
        name: String,
        /// 1-based line of the error
        line: usize,
        /// 1-based column of the error
        column: usize,
        /// Parser message
        message: String,
    },

    /// The source file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, IndexError>;
