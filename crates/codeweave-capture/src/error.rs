/*
 * error.rs
 * Copyright (c) 2026 Posit, PBC
 *
 * Error types for tracing and capturing code regions.
 */

//! Error types for code capture.
//!
//! [`TraceError`] covers the region tracers, [`CaptureError`] everything a
//! capture context or stack can report. Lower-level errors convert upwards
//! with `?`.

use std::path::PathBuf;

use codeweave_requirements::RequirementsError;
use codeweave_source_index::IndexError;
use thiserror::Error;

/// Errors reported by a [`crate::RegionTracer`].
#[derive(Debug, Error)]
pub enum TraceError {
    /// The call site has no source file that can be read.
    #[error("Cannot track code at '{file}': no backing source file")]
    CannotTrack {
        /// File name as reported by the call site
        file: String,
    },

    /// `stop` was called while no region was open.
    #[error("Tracer is not tracking")]
    NotTracking,

    /// `start` was called on a single-shot tracer that is already tracking.
    #[error("Tracer is already tracking")]
    AlreadyTracking,

    /// The stop point is not inside any statement of the traced file.
    #[error("No statement encloses the stop point {file}:{line}")]
    InconsistentTrace {
        /// Traced file
        file: String,
        /// Line of the stop point
        line: usize,
    },

    /// No region has been completed yet, or one is still open.
    #[error("Tracer holds no completed region")]
    TrackerEmpty,

    /// The traced file could not be indexed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Errors reported by capture contexts and stacks.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// `enter` was called on a context that is already active.
    #[error("Capture context is already active")]
    AlreadyActive,

    /// `exit` (or a nested call marker) without a matching `enter`.
    #[error("No active capture context")]
    NotActive,

    /// Contexts were left open when the stack was finished.
    #[error("{open} capture context(s) still active")]
    Unbalanced {
        /// Number of contexts still active
        open: usize,
    },

    #[error(transparent)]
    Trace(#[from] TraceError),

    /// A fragment could not be rendered.
    #[error("Failed to render fragment: {message}")]
    Render { message: String },

    #[error(transparent)]
    Requirements(#[from] RequirementsError),

    /// Captured source lines could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Capture settings could not be parsed.
    #[error("Invalid capture settings: {message}")]
    Settings { message: String },
}

pub type Result<T> = std::result::Result<T, CaptureError>;
