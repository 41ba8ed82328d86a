/*
 * call_site.rs
 * Copyright (c) 2026 Posit, PBC
 *
 * Source locations marking the boundaries of captured regions.
 */

//! Call-site descriptors.
//!
//! A capture is delimited by two call sites: where it was entered and where
//! it was left. They are produced with [`call_site!`](crate::call_site) or
//! [`CallSite::caller`] and carry the file name as the compiler reports it,
//! which is usually relative to the workspace root.

use std::path::{Path, PathBuf};

/// A point in the source where a capture marker was called.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    /// Function containing the call, if known. When absent it is looked up
    /// in the statement index.
    pub function: Option<String>,
}

impl CallSite {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
            function: None,
        }
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// The location of the caller of the function this is called from.
    ///
    /// Only meaningful inside a function marked `#[track_caller]`, or called
    /// directly at the capture boundary.
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self::new(location.file(), location.line() as usize)
    }

    /// Whether the file name can refer to a source file at all.
    ///
    /// Empty names and pseudo-files such as `<stdin>` cannot.
    pub fn is_trackable(&self) -> bool {
        let file = self.file.trim();
        !file.is_empty() && !(file.starts_with('<') && file.ends_with('>'))
    }

    /// Locate the source file on disk.
    ///
    /// Absolute paths are used as they are. Relative paths are tried against
    /// `source_root` (or the current directory when none is given) and each
    /// of its ancestors, since compiler-reported paths are relative to the
    /// workspace root rather than the crate.
    pub fn resolve(&self, source_root: Option<&Path>) -> Option<PathBuf> {
        if !self.is_trackable() {
            return None;
        }
        let path = Path::new(&self.file);
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }

        let root = match source_root {
            Some(root) => Some(root.to_path_buf()),
            None => std::env::current_dir().ok(),
        };
        root.iter()
            .flat_map(|root| root.ancestors())
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file())
            .or_else(|| path.is_file().then(|| path.to_path_buf()))
    }
}

impl std::fmt::Display for CallSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if let Some(function) = &self.function {
            write!(f, " ({function})")?;
        }
        Ok(())
    }
}

/// The current source location as a [`CallSite`].
///
/// An optional argument names the enclosing function.
///
/// ```rust
/// use codeweave_capture::call_site;
///
/// let site = call_site!();
/// assert_eq!(site.line, line!() as usize - 1);
/// assert!(site.function.is_none());
/// ```
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(file!(), line!() as usize)
    };
    ($function:expr) => {
        $crate::CallSite::new(file!(), line!() as usize).with_function($function)
    };
}
