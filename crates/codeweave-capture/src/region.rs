/*
 * region.rs
 * Copyright (c) 2026 Posit, PBC
 *
 * Traced line ranges and their rendering as code blocks.
 */

use std::path::{Path, PathBuf};

use codeweave_text::CodeBlock;
use codeweave_text::markdown::dedent;

use crate::error::{CaptureError, Result};

/// Language tag put on captured code blocks.
pub const CODE_LANGUAGE: &str = "rust";

/// Function name used when neither the call site nor the index knows it.
pub const UNKNOWN_FUNCTION: &str = "<unknown>";

/// A captured range of source lines, `[line_start, line_end)`, 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRegion {
    pub filename: PathBuf,
    pub function_name: String,
    pub line_start: usize,
    pub line_end: usize,
}

impl TraceRegion {
    /// Title for the code block: the path relative to `relative_to` if it
    /// lies below it, otherwise the file name alone when `name_only` is set,
    /// otherwise the full path.
    pub fn title(&self, relative_to: Option<&Path>, name_only: bool) -> String {
        if let Some(relative) = relative_to.and_then(|base| self.filename.strip_prefix(base).ok()) {
            return relative.display().to_string();
        }
        if name_only && let Some(name) = self.filename.file_name() {
            return name.to_string_lossy().into_owned();
        }
        self.filename.display().to_string()
    }

    /// The captured source, with its common indentation removed.
    pub fn source(&self) -> Result<String> {
        let content = std::fs::read_to_string(&self.filename).map_err(|source| CaptureError::Io {
            path: self.filename.clone(),
            source,
        })?;
        Ok(dedent(&read_lines(&content, self.line_start, self.line_end)))
    }

    /// Render as a fenced code block numbered from `line_start`.
    pub fn to_code_block(&self, relative_to: Option<&Path>, name_only: bool) -> Result<CodeBlock> {
        Ok(CodeBlock::new(self.source()?)
            .with_language(CODE_LANGUAGE)
            .with_title(self.title(relative_to, name_only))
            .with_first_line(self.line_start))
    }
}

/// Lines `[from, to)` of `content`, 1-based, keeping line endings.
fn read_lines(content: &str, from: usize, to: usize) -> String {
    content
        .split_inclusive('\n')
        .skip(from.saturating_sub(1))
        .take(to.saturating_sub(from))
        .collect()
}
