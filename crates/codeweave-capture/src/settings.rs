/*
 * settings.rs
 * Copyright (c) 2026 Posit, PBC
 *
 * Capture settings and per-context overrides.
 */

//! Capture settings.
//!
//! Settings are plain data threaded through the capture stack. They can be
//! written in YAML with kebab-case keys:
//!
//! ```yaml
//! layout: top-c
//! name-only: true
//! add-bottom: true
//! relative-to: /work/report
//! source-root: /work/report
//! tracer: call
//! ```

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use codeweave_source_index::IndexCache;
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};
use crate::layout::Layout;
use crate::tracer::{CallTracer, RegionTracer, SimpleTracer, SourceLoader};

/// Which [`RegionTracer`] a context uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TracerKind {
    /// One region per capture.
    #[default]
    Simple,
    /// One region per capture plus one per traced nested call.
    Call,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct CaptureSettings {
    pub layout: Layout,
    /// Title code blocks with the file name instead of its path.
    pub name_only: bool,
    /// Append added content (`true`) or prepend it (`false`).
    pub add_bottom: bool,
    /// Code block titles are made relative to this directory when possible.
    pub relative_to: Option<PathBuf>,
    /// Directory against which relative call-site paths are resolved.
    /// Defaults to the current directory.
    pub source_root: Option<PathBuf>,
    pub tracer: TracerKind,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            name_only: false,
            add_bottom: true,
            relative_to: None,
            source_root: None,
            tracer: TracerKind::default(),
        }
    }
}

impl CaptureSettings {
    /// Parse settings from YAML. An empty document gives the defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source).map_err(|e| CaptureError::Settings {
            message: e.to_string(),
        })
    }

    /// Read settings from a YAML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CaptureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            CaptureError::Settings { message } => CaptureError::Settings {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_name_only(mut self, name_only: bool) -> Self {
        self.name_only = name_only;
        self
    }

    pub fn with_add_bottom(mut self, add_bottom: bool) -> Self {
        self.add_bottom = add_bottom;
        self
    }

    pub fn with_relative_to(mut self, relative_to: impl Into<PathBuf>) -> Self {
        self.relative_to = Some(relative_to.into());
        self
    }

    pub fn with_source_root(mut self, source_root: impl Into<PathBuf>) -> Self {
        self.source_root = Some(source_root.into());
        self
    }

    pub fn with_tracer(mut self, tracer: TracerKind) -> Self {
        self.tracer = tracer;
        self
    }

    /// These settings with `overrides` applied on top.
    pub fn apply(&self, overrides: &ContextOverrides) -> Self {
        Self {
            layout: overrides.layout.unwrap_or(self.layout),
            name_only: overrides.name_only.unwrap_or(self.name_only),
            add_bottom: overrides.add_bottom.unwrap_or(self.add_bottom),
            relative_to: self.relative_to.clone(),
            source_root: self.source_root.clone(),
            tracer: overrides.tracer.unwrap_or(self.tracer),
        }
    }

    /// A fresh tracer of the configured kind.
    pub fn make_tracer(&self, cache: Option<Rc<RefCell<IndexCache>>>) -> Box<dyn RegionTracer> {
        let mut loader = SourceLoader::new(self.source_root.clone());
        if let Some(cache) = cache {
            loader = loader.with_cache(cache);
        }
        match self.tracer {
            TracerKind::Simple => Box::new(SimpleTracer::new(loader)),
            TracerKind::Call => Box::new(CallTracer::new(loader)),
        }
    }
}

/// Settings for the next context only. Unset fields keep the stack's value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ContextOverrides {
    pub layout: Option<Layout>,
    pub name_only: Option<bool>,
    pub add_bottom: Option<bool>,
    pub tracer: Option<TracerKind>,
}

impl ContextOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn name_only(mut self, name_only: bool) -> Self {
        self.name_only = Some(name_only);
        self
    }

    pub fn add_bottom(mut self, add_bottom: bool) -> Self {
        self.add_bottom = Some(add_bottom);
        self
    }

    pub fn tracer(mut self, tracer: TracerKind) -> Self {
        self.tracer = Some(tracer);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = CaptureSettings::default();
        assert_eq!(settings.layout, Layout::Tabbed);
        assert!(settings.add_bottom);
        assert!(!settings.name_only);
        assert_eq!(settings.tracer, TracerKind::Simple);
        assert_eq!(CaptureSettings::from_yaml_str("").unwrap(), settings);
    }

    #[test]
    fn test_from_yaml() {
        let settings = CaptureSettings::from_yaml_str(indoc! {"
            layout: bottom-c
            name-only: true
            relative-to: /work/report
            tracer: call
        "})
        .unwrap();
        assert_eq!(settings.layout, Layout::BottomCollapsed);
        assert!(settings.name_only);
        assert!(settings.add_bottom);
        assert_eq!(settings.relative_to, Some(PathBuf::from("/work/report")));
        assert_eq!(settings.source_root, None);
        assert_eq!(settings.tracer, TracerKind::Call);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            CaptureSettings::from_yaml_str("layout: sideways\n"),
            Err(CaptureError::Settings { .. })
        ));
        assert!(matches!(
            CaptureSettings::from_yaml_str("colour: blue\n"),
            Err(CaptureError::Settings { .. })
        ));
    }

    #[test]
    fn test_from_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("capture.yml");
        std::fs::write(&path, "layout: nocode\n").unwrap();
        assert_eq!(CaptureSettings::from_path(&path).unwrap().layout, Layout::NoCode);

        let missing = CaptureSettings::from_path(&temp.path().join("missing.yml"));
        assert!(matches!(missing, Err(CaptureError::Io { .. })));
    }

    #[test]
    fn test_apply_overrides() {
        let base = CaptureSettings::default().with_relative_to("/work");
        let overrides = ContextOverrides::new().layout(Layout::TopOpen).add_bottom(false);
        let applied = base.apply(&overrides);
        assert_eq!(applied.layout, Layout::TopOpen);
        assert!(!applied.add_bottom);
        assert!(!applied.name_only);
        assert_eq!(applied.relative_to, Some(PathBuf::from("/work")));

        assert_eq!(base.apply(&ContextOverrides::default()), base);
    }

    #[test]
    fn test_make_tracer() {
        let tracer = CaptureSettings::default().with_tracer(TracerKind::Call).make_tracer(None);
        assert!(!tracer.is_active());
    }
}
