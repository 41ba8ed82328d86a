/*
 * context.rs
 * Copyright (c) 2026 Posit, PBC
 *
 * A single capture: traced code plus the content produced while it ran.
 */

//! Capture contexts.
//!
//! A [`CaptureContext`] is entered at one call site and exited at another.
//! In between it collects the fragments added to it while its tracer records
//! which source lines ran. On exit, the code and the collected content are
//! arranged according to the context's [`Layout`].

use std::cell::RefCell;
use std::rc::Rc;

use codeweave_source_index::IndexCache;

use crate::call_site::CallSite;
use crate::error::{CaptureError, Result};
use crate::fragment::{Fragment, Rendered};
use crate::layout::Layout;
use crate::settings::CaptureSettings;
use crate::tracer::RegionTracer;

/// Tab title of the first region when a capture spans several.
pub const ENTRY_POINT_TITLE: &str = "Entry point";

#[derive(Debug)]
pub struct CaptureContext {
    settings: CaptureSettings,
    tracer: Box<dyn RegionTracer>,
    fragments: Vec<Fragment>,
    active: bool,
}

impl CaptureContext {
    pub fn new(settings: CaptureSettings) -> Self {
        Self::with_cache(settings, None)
    }

    /// A context whose tracer indexes files through `cache`.
    pub fn with_cache(settings: CaptureSettings, cache: Option<Rc<RefCell<IndexCache>>>) -> Self {
        let tracer = settings.make_tracer(cache);
        Self {
            settings,
            tracer,
            fragments: Vec::new(),
            active: false,
        }
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn layout(&self) -> Layout {
        self.settings.layout
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Start capturing at `site`.
    pub fn enter(&mut self, site: &CallSite) -> Result<()> {
        if self.active {
            return Err(CaptureError::AlreadyActive);
        }
        if self.layout().tracks_code() {
            self.tracer.start(site)?;
        }
        self.active = true;
        tracing::debug!(%site, layout = %self.layout(), "entered capture context");
        Ok(())
    }

    /// Add content to the capture.
    pub fn add(&mut self, fragment: impl Into<Fragment>) {
        let fragment = fragment.into();
        if self.settings.add_bottom {
            self.fragments.push(fragment);
        } else {
            self.fragments.insert(0, fragment);
        }
    }

    /// Start tracing a nested call at `site`.
    pub fn trace_call(&mut self, site: &CallSite) -> Result<()> {
        if !self.active {
            return Err(CaptureError::NotActive);
        }
        if self.layout().tracks_code() {
            self.tracer.start(site)?;
        }
        Ok(())
    }

    /// Stop tracing the innermost nested call at `site`.
    pub fn end_call(&mut self, site: &CallSite) -> Result<()> {
        if !self.active {
            return Err(CaptureError::NotActive);
        }
        if self.layout().tracks_code() {
            self.tracer.stop(site)?;
        }
        Ok(())
    }

    /// Stop capturing at `site` and render the result.
    pub fn exit(&mut self, site: &CallSite) -> Result<Rendered> {
        if !self.active {
            return Err(CaptureError::NotActive);
        }
        self.active = false;
        if self.layout().tracks_code() {
            self.tracer.stop(site)?;
        }
        tracing::debug!(%site, fragments = self.fragments.len(), "exited capture context");
        self.render()
    }

    /// Render the collected content and traced code.
    pub fn render(&self) -> Result<Rendered> {
        let content = self
            .fragments
            .iter()
            .map(Fragment::render)
            .collect::<Result<Vec<_>>>()?;
        let content = Rendered::concat(content)?;

        let code = if self.layout().tracks_code() {
            Some(self.render_code()?)
        } else {
            None
        };
        self.layout().arrange(code, content)
    }

    /// One code block per traced region, as tabs when there are several.
    fn render_code(&self) -> Result<Rendered> {
        let relative_to = self.settings.relative_to.as_deref();
        let name_only = self.settings.name_only;

        let regions = self.tracer.regions()?;
        let mut blocks = Vec::with_capacity(regions.len());
        for region in &regions {
            let block = region.to_code_block(relative_to, name_only)?;
            blocks.push(Rendered::new(block.to_spaced_text()));
        }

        if blocks.len() == 1 {
            return Ok(blocks.remove(0));
        }
        let tabs = blocks
            .into_iter()
            .zip(&regions)
            .enumerate()
            .map(|(i, (block, region))| {
                let title = if i == 0 {
                    ENTRY_POINT_TITLE
                } else {
                    region.function_name.as_str()
                };
                block.into_tab(title)
            })
            .collect::<Result<Vec<_>>>()?;
        Rendered::concat(tabs)
    }
}
