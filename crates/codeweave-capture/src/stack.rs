/*
 * stack.rs
 * Copyright (c) 2026 Posit, PBC
 *
 * Nested capture contexts feeding a document.
 */

//! The capture stack.
//!
//! Captures nest: content produced inside an inner capture belongs to it,
//! and the finished inner capture becomes content of the capture around it.
//! Content produced outside of any capture, and finished outermost captures,
//! go straight to the [`DocumentSink`].
//!
//! A context configured with [`CaptureStack::next_context`] waits on top of
//! the stack, inactive, until the next [`CaptureStack::enter`] activates it.

use std::cell::RefCell;
use std::rc::Rc;

use codeweave_source_index::IndexCache;

use crate::call_site::CallSite;
use crate::context::CaptureContext;
use crate::error::{CaptureError, Result};
use crate::fragment::{Fragment, Rendered};
use crate::settings::{CaptureSettings, ContextOverrides};

/// Receives rendered content that is not inside any active capture.
pub trait DocumentSink {
    fn accept(&mut self, rendered: Rendered) -> Result<()>;
}

impl DocumentSink for Vec<Rendered> {
    fn accept(&mut self, rendered: Rendered) -> Result<()> {
        self.push(rendered);
        Ok(())
    }
}

/// A sink that combines everything it receives into one value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    rendered: Rendered,
}

impl Assembly {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    pub fn finish(self) -> Rendered {
        self.rendered
    }
}

impl DocumentSink for Assembly {
    fn accept(&mut self, rendered: Rendered) -> Result<()> {
        self.rendered = self.rendered.combine(&rendered)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct CaptureStack<S: DocumentSink> {
    settings: CaptureSettings,
    cache: Option<Rc<RefCell<IndexCache>>>,
    contexts: Vec<CaptureContext>,
    sink: S,
}

impl<S: DocumentSink> CaptureStack<S> {
    pub fn new(settings: CaptureSettings, sink: S) -> Self {
        Self {
            settings,
            cache: None,
            contexts: Vec::new(),
            sink,
        }
    }

    /// Share one index cache between all contexts of the stack.
    pub fn with_cache(mut self, cache: Rc<RefCell<IndexCache>>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Number of contexts on the stack, including a pending one.
    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    /// Whether any context is capturing.
    pub fn is_active(&self) -> bool {
        self.contexts.iter().any(CaptureContext::is_active)
    }

    fn new_context(&self, settings: CaptureSettings) -> CaptureContext {
        CaptureContext::with_cache(settings, self.cache.clone())
    }

    fn has_pending(&self) -> bool {
        self.contexts.last().is_some_and(|ctx| !ctx.is_active())
    }

    fn highest_active(&mut self) -> Option<&mut CaptureContext> {
        self.contexts.iter_mut().rev().find(|ctx| ctx.is_active())
    }

    /// Configure the context used by the next [`enter`](Self::enter).
    ///
    /// A context configured earlier and not yet entered is replaced.
    pub fn next_context(&mut self, overrides: &ContextOverrides) -> &mut Self {
        let context = self.new_context(self.settings.apply(overrides));
        if self.has_pending() {
            tracing::debug!("replacing pending capture context");
            self.contexts.pop();
        }
        self.contexts.push(context);
        self
    }

    /// Start a capture at `site`, using the pending context if there is one.
    ///
    /// If the capture cannot start, a context created by this call is
    /// removed again while a pending one stays in place.
    pub fn enter(&mut self, site: &CallSite) -> Result<()> {
        let created = !self.has_pending();
        if created {
            let context = self.new_context(self.settings.clone());
            self.contexts.push(context);
        }
        let depth = self.contexts.len();
        let Some(context) = self.contexts.last_mut() else {
            return Err(CaptureError::NotActive);
        };
        if let Err(e) = context.enter(site) {
            if created {
                self.contexts.pop();
            }
            return Err(e);
        }
        tracing::debug!(depth, "capture stack entered");
        Ok(())
    }

    /// Add content to the innermost active capture, or to the sink.
    pub fn add(&mut self, fragment: impl Into<Fragment>) -> Result<()> {
        match self.highest_active() {
            Some(context) => {
                context.add(fragment);
                Ok(())
            }
            None => self.sink.accept(fragment.into().render()?),
        }
    }

    /// Finish the innermost active capture at `site`.
    ///
    /// The result is added to the next active capture below it, or handed
    /// to the sink when there is none.
    pub fn exit(&mut self, site: &CallSite) -> Result<()> {
        let position = self
            .contexts
            .iter()
            .rposition(CaptureContext::is_active)
            .ok_or(CaptureError::NotActive)?;
        if position + 1 < self.contexts.len() {
            tracing::warn!(
                discarded = self.contexts.len() - position - 1,
                "discarding pending capture context"
            );
            self.contexts.truncate(position + 1);
        }

        let mut context = self.contexts.pop().ok_or(CaptureError::NotActive)?;
        let rendered = context.exit(site)?;
        tracing::debug!(depth = self.contexts.len(), "capture stack exited");
        match self.highest_active() {
            Some(parent) => {
                parent.add(rendered);
                Ok(())
            }
            None => self.sink.accept(rendered),
        }
    }

    /// Start tracing a nested call in the innermost active capture.
    pub fn trace_call(&mut self, site: &CallSite) -> Result<()> {
        self.highest_active()
            .ok_or(CaptureError::NotActive)?
            .trace_call(site)
    }

    /// Stop tracing the innermost nested call.
    pub fn end_call(&mut self, site: &CallSite) -> Result<()> {
        self.highest_active()
            .ok_or(CaptureError::NotActive)?
            .end_call(site)
    }

    /// Hand back the sink. Fails if a capture is still open.
    pub fn into_sink(self) -> Result<S> {
        let open = self.contexts.iter().filter(|ctx| ctx.is_active()).count();
        if open > 0 {
            return Err(CaptureError::Unbalanced { open });
        }
        Ok(self.sink)
    }
}
