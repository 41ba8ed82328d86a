/*
 * lib.rs
 * Copyright (c) 2026 Posit, PBC
 *
 * Live code capture for document assembly.
 */

//! Capture the code that produced some output, and lay both out together.
//!
//! A capture is delimited by two call sites. Between them, fragments of
//! output are collected; the source lines that ran are determined from the
//! statement index of the calling file. When the capture ends the code and
//! output are combined according to a [`Layout`] into one [`Rendered`]
//! value, carrying the markdown text and the site and page requirements it
//! introduces.
//!
//! # Example
//!
//! ```rust,no_run
//! use codeweave_capture::{CaptureSettings, CaptureStack, Fragment, Layout, Rendered, call_site};
//!
//! # fn main() -> codeweave_capture::Result<()> {
//! let settings = CaptureSettings::default().with_layout(Layout::TopCollapsed);
//! let mut stack = CaptureStack::new(settings, Vec::<Rendered>::new());
//!
//! stack.enter(&call_site!())?;
//! let total: i32 = (1..=10).sum();
//! stack.add(Fragment::paragraph(format!("The total is {total}.")))?;
//! stack.exit(&call_site!())?;
//!
//! for rendered in stack.into_sink()? {
//!     print!("{}", rendered.to_markdown());
//! }
//! # Ok(())
//! # }
//! ```

mod call_site;
mod context;
pub mod error;
mod fragment;
mod layout;
mod region;
mod settings;
mod stack;
pub mod tracer;

pub use call_site::CallSite;
pub use context::{CaptureContext, ENTRY_POINT_TITLE};
pub use error::{CaptureError, Result, TraceError};
pub use fragment::{
    Fragment, MARKDOWN_EXTENSIONS, RenderFragment, Rendered, admonition_requirements,
    tab_requirements,
};
pub use layout::Layout;
pub use region::{CODE_LANGUAGE, TraceRegion, UNKNOWN_FUNCTION};
pub use settings::{CaptureSettings, ContextOverrides, TracerKind};
pub use stack::{Assembly, CaptureStack, DocumentSink};
pub use tracer::{CallTracer, RegionTracer, SimpleTracer, SourceLoader};
