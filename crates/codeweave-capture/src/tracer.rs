/*
 * tracer.rs
 * Copyright (c) 2026 Posit, PBC
 *
 * Region tracers: from start and stop call sites to captured line ranges.
 */

//! Region tracers.
//!
//! A tracer turns a pair of call sites into a [`TraceRegion`]. The start
//! marker's own statement is skipped by starting at the next statement after
//! it. The stop marker's statement is left out the same way: the region ends
//! where that statement begins. A stop marker inside a statement that began
//! at or before the region start ends the region with that whole statement.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use codeweave_source_index::{IndexCache, StatementIndex};

use crate::call_site::CallSite;
use crate::error::TraceError;
use crate::region::{TraceRegion, UNKNOWN_FUNCTION};

/// Tracks which lines run between start and stop markers.
pub trait RegionTracer: fmt::Debug {
    /// Begin a region at `site`.
    fn start(&mut self, site: &CallSite) -> Result<(), TraceError>;

    /// End the innermost open region at `site`.
    fn stop(&mut self, site: &CallSite) -> Result<(), TraceError>;

    /// The completed regions, entry point first.
    ///
    /// Fails with [`TraceError::TrackerEmpty`] while a region is open or when
    /// none has completed.
    fn regions(&self) -> Result<Vec<TraceRegion>, TraceError>;

    fn is_active(&self) -> bool;
}

/// Finds and indexes the source files behind call sites.
#[derive(Debug, Clone, Default)]
pub struct SourceLoader {
    source_root: Option<PathBuf>,
    cache: Option<Rc<RefCell<IndexCache>>>,
}

impl SourceLoader {
    pub fn new(source_root: Option<PathBuf>) -> Self {
        Self {
            source_root,
            cache: None,
        }
    }

    /// Share indexes through `cache` instead of rebuilding them per region.
    pub fn with_cache(mut self, cache: Rc<RefCell<IndexCache>>) -> Self {
        self.cache = Some(cache);
        self
    }

    fn locate(&self, site: &CallSite) -> Result<PathBuf, TraceError> {
        site.resolve(self.source_root.as_deref())
            .ok_or_else(|| TraceError::CannotTrack {
                file: site.file.clone(),
            })
    }

    fn index(&self, path: &Path) -> Result<Rc<StatementIndex>, TraceError> {
        match &self.cache {
            Some(cache) => Ok(cache.borrow_mut().get_or_load(path)?),
            None => Ok(Rc::new(StatementIndex::from_path(path)?)),
        }
    }

    /// Open a region at `site`.
    fn open(&self, site: &CallSite) -> Result<OpenRegion, TraceError> {
        let path = self.locate(site)?;
        let index = self.index(&path)?;
        let line_start = index
            .nearest_after(site.line)
            .map_or(site.line, |stmt| stmt.start_line);

        tracing::debug!(path = %path.display(), line = site.line, line_start, "start tracing");
        Ok(OpenRegion {
            path,
            index,
            line_start,
            function: site.function.clone(),
        })
    }
}

/// A region whose start has been recorded.
#[derive(Debug)]
struct OpenRegion {
    path: PathBuf,
    index: Rc<StatementIndex>,
    line_start: usize,
    function: Option<String>,
}

impl OpenRegion {
    fn close(self, site: &CallSite, loader: &SourceLoader) -> Result<TraceRegion, TraceError> {
        let inconsistent = || TraceError::InconsistentTrace {
            file: self.path.display().to_string(),
            line: site.line,
        };

        if loader.locate(site)? != self.path {
            return Err(inconsistent());
        }
        let stmt = self.index.overlap_at(site.line).ok_or_else(inconsistent)?;
        let line_end = if stmt.start_line > self.line_start {
            stmt.start_line
        } else {
            stmt.end_line
        };

        let function_name = site
            .function
            .clone()
            .or_else(|| self.function.clone())
            .or_else(|| self.index.enclosing_fn(site.line).map(str::to_string))
            .unwrap_or_else(|| UNKNOWN_FUNCTION.to_string());

        tracing::debug!(
            path = %self.path.display(),
            line_start = self.line_start,
            line_end,
            function = %function_name,
            "stop tracing"
        );
        Ok(TraceRegion {
            filename: self.path,
            function_name,
            line_start: self.line_start,
            line_end,
        })
    }
}

/// Records a single region between one start and one stop.
///
/// Starting again after a completed region replaces it.
#[derive(Debug, Default)]
pub struct SimpleTracer {
    loader: SourceLoader,
    open: Option<OpenRegion>,
    region: Option<TraceRegion>,
}

impl SimpleTracer {
    pub fn new(loader: SourceLoader) -> Self {
        Self {
            loader,
            open: None,
            region: None,
        }
    }
}

impl RegionTracer for SimpleTracer {
    fn start(&mut self, site: &CallSite) -> Result<(), TraceError> {
        if self.open.is_some() {
            return Err(TraceError::AlreadyTracking);
        }
        self.region = None;
        self.open = Some(self.loader.open(site)?);
        Ok(())
    }

    fn stop(&mut self, site: &CallSite) -> Result<(), TraceError> {
        let open = self.open.take().ok_or(TraceError::NotTracking)?;
        self.region = Some(open.close(site, &self.loader)?);
        Ok(())
    }

    fn regions(&self) -> Result<Vec<TraceRegion>, TraceError> {
        match (&self.open, &self.region) {
            (None, Some(region)) => Ok(vec![region.clone()]),
            _ => Err(TraceError::TrackerEmpty),
        }
    }

    fn is_active(&self) -> bool {
        self.open.is_some()
    }
}

/// Records nested regions, one per start/stop pair.
///
/// Starts may nest (a capture that calls into traced helpers); each stop
/// closes the innermost open region. Regions are reported in the order
/// they were started, so the outermost one comes first.
#[derive(Debug, Default)]
pub struct CallTracer {
    loader: SourceLoader,
    /// Open regions with the slot reserved for each in `regions`.
    open: Vec<(usize, OpenRegion)>,
    regions: Vec<Option<TraceRegion>>,
}

impl CallTracer {
    pub fn new(loader: SourceLoader) -> Self {
        Self {
            loader,
            open: Vec::new(),
            regions: Vec::new(),
        }
    }

    /// Number of regions currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }
}

impl RegionTracer for CallTracer {
    fn start(&mut self, site: &CallSite) -> Result<(), TraceError> {
        let open = self.loader.open(site)?;
        let slot = self.regions.len();
        self.regions.push(None);
        self.open.push((slot, open));
        Ok(())
    }

    fn stop(&mut self, site: &CallSite) -> Result<(), TraceError> {
        let (slot, open) = self.open.pop().ok_or(TraceError::NotTracking)?;
        self.regions[slot] = Some(open.close(site, &self.loader)?);
        Ok(())
    }

    fn regions(&self) -> Result<Vec<TraceRegion>, TraceError> {
        if !self.open.is_empty() {
            return Err(TraceError::TrackerEmpty);
        }
        let regions: Vec<_> = self.regions.iter().flatten().cloned().collect();
        if regions.is_empty() {
            return Err(TraceError::TrackerEmpty);
        }
        Ok(regions)
    }

    fn is_active(&self) -> bool {
        !self.open.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    const SOURCE: &str = indoc! {"
        fn f() {
            let x = 1;
            let y = 2;
            x + y
        }

        fn helper(v: i32) -> i32 {
            let doubled = v * 2;
            doubled
        }
    "};

    fn fixture() -> (TempDir, String) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.rs");
        std::fs::write(&path, SOURCE).unwrap();
        let file = path.display().to_string();
        (temp, file)
    }

    #[test]
    fn test_simple_round_trip() {
        let (_temp, file) = fixture();
        let mut tracer = SimpleTracer::default();

        assert!(matches!(tracer.regions(), Err(TraceError::TrackerEmpty)));
        tracer.start(&CallSite::new(&file, 1)).unwrap();
        assert!(tracer.is_active());
        assert!(matches!(tracer.regions(), Err(TraceError::TrackerEmpty)));
        tracer.stop(&CallSite::new(&file, 4)).unwrap();
        assert!(!tracer.is_active());

        let regions = tracer.regions().unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].line_start, 2);
        assert_eq!(regions[0].line_end, 4);
        assert_eq!(regions[0].function_name, "f");
    }

    #[test]
    fn test_stop_statement_is_excluded() {
        let (_temp, file) = fixture();
        let mut tracer = SimpleTracer::default();
        tracer.start(&CallSite::new(&file, 1)).unwrap();
        tracer.stop(&CallSite::new(&file, 3)).unwrap();
        let region = &tracer.regions().unwrap()[0];
        assert_eq!((region.line_start, region.line_end), (2, 3));
    }

    #[test]
    fn test_failed_start_clears_previous_region() {
        let (_temp, file) = fixture();
        let mut tracer = SimpleTracer::default();
        tracer.start(&CallSite::new(&file, 1)).unwrap();
        tracer.stop(&CallSite::new(&file, 4)).unwrap();
        assert!(tracer.regions().is_ok());

        assert!(tracer.start(&CallSite::new("<stdin>", 1)).is_err());
        assert!(!tracer.is_active());
        assert!(matches!(tracer.regions(), Err(TraceError::TrackerEmpty)));
    }

    #[test]
    fn test_start_on_last_statement_keeps_line() {
        let (_temp, file) = fixture();
        let mut tracer = SimpleTracer::default();
        // nothing starts after line 10
        tracer.start(&CallSite::new(&file, 10)).unwrap();
        tracer.stop(&CallSite::new(&file, 10)).unwrap();
        let region = &tracer.regions().unwrap()[0];
        assert_eq!((region.line_start, region.line_end), (10, 11));
    }

    #[test]
    fn test_function_name_from_call_site() {
        let (_temp, file) = fixture();
        let mut tracer = SimpleTracer::default();
        tracer.start(&CallSite::new(&file, 1).with_function("entry")).unwrap();
        tracer.stop(&CallSite::new(&file, 4)).unwrap();
        assert_eq!(tracer.regions().unwrap()[0].function_name, "entry");
    }

    #[test]
    fn test_state_errors() {
        let (_temp, file) = fixture();
        let mut tracer = SimpleTracer::default();
        assert!(matches!(
            tracer.stop(&CallSite::new(&file, 4)),
            Err(TraceError::NotTracking)
        ));
        tracer.start(&CallSite::new(&file, 1)).unwrap();
        assert!(matches!(
            tracer.start(&CallSite::new(&file, 1)),
            Err(TraceError::AlreadyTracking)
        ));
    }

    #[test]
    fn test_cannot_track() {
        let mut tracer = SimpleTracer::default();
        assert!(matches!(
            tracer.start(&CallSite::new("<stdin>", 1)),
            Err(TraceError::CannotTrack { .. })
        ));
        assert!(matches!(
            tracer.start(&CallSite::new("no/such/file.rs", 1)),
            Err(TraceError::CannotTrack { .. })
        ));
        assert!(!tracer.is_active());
    }

    #[test]
    fn test_stop_outside_statements_is_inconsistent() {
        let (_temp, file) = fixture();
        let mut tracer = SimpleTracer::default();
        tracer.start(&CallSite::new(&file, 1)).unwrap();
        // line 6 is blank
        assert!(matches!(
            tracer.stop(&CallSite::new(&file, 6)),
            Err(TraceError::InconsistentTrace { line: 6, .. })
        ));
        assert!(!tracer.is_active());
    }

    #[test]
    fn test_call_tracer_orders_by_start() {
        let (_temp, file) = fixture();
        let mut tracer = CallTracer::default();

        tracer.start(&CallSite::new(&file, 1)).unwrap();
        tracer.start(&CallSite::new(&file, 7)).unwrap();
        assert_eq!(tracer.depth(), 2);
        tracer.stop(&CallSite::new(&file, 9)).unwrap();
        assert!(matches!(tracer.regions(), Err(TraceError::TrackerEmpty)));
        tracer.stop(&CallSite::new(&file, 4)).unwrap();

        let regions = tracer.regions().unwrap();
        let summary: Vec<_> = regions
            .iter()
            .map(|r| (r.function_name.as_str(), r.line_start, r.line_end))
            .collect();
        assert_eq!(summary, vec![("f", 2, 4), ("helper", 8, 9)]);
    }

    #[test]
    fn test_shared_cache() {
        let (_temp, file) = fixture();
        let cache = Rc::new(RefCell::new(IndexCache::new()));
        let loader = SourceLoader::default().with_cache(Rc::clone(&cache));

        let mut first = SimpleTracer::new(loader.clone());
        first.start(&CallSite::new(&file, 1)).unwrap();
        first.stop(&CallSite::new(&file, 4)).unwrap();

        let mut second = SimpleTracer::new(loader);
        second.start(&CallSite::new(&file, 7)).unwrap();
        second.stop(&CallSite::new(&file, 9)).unwrap();

        assert_eq!(cache.borrow().len(), 1);
        assert_eq!(second.regions().unwrap()[0].function_name, "helper");
    }
}
