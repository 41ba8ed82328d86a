//! Statement index and its range queries.

use std::path::Path;

use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::visit::{self, Visit};
use syn::{ImplItemFn, Item, Stmt, TraitItemFn};

use crate::error::{IndexError, Result};
use crate::interval::{SourceInterval, StatementKind};

/// Line intervals of every statement in one source file.
///
/// Intervals are kept in the order the syntax tree was visited (outer nodes
/// before the nodes they contain). Queries that find several equally good
/// candidates return the first one in that order.
#[derive(Debug, Clone)]
pub struct StatementIndex {
    name: String,
    intervals: Vec<SourceInterval>,
}

impl StatementIndex {
    /// Parse Rust source text and index its statements.
    ///
    /// `name` is only used in error messages and logs.
    pub fn parse(source: &str, name: &str) -> Result<StatementIndex> {
        let file = syn::parse_file(source).map_err(|e| {
            let start = e.span().start();
            IndexError::Parse {
                name: name.to_string(),
                line: start.line,
                column: start.column + 1,
                message: e.to_string(),
            }
        })?;

        let mut collector = StatementCollector::default();
        collector.visit_file(&file);

        tracing::debug!(
            source = name,
            statements = collector.intervals.len(),
            "built statement index"
        );

        Ok(StatementIndex {
            name: name.to_string(),
            intervals: collector.intervals,
        })
    }

    /// Read and index a file.
    pub fn from_path(path: &Path) -> Result<StatementIndex> {
        let source = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source, &path.display().to_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceInterval> {
        self.intervals.iter()
    }

    /// The shortest interval containing `line`.
    pub fn overlap_at(&self, line: usize) -> Option<&SourceInterval> {
        self.intervals
            .iter()
            .filter(|iv| iv.contains_line(line))
            .min_by_key(|iv| (iv.len(), iv.start_line))
    }

    /// The interval starting closest before `line`, the shortest one if
    /// several start on that line.
    pub fn nearest_before(&self, line: usize) -> Option<&SourceInterval> {
        self.intervals
            .iter()
            .filter(|iv| iv.start_line < line)
            .min_by_key(|iv| (line - iv.start_line, iv.len()))
    }

    /// The interval starting closest after `line`, the shortest one if
    /// several start on that line.
    pub fn nearest_after(&self, line: usize) -> Option<&SourceInterval> {
        self.intervals
            .iter()
            .filter(|iv| iv.start_line > line)
            .min_by_key(|iv| (iv.start_line - line, iv.len()))
    }

    /// The smallest interval strictly containing `interval`.
    pub fn enveloping(&self, interval: &SourceInterval) -> Option<&SourceInterval> {
        self.intervals
            .iter()
            .filter(|iv| iv.strictly_contains(interval))
            .min_by_key(|iv| (iv.len(), iv.start_line))
    }

    /// Name of the innermost function containing `line`.
    pub fn enclosing_fn(&self, line: usize) -> Option<&str> {
        self.intervals
            .iter()
            .filter(|iv| iv.contains_line(line))
            .filter_map(|iv| iv.kind.fn_name().map(|name| (iv, name)))
            .min_by_key(|(iv, _)| (iv.len(), iv.start_line))
            .map(|(_, name)| name)
    }

    /// `(nearest_before, overlap_at, nearest_after)` for `line`.
    pub fn neighbors(
        &self,
        line: usize,
    ) -> (
        Option<&SourceInterval>,
        Option<&SourceInterval>,
        Option<&SourceInterval>,
    ) {
        (
            self.nearest_before(line),
            self.overlap_at(line),
            self.nearest_after(line),
        )
    }
}

/// Syntax tree visitor recording one interval per statement.
#[derive(Default)]
struct StatementCollector {
    intervals: Vec<SourceInterval>,
}

impl StatementCollector {
    fn record(&mut self, span: Span, kind: StatementKind) {
        let start = span.start().line;
        let end = span.end().line + 1;
        // Spans without location information report line 0.
        if start == 0 || end <= start {
            return;
        }
        self.intervals.push(SourceInterval::new(start, end, kind));
    }
}

fn item_kind(item: &Item) -> StatementKind {
    let keyword = match item {
        Item::Fn(f) => return StatementKind::Fn(f.sig.ident.to_string()),
        Item::Const(_) => "const",
        Item::Enum(_) => "enum",
        Item::ExternCrate(_) => "extern crate",
        Item::ForeignMod(_) => "extern",
        Item::Impl(_) => "impl",
        Item::Macro(_) => "macro",
        Item::Mod(_) => "mod",
        Item::Static(_) => "static",
        Item::Struct(_) => "struct",
        Item::Trait(_) => "trait",
        Item::TraitAlias(_) => "trait alias",
        Item::Type(_) => "type",
        Item::Union(_) => "union",
        Item::Use(_) => "use",
        _ => "item",
    };
    StatementKind::Item(keyword)
}

impl<'ast> Visit<'ast> for StatementCollector {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::Local(_) => self.record(stmt.span(), StatementKind::Local),
            Stmt::Expr(..) => self.record(stmt.span(), StatementKind::Expr),
            Stmt::Macro(_) => self.record(stmt.span(), StatementKind::Macro),
            // recorded by visit_item
            Stmt::Item(_) => {}
        }
        visit::visit_stmt(self, stmt);
    }

    fn visit_item(&mut self, item: &'ast Item) {
        self.record(item.span(), item_kind(item));
        visit::visit_item(self, item);
    }

    fn visit_impl_item_fn(&mut self, func: &'ast ImplItemFn) {
        self.record(func.span(), StatementKind::Fn(func.sig.ident.to_string()));
        visit::visit_impl_item_fn(self, func);
    }

    fn visit_trait_item_fn(&mut self, func: &'ast TraitItemFn) {
        self.record(func.span(), StatementKind::Fn(func.sig.ident.to_string()));
        visit::visit_trait_item_fn(self, func);
    }
}
