//! Line intervals covered by statements.

use std::fmt;

/// The syntax node an interval was recorded for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `let` binding.
    Local,
    /// Expression statement, with or without a trailing semicolon.
    Expr,
    /// Macro invocation in statement position.
    Macro,
    /// Free, associated or trait function, with its name.
    Fn(String),
    /// Any other item, tagged with its keyword (`struct`, `impl`, `use`, ...).
    Item(&'static str),
}

impl StatementKind {
    /// Name of the function, if this is one.
    pub fn fn_name(&self) -> Option<&str> {
        match self {
            StatementKind::Fn(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Local => write!(f, "let"),
            StatementKind::Expr => write!(f, "expr"),
            StatementKind::Macro => write!(f, "macro"),
            StatementKind::Fn(name) => write!(f, "fn {name}"),
            StatementKind::Item(keyword) => write!(f, "{keyword}"),
        }
    }
}

/// Lines `[start_line, end_line)` of one statement, 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceInterval {
    pub start_line: usize,
    pub end_line: usize,
    pub kind: StatementKind,
}

impl SourceInterval {
    pub fn new(start_line: usize, end_line: usize, kind: StatementKind) -> Self {
        debug_assert!(start_line < end_line, "empty interval {start_line}..{end_line}");
        Self {
            start_line,
            end_line,
            kind,
        }
    }

    /// Number of lines covered.
    pub fn len(&self) -> usize {
        self.end_line - self.start_line
    }

    pub fn is_empty(&self) -> bool {
        self.start_line >= self.end_line
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.start_line <= line && line < self.end_line
    }

    /// Whether `other` lies inside this interval and is not the same range.
    pub fn strictly_contains(&self, other: &SourceInterval) -> bool {
        self.start_line <= other.start_line
            && other.end_line <= self.end_line
            && (self.start_line, self.end_line) != (other.start_line, other.end_line)
    }
}

impl fmt::Display for SourceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {})", self.kind, self.start_line, self.end_line)
    }
}
