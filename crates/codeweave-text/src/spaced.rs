//! Text carrying minimum blank-line requirements on its edges.
//!
//! A document is assembled by repeatedly combining [`SpacedText`] values.
//! Each value states how many newlines it needs before and after itself;
//! combining two values inserts just enough newlines at the junction to
//! satisfy both sides, taking into account newlines the texts already carry.
//!
//! Combination is associative, so sequences, containers and nested blocks can
//! be built up in any grouping and still produce the same output.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Characters that are skipped when counting newlines at a text edge.
const EDGE_WHITESPACE: &[char] = &[' ', '\t', '\r'];

/// Which edge of a text to count newlines on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Leading,
    Trailing,
}

/// Count the newlines at one edge of `text`.
///
/// Spaces, tabs and carriage returns between newlines are ignored. Counting
/// stops at the first other character. A text with no such character is all
/// blank and counts as its full length, so it satisfies any requirement it
/// could be asked to meet.
pub fn count_newlines(text: &str, edge: Edge) -> usize {
    let mut count = 0;
    let chars: Box<dyn Iterator<Item = char>> = match edge {
        Edge::Leading => Box::new(text.chars()),
        Edge::Trailing => Box::new(text.chars().rev()),
    };
    for ch in chars {
        if ch == '\n' {
            count += 1;
        } else if !EDGE_WHITESPACE.contains(&ch) {
            return count;
        }
    }
    text.len()
}

/// A piece of text with the number of newlines it requires around it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpacedText {
    text: String,
    before: usize,
    after: usize,
}

impl SpacedText {
    /// Create a text requiring `before` newlines ahead of it and `after`
    /// newlines behind it.
    pub fn new(text: impl Into<String>, (before, after): (usize, usize)) -> Self {
        Self {
            text: text.into(),
            before,
            after,
        }
    }

    /// Create a text without spacing requirements.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, (0, 0))
    }

    /// The empty text.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn required_blank_before(&self) -> usize {
        self.before
    }

    pub fn required_blank_after(&self) -> usize {
        self.after
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Raise the requirements to at least `before` and `after`.
    ///
    /// Existing requirements are never lowered.
    pub fn with_spacing(self, before: usize, after: usize) -> Self {
        Self {
            text: self.text,
            before: self.before.max(before),
            after: self.after.max(after),
        }
    }

    /// Combine `self` followed by `follow`.
    ///
    /// An empty operand contributes no text; its requirements apply at the
    /// point where it sits, so they are folded into the edge of the result
    /// that faces it.
    pub fn combine(&self, follow: &SpacedText) -> SpacedText {
        match (self.is_empty(), follow.is_empty()) {
            (true, true) => SpacedText {
                text: String::new(),
                before: self.before.max(follow.before),
                after: self.after.max(follow.after),
            },
            (true, false) => SpacedText {
                text: follow.text.clone(),
                before: self.before.max(self.after).max(follow.before),
                after: follow.after,
            },
            (false, true) => SpacedText {
                text: self.text.clone(),
                before: self.before,
                after: self.after.max(follow.before).max(follow.after),
            },
            (false, false) => {
                let inserted = newlines_between(self, follow);
                let mut text = String::with_capacity(self.text.len() + inserted + follow.text.len());
                text.push_str(&self.text);
                text.extend(std::iter::repeat_n('\n', inserted));
                text.push_str(&follow.text);
                SpacedText {
                    text,
                    before: self.before,
                    after: follow.after,
                }
            }
        }
    }

    /// Materialize the text as it appears between `preceding` and
    /// `following` in the final output.
    ///
    /// The surrounding strings are treated as unspaced texts and the
    /// newlines needed on each side are added.
    pub fn format(&self, preceding: &str, following: &str) -> String {
        let add_before = newlines_between(&SpacedText::plain(preceding), self);
        let add_after = newlines_between(self, &SpacedText::plain(following));

        let mut out = String::with_capacity(self.text.len() + add_before + add_after);
        out.extend(std::iter::repeat_n('\n', add_before));
        out.push_str(&self.text);
        out.extend(std::iter::repeat_n('\n', add_after));
        out
    }
}

/// Number of newlines to insert between `first` and `second`.
///
/// Zero when either text is empty.
pub fn newlines_between(first: &SpacedText, second: &SpacedText) -> usize {
    if first.is_empty() || second.is_empty() {
        return 0;
    }
    let required = first.after.max(second.before);
    let existing =
        count_newlines(&first.text, Edge::Trailing) + count_newlines(&second.text, Edge::Leading);
    required.saturating_sub(existing)
}

impl fmt::Display for SpacedText {
    /// Formats as if surrounded by three newlines on each side.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format("\n\n\n", "\n\n\n"))
    }
}

impl From<&str> for SpacedText {
    fn from(text: &str) -> Self {
        SpacedText::plain(text)
    }
}

impl From<String> for SpacedText {
    fn from(text: String) -> Self {
        SpacedText::plain(text)
    }
}

impl Add for SpacedText {
    type Output = SpacedText;

    fn add(self, rhs: SpacedText) -> SpacedText {
        self.combine(&rhs)
    }
}

impl Add<&SpacedText> for SpacedText {
    type Output = SpacedText;

    fn add(self, rhs: &SpacedText) -> SpacedText {
        self.combine(rhs)
    }
}

impl Add<&str> for SpacedText {
    type Output = SpacedText;

    fn add(self, rhs: &str) -> SpacedText {
        self.combine(&SpacedText::plain(rhs))
    }
}

impl Sum for SpacedText {
    fn sum<I: Iterator<Item = SpacedText>>(iter: I) -> SpacedText {
        iter.fold(SpacedText::empty(), |acc, item| acc.combine(&item))
    }
}
