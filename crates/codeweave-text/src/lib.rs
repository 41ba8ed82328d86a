//! Composable text for document assembly.
//!
//! Rendered fragments are [`SpacedText`] values: text plus the minimum number
//! of newlines it needs before and after it. Combining fragments inserts only
//! the newlines still missing at each junction, so fragments can be nested and
//! concatenated in any grouping with the same result.
//!
//! The [`markdown`] module provides the handful of block constructs used when
//! laying out captured code next to its output.
//!
//! # Example
//!
//! ```rust
//! use codeweave_text::SpacedText;
//!
//! let a = SpacedText::new("A", (0, 2));
//! let b = SpacedText::new("B", (1, 0));
//! assert_eq!((a + b).text(), "A\n\nB");
//! ```

pub mod markdown;
mod spaced;

pub use markdown::CodeBlock;
pub use spaced::{Edge, SpacedText, count_newlines, newlines_between};
