//! Line-range index over the statements of a Rust source file.
//!
//! A [`StatementIndex`] records the lines covered by every statement and
//! item of a file, at every nesting level, and answers the questions a
//! code capture needs: which statement covers a line, which statement comes
//! next, and which function a line belongs to.
//!
//! # Example
//!
//! ```rust
//! use codeweave_source_index::StatementIndex;
//!
//! let source = "fn f() {\n    let x = 1;\n    let y = 2;\n    x + y\n}\n";
//! let index = StatementIndex::parse(source, "f.rs").unwrap();
//!
//! let next = index.nearest_after(1).unwrap();
//! assert_eq!((next.start_line, next.end_line), (2, 3));
//! assert_eq!(index.enclosing_fn(4), Some("f"));
//! ```

mod cache;
pub mod error;
mod index;
mod interval;

pub use cache::{IndexCache, content_hash};
pub use error::{IndexError, Result};
pub use index::StatementIndex;
pub use interval::{SourceInterval, StatementKind};
