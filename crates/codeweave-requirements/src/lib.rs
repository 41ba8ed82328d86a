//! Requirement trees and their merge algebra.
//!
//! Every rendered fragment may declare requirements: settings it needs in
//! the site configuration (markdown extensions, theme options, the page
//! navigation) and in the page front matter. When fragments are combined
//! their requirements are merged with [`Requirements::merge`].
//!
//! # Merge rules
//!
//! - Maps merge key by key, recursively
//! - Sequences keep the left items and append right items not yet present
//! - Sets take the union
//! - Anything else: the right value wins
//!
//! The navigation key ([`NAV_KEY`]) is special: it is never merged, and two
//! trees that both declare one cannot be combined.
//!
//! # Example
//!
//! ```rust
//! use codeweave_requirements::{ConfigValue, Requirements};
//!
//! let a = Requirements::new()
//!     .with_site("markdown_extensions", ConfigValue::seq([ConfigValue::string("admonition")]));
//! let b = Requirements::new()
//!     .with_site("markdown_extensions", ConfigValue::seq([ConfigValue::string("pymdownx.details")]));
//!
//! let merged = a.merge(&b).unwrap();
//! let extensions = merged.site.get("markdown_extensions").unwrap();
//! assert_eq!(extensions.as_seq().unwrap().len(), 2);
//! ```

mod convert;
mod merge;
pub mod nav;
mod types;

pub use convert::{emit_config_map, parse_config_map};
pub use merge::{Requirements, merge_maps, merge_values};
pub use nav::{NavEntry, entries_to_nav, nav_to_entries, snake_to_text};
pub use types::{ConfigMap, ConfigValue, NAV_KEY, RequirementsError, Result, Scope};
