//! Core type definitions for requirement trees.

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use yaml_rust2::Yaml;

/// Key of the navigation structure in a requirement tree.
///
/// Navigation is the one field that is never merged: two trees that both
/// declare a non-empty navigation cannot be combined.
pub const NAV_KEY: &str = "nav";

/// A mapping from keys to requirement values, in first-seen key order.
pub type ConfigMap = IndexMap<String, ConfigValue>;

/// A requirement value.
///
/// Each kind has its own merge behavior, see [`crate::merge_values`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Atomic values (string, number, bool, null). Last write wins.
    Scalar(Yaml),

    /// Ordered sequence. Merging appends items not already present.
    Seq(Vec<ConfigValue>),

    /// Unordered set of scalars. Merging takes the union.
    Set(IndexSet<Yaml>),

    /// Nested mapping. Merging is recursive per key.
    Map(ConfigMap),
}

impl ConfigValue {
    pub fn string(s: impl Into<String>) -> Self {
        ConfigValue::Scalar(Yaml::String(s.into()))
    }

    pub fn bool(b: bool) -> Self {
        ConfigValue::Scalar(Yaml::Boolean(b))
    }

    pub fn int(i: i64) -> Self {
        ConfigValue::Scalar(Yaml::Integer(i))
    }

    pub fn null() -> Self {
        ConfigValue::Scalar(Yaml::Null)
    }

    pub fn seq(items: impl IntoIterator<Item = ConfigValue>) -> Self {
        ConfigValue::Seq(items.into_iter().collect())
    }

    pub fn set(items: impl IntoIterator<Item = Yaml>) -> Self {
        ConfigValue::Set(items.into_iter().collect())
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, ConfigValue)>) -> Self {
        ConfigValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether the value carries nothing: null, the empty string, or an
    /// empty collection.
    pub fn is_empty(&self) -> bool {
        match self {
            ConfigValue::Scalar(Yaml::Null) => true,
            ConfigValue::Scalar(Yaml::String(s)) => s.is_empty(),
            ConfigValue::Scalar(_) => false,
            ConfigValue::Seq(items) => items.is_empty(),
            ConfigValue::Set(items) => items.is_empty(),
            ConfigValue::Map(entries) => entries.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Scalar(yaml) => yaml.as_str(),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a key if this is a map.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_map().and_then(|map| map.get(key))
    }
}

/// Which of the two requirement trees a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Settings for the whole site or document collection.
    Site,
    /// Settings for a single page.
    Page,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Site => write!(f, "site"),
            Scope::Page => write!(f, "page"),
        }
    }
}

/// Errors that can occur while merging or converting requirements.
#[derive(Debug, Clone, Error)]
pub enum RequirementsError {
    /// Both operands of a merge declare a navigation structure.
    #[error("Cannot merge {scope} requirements: both declare a 'nav' structure")]
    UnmergeableNavigation {
        /// Tree in which the conflict occurred
        scope: Scope,
    },

    /// A navigation value does not have the expected shape.
    #[error("Invalid navigation structure: {message}")]
    InvalidNav {
        /// What was wrong
        message: String,
    },

    /// YAML text could not be parsed or does not hold a mapping.
    #[error("Invalid requirements YAML: {message}")]
    Yaml {
        /// Error message
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, RequirementsError>;
