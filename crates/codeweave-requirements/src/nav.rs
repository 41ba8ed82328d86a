//! Navigation structure helpers.
//!
//! The navigation is stored in the site tree under [`NAV_KEY`] as a nested
//! list: plain strings are page paths, single-key maps are either a titled
//! page (`{title: path}`) or a titled section (`{title: [..]}`). These helpers
//! convert between that form and a flat list of [`NavEntry`] values.

use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;

use crate::merge::Requirements;
use crate::types::{ConfigValue, NAV_KEY, RequirementsError, Result};

/// One page in the navigation, with the section titles leading to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub hierarchy: Vec<String>,
    pub loc: PathBuf,
}

impl NavEntry {
    pub fn new(hierarchy: Vec<String>, loc: impl Into<PathBuf>) -> Self {
        Self {
            hierarchy,
            loc: loc.into(),
        }
    }

    /// Derive an entry from a page path relative to the docs folder.
    ///
    /// Every directory becomes a section and the file stem becomes the page
    /// title, with snake_case turned into capitalized words.
    pub fn from_path(path: &Path) -> Self {
        let mut hierarchy: Vec<String> = path
            .parent()
            .into_iter()
            .flat_map(Path::components)
            .filter_map(|component| match component {
                Component::Normal(part) => Some(snake_to_text(&part.to_string_lossy())),
                _ => None,
            })
            .collect();
        if let Some(stem) = path.file_stem() {
            hierarchy.push(snake_to_text(&stem.to_string_lossy()));
        }
        Self::new(hierarchy, path)
    }
}

/// Turn `snake_case` into `Snake Case`.
pub fn snake_to_text(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn invalid(message: impl Into<String>) -> RequirementsError {
    RequirementsError::InvalidNav {
        message: message.into(),
    }
}

/// Flatten a navigation value into entries.
pub fn nav_to_entries(nav: &ConfigValue) -> Result<Vec<NavEntry>> {
    let items = nav
        .as_seq()
        .ok_or_else(|| invalid("navigation must be a list"))?;

    let mut entries = Vec::new();
    for item in items {
        match item {
            ConfigValue::Scalar(_) => {
                let path = item
                    .as_str()
                    .ok_or_else(|| invalid("navigation entries must be strings or maps"))?;
                entries.push(NavEntry::new(Vec::new(), path));
            }
            ConfigValue::Map(map) => {
                let (title, value) = match map.first() {
                    Some(entry) if map.len() == 1 => entry,
                    _ => {
                        return Err(invalid(format!(
                            "navigation maps must have exactly one key, found {}",
                            map.len()
                        )));
                    }
                };
                if let Some(path) = value.as_str() {
                    entries.push(NavEntry::new(vec![title.clone()], path));
                } else if value.as_seq().is_some() {
                    for sub in nav_to_entries(value)? {
                        let mut hierarchy = Vec::with_capacity(sub.hierarchy.len() + 1);
                        hierarchy.push(title.clone());
                        hierarchy.extend(sub.hierarchy);
                        entries.push(NavEntry::new(hierarchy, sub.loc));
                    }
                } else {
                    return Err(invalid(format!(
                        "section '{title}' must map to a path or a list"
                    )));
                }
            }
            ConfigValue::Seq(_) | ConfigValue::Set(_) => {
                return Err(invalid("navigation entries must be strings or maps"));
            }
        }
    }
    Ok(entries)
}

/// Build the nested navigation value for a list of entries.
///
/// Entries without a hierarchy come first, followed by one section per
/// distinct leading title in first-seen order. A section holding a single
/// untitled page collapses to `{title: path}`.
pub fn entries_to_nav(entries: &[NavEntry]) -> ConfigValue {
    let mut items = Vec::new();
    let mut sections: IndexMap<&str, Vec<NavEntry>> = IndexMap::new();

    for entry in entries {
        match entry.hierarchy.split_first() {
            None => items.push(ConfigValue::string(entry.loc.to_string_lossy())),
            Some((head, rest)) => sections
                .entry(head.as_str())
                .or_default()
                .push(NavEntry::new(rest.to_vec(), entry.loc.clone())),
        }
    }

    for (title, section) in sections {
        let nested = entries_to_nav(&section);
        let value = match nested {
            ConfigValue::Seq(mut sub) if sub.len() == 1 && sub[0].as_str().is_some() => sub.remove(0),
            other => other,
        };
        items.push(ConfigValue::map([(title, value)]));
    }

    ConfigValue::Seq(items)
}

impl Requirements {
    /// Append an entry to the declared navigation, dropping duplicates.
    pub fn add_nav_entry(&mut self, entry: NavEntry) -> Result<()> {
        let mut entries = match self.site.get(NAV_KEY) {
            Some(nav) if !nav.is_empty() => nav_to_entries(nav)?,
            _ => Vec::new(),
        };
        entries.push(entry);

        let mut unique: Vec<NavEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !unique.contains(&entry) {
                unique.push(entry);
            }
        }

        self.site.insert(NAV_KEY.to_string(), entries_to_nav(&unique));
        Ok(())
    }
}
