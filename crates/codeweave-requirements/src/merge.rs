//! Deep merging of requirement trees.
//!
//! Merge rules, applied recursively:
//!
//! - map ⊕ map: per-key merge, keys in first-seen order
//! - seq ⊕ seq: left items, then right items not already in the left
//! - set ⊕ set: union
//! - anything else: the right value wins
//!
//! On top of that, the navigation key at the top of each tree is never
//! merged. If both sides declare a non-empty navigation the merge fails;
//! otherwise the side that declares it passes through unchanged.

use crate::types::{ConfigMap, ConfigValue, NAV_KEY, RequirementsError, Result, Scope};

/// Merge two values, `b` taking precedence where they cannot be combined.
pub fn merge_values(a: &ConfigValue, b: &ConfigValue) -> ConfigValue {
    match (a, b) {
        (ConfigValue::Map(a), ConfigValue::Map(b)) => ConfigValue::Map(merge_maps(a, b)),
        (ConfigValue::Seq(a), ConfigValue::Seq(b)) => {
            let mut items = a.clone();
            items.extend(b.iter().filter(|item| !a.contains(item)).cloned());
            ConfigValue::Seq(items)
        }
        (ConfigValue::Set(a), ConfigValue::Set(b)) => ConfigValue::Set(a.union(b).cloned().collect()),
        (_, b) => b.clone(),
    }
}

/// Merge two maps key by key.
pub fn merge_maps(a: &ConfigMap, b: &ConfigMap) -> ConfigMap {
    let mut merged = a.clone();
    for (key, value) in b {
        let value = match a.get(key) {
            Some(existing) => merge_values(existing, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

/// Requirements declared by a rendered fragment.
///
/// `site` holds settings for the whole site (extensions, themes, the
/// navigation), `page` holds settings for the page the fragment lands on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Requirements {
    pub site: ConfigMap,
    pub page: ConfigMap,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a top-level site key.
    pub fn with_site(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.site.insert(key.into(), value);
        self
    }

    /// Set a top-level page key.
    pub fn with_page(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.page.insert(key.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.site.is_empty() && self.page.is_empty()
    }

    /// The declared navigation, if any.
    pub fn nav(&self) -> Option<&ConfigValue> {
        declared_nav(&self.site)
    }

    /// Merge `self` followed by `other`.
    ///
    /// # Errors
    ///
    /// Returns [`RequirementsError::UnmergeableNavigation`] if both sides
    /// declare a non-empty navigation in the same tree.
    pub fn merge(&self, other: &Requirements) -> Result<Requirements> {
        Ok(Requirements {
            site: merge_scope(Scope::Site, &self.site, &other.site)?,
            page: merge_scope(Scope::Page, &self.page, &other.page)?,
        })
    }

    /// Merge a sequence of requirements from left to right.
    pub fn merge_all<'a>(items: impl IntoIterator<Item = &'a Requirements>) -> Result<Requirements> {
        items
            .into_iter()
            .try_fold(Requirements::new(), |acc, item| acc.merge(item))
    }
}

fn declared_nav(map: &ConfigMap) -> Option<&ConfigValue> {
    map.get(NAV_KEY).filter(|nav| !nav.is_empty())
}

fn merge_scope(scope: Scope, a: &ConfigMap, b: &ConfigMap) -> Result<ConfigMap> {
    let nav = match (declared_nav(a), declared_nav(b)) {
        (Some(_), Some(_)) => {
            tracing::debug!(%scope, "refusing to merge two navigation structures");
            return Err(RequirementsError::UnmergeableNavigation { scope });
        }
        (Some(nav), None) | (None, Some(nav)) => Some(nav.clone()),
        (None, None) => None,
    };

    let mut merged = merge_maps(a, b);
    if let Some(nav) = nav {
        merged.insert(NAV_KEY.to_string(), nav);
    }
    Ok(merged)
}
