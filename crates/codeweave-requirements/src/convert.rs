//! Conversion between YAML and requirement trees.

use yaml_rust2::yaml::Hash;
use yaml_rust2::{Yaml, YamlEmitter, YamlLoader};

use crate::merge::Requirements;
use crate::types::{ConfigMap, ConfigValue, RequirementsError, Result};

impl ConfigValue {
    /// Convert a YAML value.
    ///
    /// Arrays become sequences and hashes become maps. Map entries whose key
    /// is not a string are dropped.
    pub fn from_yaml(yaml: Yaml) -> ConfigValue {
        match yaml {
            Yaml::Array(items) => ConfigValue::Seq(items.into_iter().map(ConfigValue::from_yaml).collect()),
            Yaml::Hash(hash) => ConfigValue::Map(map_from_hash(hash)),
            other => ConfigValue::Scalar(other),
        }
    }

    /// Convert back to YAML. Sets are written as arrays.
    pub fn to_yaml(&self) -> Yaml {
        match self {
            ConfigValue::Scalar(yaml) => yaml.clone(),
            ConfigValue::Seq(items) => Yaml::Array(items.iter().map(ConfigValue::to_yaml).collect()),
            ConfigValue::Set(items) => Yaml::Array(items.iter().cloned().collect()),
            ConfigValue::Map(entries) => Yaml::Hash(hash_from_map(entries)),
        }
    }
}

fn map_from_hash(hash: Hash) -> ConfigMap {
    hash.into_iter()
        .filter_map(|(key, value)| {
            key.as_str()
                .map(|key| (key.to_string(), ConfigValue::from_yaml(value)))
        })
        .collect()
}

fn hash_from_map(map: &ConfigMap) -> Hash {
    let mut hash = Hash::new();
    for (key, value) in map {
        hash.insert(Yaml::String(key.clone()), value.to_yaml());
    }
    hash
}

/// Parse a YAML document holding a mapping.
///
/// An empty document yields an empty map.
pub fn parse_config_map(source: &str) -> Result<ConfigMap> {
    let docs = YamlLoader::load_from_str(source).map_err(|e| RequirementsError::Yaml {
        message: e.to_string(),
    })?;
    match docs.into_iter().next() {
        None | Some(Yaml::Null) => Ok(ConfigMap::new()),
        Some(Yaml::Hash(hash)) => Ok(map_from_hash(hash)),
        Some(_) => Err(RequirementsError::Yaml {
            message: "expected a mapping at the top level".to_string(),
        }),
    }
}

/// Write a map as a YAML document.
pub fn emit_config_map(map: &ConfigMap) -> Result<String> {
    let mut out = String::new();
    let mut emitter = YamlEmitter::new(&mut out);
    emitter
        .dump(&Yaml::Hash(hash_from_map(map)))
        .map_err(|e| RequirementsError::Yaml {
            message: format!("{e:?}"),
        })?;
    Ok(out)
}

impl Requirements {
    /// Build requirements from a site-level and a page-level YAML document.
    pub fn from_yaml_strs(site: &str, page: &str) -> Result<Requirements> {
        Ok(Requirements {
            site: parse_config_map(site)?,
            page: parse_config_map(page)?,
        })
    }
}
