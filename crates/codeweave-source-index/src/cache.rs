//! Content-addressed cache of statement indexes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use sha2::{Digest, Sha256};

use crate::error::{IndexError, Result};
use crate::index::StatementIndex;

/// Hash source text for cache lookups.
///
/// Format: `"sha256:<hex-digest>"`.
pub fn content_hash(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    format!("sha256:{:x}", digest)
}

#[derive(Debug)]
struct CacheEntry {
    hash: String,
    index: Rc<StatementIndex>,
}

/// Statement indexes by path, rebuilt when the file content changes.
#[derive(Debug, Default)]
pub struct IndexCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index for the file at `path`, reading it from disk.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Rc<StatementIndex>> {
        let source = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.get_or_parse(path, &source)
    }

    /// Index for `source`, stored under `path`.
    pub fn get_or_parse(&mut self, path: &Path, source: &str) -> Result<Rc<StatementIndex>> {
        let hash = content_hash(source);
        if let Some(entry) = self.entries.get(path)
            && entry.hash == hash
        {
            tracing::debug!(path = %path.display(), "statement index cache hit");
            return Ok(Rc::clone(&entry.index));
        }

        tracing::debug!(path = %path.display(), "statement index cache miss");
        let index = Rc::new(StatementIndex::parse(source, &path.display().to_string())?);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                hash,
                index: Rc::clone(&index),
            },
        );
        Ok(index)
    }

    /// Drop the entry for `path`, returning whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
