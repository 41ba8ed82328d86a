//! Indexing source files on disk.

use std::path::Path;

use codeweave_source_index::{IndexCache, IndexError, StatementIndex, StatementKind};
use indoc::indoc;
use tempfile::TempDir;

const SERVICE: &str = indoc! {r#"
    use std::collections::HashMap;

    pub struct Registry {
        names: HashMap<String, u32>,
    }

    impl Registry {
        pub fn register(&mut self, name: &str) -> u32 {
            let next = self.names.len() as u32;
            *self
                .names
                .entry(name.to_string())
                .or_insert(next)
        }
    }
"#};

#[test]
fn test_index_own_sources() {
    let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    for name in ["lib.rs", "index.rs", "interval.rs", "cache.rs", "error.rs"] {
        let index = StatementIndex::from_path(&src.join(name)).unwrap();
        assert!(!index.is_empty(), "{name} has no statements");
        assert!(index.iter().all(|iv| iv.start_line >= 1 && iv.end_line > iv.start_line));
    }
}

#[test]
fn test_methods_and_multiline_expressions() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("registry.rs");
    std::fs::write(&path, SERVICE).unwrap();
    let index = StatementIndex::from_path(&path).unwrap();

    let stmt = index.overlap_at(11).unwrap();
    assert_eq!((stmt.start_line, stmt.end_line), (10, 14));
    assert_eq!(stmt.kind, StatementKind::Expr);

    assert_eq!(index.enclosing_fn(12), Some("register"));
    assert_eq!(index.enclosing_fn(4), None);

    let method = index.enveloping(stmt).unwrap();
    assert_eq!(method.kind, StatementKind::Fn("register".to_string()));
    let block = index.enveloping(method).unwrap();
    assert_eq!(block.kind, StatementKind::Item("impl"));

    assert_eq!(index.nearest_after(8).unwrap().start_line, 9);
    assert_eq!(index.nearest_before(3).unwrap().start_line, 1);
}

#[test]
fn test_cache_follows_file_contents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("registry.rs");
    std::fs::write(&path, SERVICE).unwrap();

    let mut cache = IndexCache::new();
    let first = cache.get_or_load(&path).unwrap();
    let again = cache.get_or_load(&path).unwrap();
    assert!(std::rc::Rc::ptr_eq(&first, &again));

    std::fs::write(&path, "fn main() {}\n").unwrap();
    let changed = cache.get_or_load(&path).unwrap();
    assert_eq!(changed.len(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = StatementIndex::from_path(&temp.path().join("absent.rs")).unwrap_err();
    assert!(matches!(err, IndexError::Io { .. }));
}
