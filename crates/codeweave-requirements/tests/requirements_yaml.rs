//! Requirements written as YAML documents and merged.

use std::path::Path;

use codeweave_requirements::{
    ConfigValue, NAV_KEY, NavEntry, Requirements, RequirementsError, Scope, parse_config_map,
};

const SITE_A: &str = "
markdown_extensions:
  - admonition
  - pymdownx.superfences
theme:
  name: material
  features:
    - navigation.tabs
";

const SITE_B: &str = "
markdown_extensions:
  - pymdownx.superfences
  - pymdownx.details
theme:
  palette: slate
";

#[test]
fn test_merge_site_documents() {
    let a = Requirements::from_yaml_strs(SITE_A, "").unwrap();
    let b = Requirements::from_yaml_strs(SITE_B, "title: Report\n").unwrap();
    let merged = a.merge(&b).unwrap();

    let extensions: Vec<&str> = merged
        .site
        .get("markdown_extensions")
        .and_then(ConfigValue::as_seq)
        .unwrap()
        .iter()
        .filter_map(ConfigValue::as_str)
        .collect();
    assert_eq!(
        extensions,
        vec!["admonition", "pymdownx.superfences", "pymdownx.details"]
    );

    let theme = merged.site.get("theme").unwrap();
    assert_eq!(theme.get("name"), Some(&ConfigValue::string("material")));
    assert_eq!(theme.get("palette"), Some(&ConfigValue::string("slate")));
    assert!(theme.get("features").is_some());

    assert_eq!(merged.page.get("title"), Some(&ConfigValue::string("Report")));
}

#[test]
fn test_merge_all_is_left_to_right() {
    let first = Requirements::from_yaml_strs("", "title: First\n").unwrap();
    let second = Requirements::from_yaml_strs("", "title: Second\n").unwrap();
    let merged = Requirements::merge_all([&first, &second]).unwrap();
    assert_eq!(merged.page.get("title"), Some(&ConfigValue::string("Second")));
}

#[test]
fn test_two_navigations_conflict() {
    let mut a = Requirements::new();
    a.add_nav_entry(NavEntry::from_path(Path::new("guide/intro.md")))
        .unwrap();
    let mut b = Requirements::new();
    b.add_nav_entry(NavEntry::from_path(Path::new("guide/usage.md")))
        .unwrap();

    assert!(matches!(
        a.merge(&b),
        Err(RequirementsError::UnmergeableNavigation { scope: Scope::Site })
    ));

    let styled = Requirements::from_yaml_strs("theme:\n  name: material\n", "").unwrap();
    let merged = a.merge(&styled).unwrap();
    assert_eq!(merged.nav(), a.site.get(NAV_KEY));
}

#[test]
fn test_rejects_non_mapping_documents() {
    assert!(matches!(
        parse_config_map("- just\n- a list\n"),
        Err(RequirementsError::Yaml { .. })
    ));
    assert!(Requirements::from_yaml_strs("key: [unclosed\n", "").is_err());
}
