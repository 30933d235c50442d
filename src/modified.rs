//! Detection of locally modified neurons.
//!
//! Maps git's changed-file set onto the configured mapping table. Directory
//! mappings (destination ending in a separator, or a directory on disk)
//! match any changed path under their prefix; file mappings match exactly.

use std::collections::HashSet;
use std::path::Path;

use crate::config::{Mapping, NeuronsConfig};
use crate::error::Result;
use crate::git;

/// Normalize a repo-relative path for comparison.
fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.strip_prefix("./").unwrap_or(&path).to_string()
}

/// True when the mapping's destination names a directory.
pub fn is_directory_mapping(mapping: &Mapping, repo_root: &Path) -> bool {
    mapping.destination.ends_with('/')
        || mapping.source.ends_with('/')
        || repo_root.join(&mapping.destination).is_dir()
}

/// Does a changed path belong to this mapping?
fn matches(mapping: &Mapping, changed: &str, repo_root: &Path) -> bool {
    let dest = normalize(&mapping.destination);
    if is_directory_mapping(mapping, repo_root) {
        let prefix = dest.trim_end_matches('/');
        changed == prefix || changed.starts_with(&format!("{}/", prefix))
    } else {
        changed == dest
    }
}

/// Mappings whose destinations have uncommitted local changes.
///
/// Results come back in mapping order, deduplicated by the
/// (brain, source, destination) triple.
pub fn modified_neurons(config: &NeuronsConfig, repo_root: &Path) -> Result<Vec<Mapping>> {
    let changed: Vec<String> = git::changed_files(repo_root)?
        .iter()
        .map(|p| normalize(p))
        .collect();

    let mut seen = HashSet::new();
    let mut modified = Vec::new();
    for mapping in &config.mappings {
        if !changed.iter().any(|c| matches(mapping, c, repo_root)) {
            continue;
        }
        let key = (
            mapping.brain_id.clone(),
            mapping.source.clone(),
            mapping.destination.clone(),
        );
        if seen.insert(key) {
            modified.push(mapping.clone());
        }
    }
    Ok(modified)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(source: &str, destination: &str) -> Mapping {
        Mapping {
            brain_id: "b".into(),
            source: source.into(),
            destination: destination.into(),
            key: None,
        }
    }

    #[test]
    fn test_file_mapping_matches_exactly() {
        let root = Path::new("/nonexistent");
        let m = mapping("src/a.py", "dst/a.py");
        assert!(matches(&m, "dst/a.py", root));
        assert!(!matches(&m, "dst/a.pyc", root));
        assert!(!matches(&m, "dst/a.py/extra", root));
    }

    #[test]
    fn test_directory_mapping_matches_by_prefix() {
        let root = Path::new("/nonexistent");
        let m = mapping("shared/", "vendor/shared/");
        assert!(matches(&m, "vendor/shared/a.txt", root));
        assert!(matches(&m, "vendor/shared/deep/b.txt", root));
        assert!(!matches(&m, "vendor/shared-other/c.txt", root));
        assert!(!matches(&m, "vendor/other.txt", root));
    }

    #[test]
    fn test_directory_detected_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("vendor/lib")).unwrap();
        // No trailing separator in the config, but the path is a directory.
        let m = mapping("lib", "vendor/lib");
        assert!(matches(&m, "vendor/lib/x.txt", dir.path()));
    }

    #[test]
    fn test_normalize_strips_dot_and_backslashes() {
        assert_eq!(normalize("./a/b.txt"), "a/b.txt");
        assert_eq!(normalize("a\\b.txt"), "a/b.txt");
    }
}
