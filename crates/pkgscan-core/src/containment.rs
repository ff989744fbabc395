//! Pruning of manifests nested inside other packages.

use std::collections::BTreeSet;

/// Parent directory of a repository-relative path; `""` is the root.
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Directories of `dirs` that are not nested below another member.
///
/// Each candidate's ancestors are walked up to, but not including, the
/// repository root. A candidate is dropped as soon as one ancestor is itself
/// in `dirs`, e.g. a `test/` fixture inside a package. The root directory is
/// never treated as a containing package.
pub fn filter_nested(dirs: &BTreeSet<String>) -> BTreeSet<String> {
    dirs.iter()
        .filter(|dir| !has_ancestor_in(dir, dirs))
        .cloned()
        .collect()
}

fn has_ancestor_in(dir: &str, dirs: &BTreeSet<String>) -> bool {
    let mut parent = parent_dir(dir);
    while !parent.is_empty() {
        if dirs.contains(parent) {
            return true;
        }
        parent = parent_dir(parent);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(dirs: &[&str]) -> BTreeSet<String> {
        dirs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("package.xml"), "");
        assert_eq!(parent_dir("a/package.xml"), "a");
        assert_eq!(parent_dir("a/b/c"), "a/b");
        assert_eq!(parent_dir(""), "");
    }

    #[test]
    fn test_root_and_nested_test_package() {
        assert_eq!(
            filter_nested(&set(&["", "pkg_a", "pkg_a/test"])),
            set(&["", "pkg_a"])
        );
    }

    #[test]
    fn test_deep_nesting_and_siblings() {
        let dirs = set(&[
            "src/nav",
            "src/nav/test/fixtures/pkg",
            "src/navigation",
            "src/navigation/msgs",
            "tools/a/b",
        ]);
        assert_eq!(
            filter_nested(&dirs),
            set(&["src/nav", "src/navigation", "tools/a/b"])
        );
    }

    #[test]
    fn test_prefix_is_not_containment() {
        assert_eq!(filter_nested(&set(&["pkg", "pkg_ext"])), set(&["pkg", "pkg_ext"]));
    }

    #[test]
    fn test_result_is_subset_without_nesting() {
        let dirs = set(&["a", "a/b", "a/b/c", "d/e", "d", "f/g/h", "f/g/h/i/j", "", "x"]);
        let filtered = filter_nested(&dirs);

        assert!(filtered.is_subset(&dirs));
        for dir in &filtered {
            for other in &filtered {
                if !other.is_empty() && dir != other {
                    assert!(!dir.starts_with(&format!("{other}/")), "{dir} inside {other}");
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let dirs = set(&["", "a", "a/test", "b/c", "b/c/d/e", "z"]);
        let once = filter_nested(&dirs);
        assert_eq!(filter_nested(&once), once);
    }

    #[test]
    fn test_empty() {
        assert!(filter_nested(&BTreeSet::new()).is_empty());
    }
}
