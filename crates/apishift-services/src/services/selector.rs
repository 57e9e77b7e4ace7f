//! Eligibility of tree paths for a change set.

use super::tree::{normalize_path, FileTree};
use apishift_foundation::{MigrationError, MigrationResult};
use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Selects paths that sit under a scope root and match at least one glob.
///
/// `*` matches within one path segment, `**` across segments.
#[derive(Debug, Clone)]
pub struct FileSelector {
    scope_roots: Vec<String>,
    patterns: Vec<Pattern>,
}

impl FileSelector {
    /// Compile `patterns`; an invalid glob is a rule-set error.
    pub fn new<I, S>(scope_roots: &[String], patterns: I) -> MigrationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = normalize_path(p.as_ref());
                Pattern::new(p).map_err(|e| MigrationError::pattern(p, e.msg))
            })
            .collect::<MigrationResult<Vec<_>>>()?;

        let scope_roots = scope_roots
            .iter()
            .map(|root| {
                let root = normalize_path(root);
                if root.is_empty() || root.ends_with('/') {
                    root.to_string()
                } else {
                    format!("{}/", root)
                }
            })
            .collect();

        Ok(Self {
            scope_roots,
            patterns,
        })
    }

    pub fn in_scope(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.scope_roots.iter().any(|root| path.starts_with(root))
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.in_scope(path) && self.matches(path)
    }

    /// Eligible paths in the tree's visitation order.
    ///
    /// Paths are snapshotted up front so the caller may overwrite files
    /// while iterating; matching happens lazily. Calling again restarts
    /// from a fresh snapshot.
    pub fn select<'s, T>(&'s self, tree: &T) -> impl Iterator<Item = String> + 's
    where
        T: FileTree + ?Sized,
    {
        tree.paths()
            .into_iter()
            .filter(move |path| self.is_selected(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tree::MemoryTree;
    use pretty_assertions::assert_eq;

    fn roots() -> Vec<String> {
        vec!["src/app/".to_string(), "src/lib/".to_string()]
    }

    #[test]
    fn test_double_star_crosses_directories() {
        let selector = FileSelector::new(&roots(), ["**/*.component.ts"]).unwrap();
        assert!(selector.is_selected("src/app/a.component.ts"));
        assert!(selector.is_selected("/src/app/deep/nested/b.component.ts"));
        assert!(!selector.is_selected("src/app/a.service.ts"));
    }

    #[test]
    fn test_single_star_stays_in_segment() {
        let selector = FileSelector::new(&roots(), ["src/app/*.ts"]).unwrap();
        assert!(selector.is_selected("src/app/a.ts"));
        assert!(!selector.is_selected("src/app/nested/a.ts"));
    }

    #[test]
    fn test_out_of_scope_paths_never_selected() {
        let selector = FileSelector::new(&roots(), ["**/*.ts"]).unwrap();
        assert!(selector.matches("tools/a.ts"));
        assert!(!selector.is_selected("tools/a.ts"));
        assert!(!selector.is_selected("src/application/a.ts"));
    }

    #[test]
    fn test_scope_root_without_trailing_slash() {
        let selector = FileSelector::new(&["/src/app".to_string()], ["**/*.ts"]).unwrap();
        assert!(selector.is_selected("src/app/a.ts"));
        assert!(!selector.is_selected("src/application/a.ts"));
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        let err = FileSelector::new(&roots(), ["src/[oops"]).unwrap_err();
        assert!(matches!(err, MigrationError::Pattern { .. }));
    }

    #[test]
    fn test_select_is_restartable() {
        let tree = MemoryTree::new()
            .with_file("src/app/a.component.ts", "")
            .with_file("src/lib/b.component.ts", "")
            .with_file("e2e/c.component.ts", "");
        let selector = FileSelector::new(&roots(), ["**/*.component.ts"]).unwrap();

        let first: Vec<String> = selector.select(&tree).collect();
        let second: Vec<String> = selector.select(&tree).collect();

        assert_eq!(first, vec!["src/app/a.component.ts", "src/lib/b.component.ts"]);
        assert_eq!(first, second);
    }
}
