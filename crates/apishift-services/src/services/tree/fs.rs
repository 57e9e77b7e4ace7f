use super::{normalize_path, FileTree};
use apishift_foundation::{MigrationError, MigrationResult};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directories never visited.
const IGNORED_DIRS: &[&str] = &[".git", "node_modules"];

/// Tree backed by a directory on disk.
///
/// In dry-run mode writes are kept in memory: later reads see them, but
/// nothing on disk changes.
#[derive(Debug)]
pub struct FsTree {
    root: PathBuf,
    dry_run: bool,
    pending: BTreeMap<String, Vec<u8>>,
}

impl FsTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
            pending: BTreeMap::new(),
        }
    }

    pub fn dry_run(root: impl Into<PathBuf>) -> Self {
        Self {
            dry_run: true,
            ..Self::new(root)
        }
    }

    /// Writes recorded instead of performed (dry-run mode only).
    pub fn pending_writes(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.pending
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_slice()))
    }

    /// Map a tree path onto the disk, refusing anything that escapes the root.
    fn resolve(&self, path: &str) -> MigrationResult<PathBuf> {
        let relative = Path::new(normalize_path(path));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(MigrationError::internal(format!(
                "Path escapes the project root: {}",
                path
            )));
        }
        Ok(self.root.join(relative))
    }

    fn tree_path(&self, entry: &DirEntry) -> Option<String> {
        let relative = entry.path().strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }

    fn write_atomically(target: &Path, content: &[u8]) -> MigrationResult<()> {
        let dir = target.parent().ok_or_else(|| {
            MigrationError::internal(format!("No parent directory for {}", target.display()))
        })?;

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(content)?;
        temp.as_file().sync_all()?;
        if let Ok(metadata) = std::fs::metadata(target) {
            temp.as_file().set_permissions(metadata.permissions())?;
        }
        temp.persist(target).map_err(|e| MigrationError::Io(e.error))?;
        Ok(())
    }
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
}

impl FileTree for FsTree {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn read(&self, path: &str) -> Option<Vec<u8>> {
        if let Some(content) = self.pending.get(normalize_path(path)) {
            return Some(content.clone());
        }
        let target = self.resolve(path).ok()?;
        match std::fs::read(&target) {
            Ok(content) => Some(content),
            Err(err) => {
                debug!(path = %target.display(), error = %err, "Unreadable file");
                None
            }
        }
    }

    fn overwrite(&mut self, path: &str, content: &[u8]) -> MigrationResult<()> {
        let target = self.resolve(path)?;
        if !target.is_file() {
            return Err(MigrationError::internal(format!(
                "Cannot overwrite missing file: {}",
                path
            )));
        }

        if self.dry_run {
            debug!(path = %path, bytes = content.len(), "Dry run: recording write");
            self.pending
                .insert(normalize_path(path).to_string(), content.to_vec());
            return Ok(());
        }

        Self::write_atomically(&target, content)
    }

    fn visit(&self, visitor: &mut dyn FnMut(&str)) {
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_ignored(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(error = %err, "Skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(path) = self.tree_path(&entry) {
                visitor(&path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src/app")).unwrap();
        std::fs::create_dir_all(dir.path().join("node_modules/lib")).unwrap();
        std::fs::write(dir.path().join("src/app/a.ts"), "let a = 1;").unwrap();
        std::fs::write(dir.path().join("node_modules/lib/b.ts"), "let b = 1;").unwrap();
        std::fs::write(dir.path().join("README.md"), "# readme").unwrap();
        dir
    }

    #[test]
    fn test_visit_skips_ignored_dirs() {
        let dir = project();
        let tree = FsTree::new(dir.path());
        assert_eq!(tree.paths(), vec!["README.md", "src/app/a.ts"]);
    }

    #[test]
    fn test_overwrite_writes_to_disk() {
        let dir = project();
        let mut tree = FsTree::new(dir.path());
        tree.overwrite("/src/app/a.ts", b"let z = 1;").unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("src/app/a.ts")).unwrap(),
            "let z = 1;"
        );
    }

    #[test]
    fn test_dry_run_keeps_disk_untouched() {
        let dir = project();
        let mut tree = FsTree::dry_run(dir.path());
        tree.overwrite("src/app/a.ts", b"let z = 1;").unwrap();

        assert_eq!(tree.read("src/app/a.ts").unwrap(), b"let z = 1;".to_vec());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("src/app/a.ts")).unwrap(),
            "let a = 1;"
        );
        assert_eq!(tree.pending_writes().count(), 1);
    }

    #[test]
    fn test_overwrite_refuses_missing_and_escaping_paths() {
        let dir = project();
        let mut tree = FsTree::new(dir.path());
        assert!(tree.overwrite("src/app/missing.ts", b"x").is_err());
        assert!(tree.overwrite("../outside.ts", b"x").is_err());
        assert!(!tree.exists("../outside.ts"));
    }
}
