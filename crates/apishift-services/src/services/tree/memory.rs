use super::{normalize_path, FileTree};
use apishift_foundation::{MigrationError, MigrationResult};
use std::collections::BTreeMap;

/// In-memory tree, visited in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTree {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file while setting up the tree.
    pub fn insert(&mut self, path: &str, content: impl Into<Vec<u8>>) {
        self.files
            .insert(normalize_path(path).to_string(), content.into());
    }

    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    /// Content of `path` as UTF-8 text.
    pub fn read_to_string(&self, path: &str) -> Option<String> {
        self.read(path)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileTree for MemoryTree {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(normalize_path(path))
    }

    fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.files.get(normalize_path(path)).cloned()
    }

    fn overwrite(&mut self, path: &str, content: &[u8]) -> MigrationResult<()> {
        match self.files.get_mut(normalize_path(path)) {
            Some(existing) => {
                *existing = content.to_vec();
                Ok(())
            }
            None => Err(MigrationError::internal(format!(
                "Cannot overwrite missing file: {}",
                path
            ))),
        }
    }

    fn visit(&self, visitor: &mut dyn FnMut(&str)) {
        for path in self.files.keys() {
            visitor(path);
        }
    }
}
