//! Virtual file tree the migration reads from and writes to.
//!
//! Paths are `/`-separated and relative to the tree root. A leading `/`
//! is accepted and ignored.

mod fs;
mod memory;

pub use fs::FsTree;
pub use memory::MemoryTree;

use apishift_foundation::MigrationResult;

/// Minimal tree capability used by the orchestrator.
///
/// The engine never creates or deletes files; `overwrite` replaces the
/// full content of a file that already exists.
pub trait FileTree {
    fn exists(&self, path: &str) -> bool;

    /// Full content of `path`, or `None` when absent or unreadable.
    fn read(&self, path: &str) -> Option<Vec<u8>>;

    fn overwrite(&mut self, path: &str, content: &[u8]) -> MigrationResult<()>;

    /// Call `visitor` with every file path in the tree.
    fn visit(&self, visitor: &mut dyn FnMut(&str));

    /// Snapshot of every file path, in visitation order.
    fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.visit(&mut |path| paths.push(path.to_string()));
        paths
    }
}

/// Strip the virtual-root marker from a tree path.
pub fn normalize_path(path: &str) -> &str {
    path.trim_start_matches('/')
}
