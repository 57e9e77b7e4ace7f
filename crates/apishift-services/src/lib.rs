pub mod services;

// Re-export commonly used types at crate root for convenience
pub use services::{
    ContentTransformer, FileChange, FileIssue, FileKind, FileSelector, FileTree, FsTree,
    MemoryTree, MigrationReport, MigrationRunner, PatternExpander, RunOutcome, Strategy,
};
