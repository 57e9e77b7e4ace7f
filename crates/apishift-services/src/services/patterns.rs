//! File-pattern expansion across naming conventions.
//!
//! Generated files have been named `name.component.ts`, `name-component.ts`
//! and plain `name.ts` over the years. A pattern naming one convention is
//! expanded so that every convention matches.

use apishift_config::MigrationConfig;
use indexmap::IndexSet;

/// Expands globs whose file name ends in `<stem>.<segment><ext>` or
/// `<stem>-<segment><ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternExpander {
    segments: Vec<String>,
    removable_segments: Vec<String>,
}

impl Default for PatternExpander {
    fn default() -> Self {
        Self::from_config(&MigrationConfig::default())
    }
}

impl PatternExpander {
    pub fn new(segments: Vec<String>, removable_segments: Vec<String>) -> Self {
        Self {
            segments,
            removable_segments,
        }
    }

    pub fn from_config(config: &MigrationConfig) -> Self {
        Self::new(config.segments.clone(), config.removable_segments.clone())
    }

    /// Expand one pattern. The original pattern is always the first member.
    pub fn expand(&self, pattern: &str) -> IndexSet<String> {
        let mut expanded = IndexSet::new();
        expanded.insert(pattern.to_string());

        let (dir, file_name) = match pattern.rfind('/') {
            Some(idx) => pattern.split_at(idx + 1),
            None => ("", pattern),
        };
        let Some(ext_start) = file_name.rfind('.').filter(|&idx| idx > 0) else {
            return expanded;
        };
        let (head, ext) = file_name.split_at(ext_start);

        for segment in &self.segments {
            let Some(stem) = Self::strip_segment(head, segment) else {
                continue;
            };
            expanded.insert(format!("{dir}{stem}.{segment}{ext}"));
            expanded.insert(format!("{dir}{stem}-{segment}{ext}"));
            if self.removable_segments.contains(segment) {
                expanded.insert(format!("{dir}{stem}{ext}"));
            }
            break;
        }

        if expanded.len() > 1 {
            tracing::trace!(pattern = %pattern, expanded = ?expanded, "Expanded file pattern");
        }
        expanded
    }

    /// Expand every pattern of a change set into one set.
    pub fn expand_all<'a, I>(&self, patterns: I) -> IndexSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        patterns
            .into_iter()
            .flat_map(|pattern| self.expand(pattern))
            .collect()
    }

    /// `head` minus a trailing `.segment` or `-segment`, if the stem is non-empty.
    fn strip_segment<'h>(head: &'h str, segment: &str) -> Option<&'h str> {
        let stem = head.strip_suffix(segment)?;
        let stem = stem
            .strip_suffix('.')
            .or_else(|| stem.strip_suffix('-'))?;
        (!stem.is_empty()).then_some(stem)
    }
}
