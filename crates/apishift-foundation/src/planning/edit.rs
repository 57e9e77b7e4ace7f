//! Located text edits against an immutable source snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Where an edit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditOrigin {
    /// An identifier node located by the syntax tree
    Identifier,
    /// A whole comment span rewritten by the comment pass
    Comment,
}

/// A pending replacement of the byte range `start..end` with `text`.
///
/// Offsets are byte offsets into the snapshot the edit was computed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub origin: EditOrigin,
}

impl Edit {
    pub fn new(start: usize, end: usize, text: impl Into<String>, origin: EditOrigin) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            origin,
        }
    }

    pub fn identifier(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self::new(start, end, text, EditOrigin::Identifier)
    }

    pub fn comment(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self::new(start, end, text, EditOrigin::Comment)
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Same span and same replacement text.
    pub fn same_effect(&self, other: &Edit) -> bool {
        self.start == other.start && self.end == other.end && self.text == other.text
    }

    /// Whether applying both edits would touch the same text.
    ///
    /// Two insertions at the same offset overlap because their relative
    /// order is ambiguous.
    pub fn overlaps(&self, other: &Edit) -> bool {
        if self.start == other.start {
            return true;
        }
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} edit {}..{} -> {:?}",
            self.origin, self.start, self.end, self.text
        )
    }
}
