//! Edit application: splice located edits into an immutable source snapshot

use crate::error::{AstError, AstResult};
use apishift_foundation::Edit;
use serde::{Deserialize, Serialize};

/// Transformation result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    /// Transformed source code
    pub transformed_source: String,
    /// Applied edits, in application order (descending start offset)
    pub applied_edits: Vec<Edit>,
    /// Transformation statistics
    pub statistics: TransformStatistics,
}

/// Transformation statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransformStatistics {
    /// Total number of edits handed to the applier
    pub total_edits: usize,
    /// Number of edits spliced into the output
    pub applied_count: usize,
    /// Exact duplicates dropped before applying
    pub duplicate_count: usize,
    /// Lines added
    pub lines_added: usize,
    /// Lines removed
    pub lines_removed: usize,
    /// Characters (bytes) added
    pub characters_added: usize,
    /// Characters (bytes) removed
    pub characters_removed: usize,
}

/// Drop exact duplicates and reject any other overlap.
///
/// Overlapping edits with different effects have no safe order, so the
/// first conflicting pair is reported instead of letting one silently win.
fn deduplicate_edits(edits: Vec<Edit>) -> AstResult<Vec<Edit>> {
    let mut unique_edits: Vec<Edit> = Vec::with_capacity(edits.len());

    for new_edit in edits {
        if unique_edits.iter().any(|e| e.same_effect(&new_edit)) {
            tracing::debug!(edit = %new_edit, "Skipping exact duplicate edit");
            continue;
        }
        if let Some(existing) = unique_edits.iter().find(|e| e.overlaps(&new_edit)) {
            tracing::warn!(
                existing = %existing,
                conflicting = %new_edit,
                "Found overlapping edits"
            );
            return Err(AstError::edit_conflict(existing.clone(), new_edit));
        }
        unique_edits.push(new_edit);
    }

    Ok(unique_edits)
}

/// Apply `edits` (all computed against `source`) and return the new text.
///
/// Edits are applied from the end of the text toward the beginning so that
/// each splice leaves the offsets of the remaining edits valid. Either every
/// edit is applied or an error is returned and nothing is.
pub fn apply_edits(source: &str, edits: Vec<Edit>) -> AstResult<TransformResult> {
    let total_edits = edits.len();

    for edit in &edits {
        validate_edit(source, edit)?;
    }

    let mut sorted_edits = deduplicate_edits(edits)?;
    let duplicate_count = total_edits - sorted_edits.len();
    sorted_edits.sort_by(|a, b| b.start.cmp(&a.start));

    let mut result_source = source.to_string();
    let mut statistics = TransformStatistics {
        total_edits,
        duplicate_count,
        ..Default::default()
    };

    for edit in &sorted_edits {
        let removed = &source[edit.span()];
        statistics.characters_removed += removed.len();
        statistics.characters_added += edit.text.len();
        statistics.lines_removed += removed.matches('\n').count();
        statistics.lines_added += edit.text.matches('\n').count();
        result_source.replace_range(edit.span(), &edit.text);
    }
    statistics.applied_count = sorted_edits.len();

    tracing::trace!(
        applied = statistics.applied_count,
        duplicates = statistics.duplicate_count,
        "Applied edits"
    );

    Ok(TransformResult {
        transformed_source: result_source,
        applied_edits: sorted_edits,
        statistics,
    })
}

fn validate_edit(source: &str, edit: &Edit) -> AstResult<()> {
    let in_bounds = edit.start <= edit.end
        && edit.end <= source.len()
        && source.is_char_boundary(edit.start)
        && source.is_char_boundary(edit.end);
    if in_bounds {
        Ok(())
    } else {
        Err(AstError::EditOutOfBounds {
            start: edit.start,
            end: edit.end,
            len: source.len(),
        })
    }
}
