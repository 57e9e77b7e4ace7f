//! Comment spans for TypeScript-like sources.
//!
//! Comments are taken from the swc lexer, so `//` or `/*` inside a string,
//! a template literal or a regex literal never starts a comment, and
//! comments inside `${...}` substitutions are found.

use crate::error::AstResult;
use crate::parser::{SyntaxProvider, TypeScriptSyntax};
use swc_common::comments::{self, SingleThreadedComments};
use swc_common::BytePos;

/// Comment flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...` up to (not including) the line terminator
    Line,
    /// `/* ... */`
    Block,
}

/// A comment located by byte offsets, delimiters included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSpan {
    pub start: usize,
    pub end: usize,
    pub kind: CommentKind,
}

impl CommentSpan {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

/// Locate every comment in `source`, in order.
///
/// `file_path` selects the dialect the same way parsing does. Sources the
/// lexer cannot get through are an error.
pub fn find_comment_spans(file_path: &str, source: &str) -> AstResult<Vec<CommentSpan>> {
    let syntax = TypeScriptSyntax::new();
    let tree = syntax.parse(file_path, source)?;
    Ok(syntax.comment_spans(&tree))
}

/// Flatten collected comments into sorted spans relative to `base`.
pub(crate) fn collect_spans(collected: &SingleThreadedComments, base: BytePos) -> Vec<CommentSpan> {
    let (leading, trailing) = collected.borrow_all();
    let mut spans: Vec<CommentSpan> = leading
        .values()
        .chain(trailing.values())
        .flatten()
        .filter(|comment| !comment.span.is_dummy() && comment.span.lo >= base)
        .map(|comment| CommentSpan {
            start: (comment.span.lo.0 - base.0) as usize,
            end: (comment.span.hi.0 - base.0) as usize,
            kind: match comment.kind {
                comments::CommentKind::Line => CommentKind::Line,
                comments::CommentKind::Block => CommentKind::Block,
            },
        })
        .collect();
    spans.sort_by_key(|span| span.start);
    spans.dedup();
    spans
}
