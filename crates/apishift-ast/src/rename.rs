//! Identifier and comment passes: turn identifier replacements into edits.

use crate::comments::CommentSpan;
use crate::error::AstResult;
use crate::parser::SyntaxProvider;
use apishift_foundation::{CompiledReplacement, Edit};
use std::borrow::Cow;
use std::collections::HashMap;

/// Locate every identifier node of `tree` renamed by `replacements`.
///
/// Replacements without identifier syntax are ignored. Each batch entry
/// must have a distinct `from`; when two share one, the first wins.
pub fn plan_identifier_edits<P: SyntaxProvider>(
    provider: &P,
    tree: &P::Tree,
    source: &str,
    replacements: &[&CompiledReplacement],
) -> Vec<Edit> {
    let mut renames: HashMap<&str, &str> = HashMap::new();
    for rep in replacements {
        if let Some(from) = rep.identifier() {
            renames.entry(from).or_insert(rep.to());
        }
    }
    if renames.is_empty() {
        return Vec::new();
    }

    let mut edits = Vec::new();
    provider.visit_identifiers(tree, &mut |node| {
        let Some(&to) = renames.get(node.name) else {
            return;
        };
        let end = node.start + node.name.len();
        // unicode-escaped identifiers resolve to the name but spell it differently
        if source.get(node.start..end) == Some(node.name) {
            edits.push(Edit::identifier(node.start, end, to));
        }
    });
    edits
}

/// Rewrite comments mentioning any renamed identifier.
///
/// One edit per affected comment, covering the whole comment with every
/// identifier replacement applied in order.
pub fn plan_comment_edits(
    source: &str,
    comments: &[CommentSpan],
    replacements: &[&CompiledReplacement],
) -> Vec<Edit> {
    let identifiers: Vec<&CompiledReplacement> = replacements
        .iter()
        .copied()
        .filter(|rep| rep.identifier().is_some())
        .collect();
    if identifiers.is_empty() {
        return Vec::new();
    }

    comments
        .iter()
        .filter_map(|span| {
            let original = span.text(source);
            let rewritten = identifiers
                .iter()
                .fold(Cow::Borrowed(original), |text, rep| {
                    let changed = match rep.replace_words(&text) {
                        Cow::Owned(changed) => Some(changed),
                        Cow::Borrowed(_) => None,
                    };
                    changed.map_or(text, Cow::Owned)
                });
            match rewritten {
                Cow::Owned(text) if text != original => {
                    Some(Edit::comment(span.start, span.end, text))
                }
                _ => None,
            }
        })
        .collect()
}

/// Parse once and pool identifier and comment edits for that snapshot.
///
/// Nothing is parsed when no replacement has identifier syntax.
pub fn plan_rename_edits<P: SyntaxProvider>(
    provider: &P,
    file_path: &str,
    source: &str,
    replacements: &[&CompiledReplacement],
) -> AstResult<Vec<Edit>> {
    if replacements.iter().all(|rep| rep.identifier().is_none()) {
        return Ok(Vec::new());
    }

    let tree = provider.parse(file_path, source)?;
    let mut edits = plan_identifier_edits(provider, &tree, source, replacements);
    let identifier_edits = edits.len();
    edits.extend(plan_comment_edits(
        source,
        &provider.comment_spans(&tree),
        replacements,
    ));

    tracing::debug!(
        file_path = %file_path,
        identifier_edits,
        comment_edits = edits.len() - identifier_edits,
        "Planned rename edits"
    );

    Ok(edits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::CommentKind;
    use crate::error::AstError;
    use crate::parser::IdentifierNode;
    use apishift_foundation::{EditOrigin, Replacement};
    use pretty_assertions::assert_eq;

    /// Treats every maximal `[A-Za-z_$][A-Za-z0-9_$]*` run outside quotes and
    /// comments as an identifier. Fails on sources containing `#!error`.
    struct WordSyntax;

    struct Words {
        words: Vec<(String, usize)>,
        comments: Vec<CommentSpan>,
    }

    impl SyntaxProvider for WordSyntax {
        type Tree = Words;

        fn parse(&self, file_path: &str, source: &str) -> AstResult<Words> {
            if source.contains("#!error") {
                return Err(AstError::parse(file_path, "forced failure"));
            }
            let mut words = Vec::new();
            let mut comments = Vec::new();
            let mut quote: Option<char> = None;
            let mut current: Option<(usize, String)> = None;
            let mut skip_to = 0;
            for (idx, ch) in source.char_indices() {
                if idx < skip_to {
                    continue;
                }
                if let Some(q) = quote {
                    if ch == q {
                        quote = None;
                    }
                    continue;
                }
                let word_char = ch.is_ascii_alphanumeric() || ch == '_' || ch == '$';
                if word_char {
                    current.get_or_insert_with(|| (idx, String::new())).1.push(ch);
                    continue;
                }
                if let Some((start, word)) = current.take() {
                    words.push((word, start));
                }
                let rest = &source[idx..];
                let comment = if rest.starts_with("//") {
                    Some((rest.find('\n').unwrap_or(rest.len()), CommentKind::Line))
                } else if rest.starts_with("/*") {
                    Some((rest.find("*/").map_or(rest.len(), |end| end + 2), CommentKind::Block))
                } else {
                    None
                };
                if let Some((len, kind)) = comment {
                    comments.push(CommentSpan {
                        start: idx,
                        end: idx + len,
                        kind,
                    });
                    skip_to = idx + len;
                } else if matches!(ch, '\'' | '"' | '`') {
                    quote = Some(ch);
                }
            }
            if let Some((start, word)) = current {
                words.push((word, start));
            }
            Ok(Words { words, comments })
        }

        fn visit_identifiers(&self, tree: &Words, visitor: &mut dyn FnMut(IdentifierNode<'_>)) {
            for (name, start) in &tree.words {
                visitor(IdentifierNode {
                    name,
                    start: *start,
                    end: start + name.len(),
                });
            }
        }

        fn comment_spans(&self, tree: &Words) -> Vec<CommentSpan> {
            tree.comments.clone()
        }
    }

    fn compile(pairs: &[(&str, &str)]) -> Vec<CompiledReplacement> {
        pairs
            .iter()
            .map(|(from, to)| Replacement::new(*from, *to).compile().unwrap())
            .collect()
    }

    fn identifier_edits(source: &str, reps: &[CompiledReplacement]) -> Vec<Edit> {
        let refs: Vec<_> = reps.iter().collect();
        let tree = WordSyntax.parse("a.ts", source).unwrap();
        plan_identifier_edits(&WordSyntax, &tree, source, &refs)
    }

    fn comment_edits(source: &str, reps: &[CompiledReplacement]) -> Vec<Edit> {
        let refs: Vec<_> = reps.iter().collect();
        let tree = WordSyntax.parse("a.ts", source).unwrap();
        plan_comment_edits(source, &WordSyntax.comment_spans(&tree), &refs)
    }

    #[test]
    fn test_identifier_edits_skip_string_contents() {
        let reps = compile(&[("oldInput", "newInput")]);

        let edits = identifier_edits("let oldInput = 'oldInput';", &reps);

        assert_eq!(edits, vec![Edit::identifier(4, 12, "newInput")]);
    }

    #[test]
    fn test_non_identifier_replacements_do_not_parse() {
        let reps = compile(&[("old-name", "new-name")]);
        let refs: Vec<_> = reps.iter().collect();

        let edits = plan_rename_edits(&WordSyntax, "a.ts", "#!error", &refs).unwrap();

        assert!(edits.is_empty());
    }

    #[test]
    fn test_parse_failure_propagates() {
        let reps = compile(&[("oldName", "newName")]);
        let refs: Vec<_> = reps.iter().collect();

        let result = plan_rename_edits(&WordSyntax, "a.ts", "#!error oldName", &refs);

        assert!(matches!(result, Err(AstError::Parse { .. })));
    }

    #[test]
    fn test_comment_edit_covers_whole_comment() {
        let reps = compile(&[("oldName", "newName"), ("OldType", "NewType")]);

        let edits = comment_edits("x; // uses oldName and OldType\n/* unrelated */", &reps);

        assert_eq!(
            edits,
            vec![Edit::comment(3, 30, "// uses newName and NewType")]
        );
    }

    #[test]
    fn test_comment_pass_is_word_bounded() {
        let reps = compile(&[("old", "new")]);

        assert!(comment_edits("// golden oldest", &reps).is_empty());
    }

    #[test]
    fn test_comment_pass_renames_dollar_identifiers() {
        let reps = compile(&[("$oldSvc", "$newSvc")]);
        let source = "// inject $oldSvc here\nconst $oldSvc = 1;";

        let edits = comment_edits(source, &reps);

        assert_eq!(edits, vec![Edit::comment(0, 22, "// inject $newSvc here")]);
    }

    #[test]
    fn test_rename_pools_both_passes() {
        let reps = compile(&[("oldName", "newName")]);
        let refs: Vec<_> = reps.iter().collect();
        let source = "const s = \"oldName\";\n/** oldName docs */\nexport const oldName = 1;";

        let edits = plan_rename_edits(&WordSyntax, "a.ts", source, &refs).unwrap();

        let origins: Vec<EditOrigin> = edits.iter().map(|e| e.origin).collect();
        assert_eq!(origins, vec![EditOrigin::Identifier, EditOrigin::Comment]);
        assert!(edits.iter().all(|e| e.start > 10));
    }
}
