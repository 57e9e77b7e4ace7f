//! Syntax-tree capability and the swc-backed TypeScript implementation.

use crate::comments::{collect_spans, CommentSpan};
use crate::error::{AstError, AstResult};
use std::path::PathBuf;
use swc_common::comments::SingleThreadedComments;
use swc_common::{sync::Lrc, BytePos, FileName, FilePathMapping, SourceMap, Span};
use swc_ecma_ast::{Ident, IdentName, Module};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

/// A plain identifier reference located in the source.
///
/// `start..end` are byte offsets into the text that was parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierNode<'a> {
    pub name: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Narrow syntax-tree capability needed by the identifier and comment passes.
///
/// Only identifier nodes and comment spans are exposed. String and template
/// literal contents and comments are never reported as identifiers.
pub trait SyntaxProvider {
    type Tree;

    /// Parse `source`; `file_path` selects dialect details (e.g. JSX for `.tsx`).
    fn parse(&self, file_path: &str, source: &str) -> AstResult<Self::Tree>;

    /// Call `visitor` for every identifier node of `tree`, in source order.
    fn visit_identifiers(&self, tree: &Self::Tree, visitor: &mut dyn FnMut(IdentifierNode<'_>));

    /// Every comment of the parsed source, ordered by start offset.
    fn comment_spans(&self, tree: &Self::Tree) -> Vec<CommentSpan>;
}

/// A parsed TypeScript module, the offset of its first byte and its comments.
pub struct ParsedModule {
    module: Module,
    start_pos: BytePos,
    comments: Vec<CommentSpan>,
}

/// TypeScript/TSX syntax provider built on swc.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptSyntax;

impl TypeScriptSyntax {
    pub fn new() -> Self {
        Self
    }

    fn syntax_for(file_path: &str) -> Syntax {
        let lower = file_path.to_ascii_lowercase();
        Syntax::Typescript(TsSyntax {
            tsx: lower.ends_with(".tsx"),
            decorators: true,
            dts: lower.ends_with(".d.ts"),
            no_early_errors: true,
            ..Default::default()
        })
    }
}

impl SyntaxProvider for TypeScriptSyntax {
    type Tree = ParsedModule;

    fn parse(&self, file_path: &str, source: &str) -> AstResult<ParsedModule> {
        let cm = Lrc::new(SourceMap::new(FilePathMapping::empty()));
        let file_name = Lrc::new(FileName::Real(PathBuf::from(file_path)));
        let source_file = cm.new_source_file(file_name, source.to_string());
        let collected = SingleThreadedComments::default();
        let lexer = Lexer::new(
            Self::syntax_for(file_path),
            Default::default(),
            StringInput::from(&*source_file),
            Some(&collected),
        );
        let mut parser = Parser::new_from(lexer);
        let module = parser
            .parse_module()
            .map_err(|e| AstError::parse(file_path, format!("{:?}", e.kind())))?;

        let recovered = parser.take_errors();
        if !recovered.is_empty() {
            tracing::debug!(
                file_path = %file_path,
                recovered_errors = recovered.len(),
                "Parsed module with recoverable syntax errors"
            );
        }

        Ok(ParsedModule {
            module,
            start_pos: source_file.start_pos,
            comments: collect_spans(&collected, source_file.start_pos),
        })
    }

    fn visit_identifiers(&self, tree: &ParsedModule, visitor: &mut dyn FnMut(IdentifierNode<'_>)) {
        let mut collector = IdentifierVisitor {
            base: tree.start_pos,
            visitor,
        };
        tree.module.visit_with(&mut collector);
    }

    fn comment_spans(&self, tree: &ParsedModule) -> Vec<CommentSpan> {
        tree.comments.clone()
    }
}

/// Reports `Ident` (bindings and references) and `IdentName` (property
/// names, member properties, JSX attribute names) nodes.
struct IdentifierVisitor<'v> {
    base: BytePos,
    visitor: &'v mut dyn FnMut(IdentifierNode<'_>),
}

impl IdentifierVisitor<'_> {
    fn report(&mut self, name: &str, span: Span) {
        if span.is_dummy() || span.lo < self.base {
            return;
        }
        let start = (span.lo.0 - self.base.0) as usize;
        let end = (span.hi.0 - self.base.0) as usize;
        (self.visitor)(IdentifierNode { name, start, end });
    }
}

impl Visit for IdentifierVisitor<'_> {
    fn visit_ident(&mut self, node: &Ident) {
        self.report(node.sym.as_ref(), node.span);
    }

    fn visit_ident_name(&mut self, node: &IdentName) {
        self.report(node.sym.as_ref(), node.span);
    }
}
