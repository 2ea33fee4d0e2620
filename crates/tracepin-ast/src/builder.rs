//! Parsing script text into host-positioned [`SourceNode`] trees

use crate::error::{AstError, AstResult};
use crate::extract::{extract_script, ExtractionResult};
use crate::lines::LineIndex;
use crate::lower::Lowerer;
use crate::node::SourceNode;
use crate::normalize::normalize_locations;
use serde::Serialize;
use swc_common::{sync::Lrc, FileName, SourceMap, Spanned};
use swc_ecma_parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use tracepin_foundation::{FileKind, ScriptDialect};
use tracing::debug;

/// A parsed host document: the tree plus the region it came from.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocument {
    pub ast: SourceNode,
    pub extraction: ExtractionResult,
}

/// swc syntax for a script dialect.
fn syntax_for(dialect: ScriptDialect) -> Syntax {
    if dialect.is_typescript() {
        Syntax::Typescript(TsSyntax {
            tsx: dialect.allows_jsx(),
            decorators: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            jsx: dialect.allows_jsx(),
            decorators: true,
            ..Default::default()
        })
    }
}

/// Parses `text` as one module, positions relative to `text`.
///
/// Recoverable diagnostics are treated like fatal ones: a tree is only
/// returned for input swc accepts without complaint.
pub fn parse_script(text: &str, dialect: ScriptDialect) -> AstResult<SourceNode> {
    let cm: Lrc<SourceMap> = Default::default();
    let source_file = cm.new_source_file(Lrc::new(FileName::Anon), text.to_string());
    let base = source_file.start_pos.0;
    let index = LineIndex::new(text);
    let to_error = |err: swc_ecma_parser::error::Error| {
        let offset = (err.span().lo.0.saturating_sub(base) as usize).min(text.len());
        AstError::parse(err.kind().msg().to_string(), Some(index.line_of(offset)))
    };

    let lexer = Lexer::new(
        syntax_for(dialect),
        Default::default(),
        StringInput::from(&*source_file),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser.parse_module().map_err(to_error)?;
    if let Some(err) = parser.take_errors().into_iter().next() {
        return Err(to_error(err));
    }

    let ast = Lowerer::new(text, base).program(&module);
    debug!(
        dialect = ?dialect,
        statements = ast.list("body").len(),
        "Parsed script"
    );
    Ok(ast)
}

/// Parses an extracted region and moves the tree into host coordinates.
pub fn build_ast(extraction: &ExtractionResult) -> AstResult<SourceNode> {
    let mut ast = parse_script(&extraction.script_text, extraction.dialect)
        .map_err(|err| err.offset_line(extraction.line_offset))?;
    if !extraction.is_identity() {
        normalize_locations(&mut ast, extraction.line_offset, extraction.byte_offset);
    }
    Ok(ast)
}

/// Extraction followed by [`build_ast`].
pub fn parse_document(text: &str, kind: FileKind, line: usize) -> AstResult<ParsedDocument> {
    let extraction = extract_script(text, kind, line)?;
    let ast = build_ast(&extraction)?;
    Ok(ParsedDocument { ast, extraction })
}
