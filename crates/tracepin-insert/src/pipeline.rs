//! End-to-end insertion: parse, classify, resolve, build, rewrite

use crate::checkers::CheckContext;
use crate::classifier::ClassificationChain;
use crate::enclosing::enclosing_names;
use crate::message::{DebugMessageBuilder, MessageContext};
use crate::resolver::{resolve_insertion, Resolution};
use crate::transformer::find_site;
use serde::Serialize;
use tracepin_ast::{lines::indentation_of, parse_document, LineIndex, ParsedDocument};
use tracepin_config::{logging::invocation_span, MessageConfig};
use tracepin_foundation::{FileKind, InsertionOutcome, LogMessage, TracepinError, TracepinResult};
use tracing::{debug, info};

/// Everything one insertion needs; no editor or file system involved.
#[derive(Debug, Clone, Copy)]
pub struct InsertionRequest<'a> {
    pub document: &'a str,
    pub file_kind: FileKind,
    /// Zero-based host line of the selection
    pub selection_line: usize,
    pub variable: &'a str,
    /// Shown in the label when file names are enabled
    pub file_name: Option<&'a str>,
    pub tab_size: usize,
    pub message: &'a MessageConfig,
}

/// The outcome together with how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertionReport {
    pub classification: LogMessage,
    pub resolution: Resolution,
    pub outcome: InsertionOutcome,
}

fn validate(document: &str, line: usize, variable: &str) -> TracepinResult<()> {
    if variable.trim().is_empty() {
        return Err(TracepinError::invalid_input("selected variable is empty"));
    }
    let line_count = LineIndex::new(document).line_count();
    if line >= line_count {
        return Err(TracepinError::invalid_input(format!(
            "selection line {} is beyond the document ({line_count} lines)",
            line + 1
        )));
    }
    Ok(())
}

fn parse(document: &str, kind: FileKind, line: usize, variable: &str) -> TracepinResult<ParsedDocument> {
    validate(document, line, variable)?;
    Ok(parse_document(document, kind, line)?)
}

/// Classification of a selection with the default checker order.
pub fn classify_selection(
    document: &str,
    kind: FileKind,
    line: usize,
    variable: &str,
) -> TracepinResult<LogMessage> {
    let parsed = parse(document, kind, line, variable)?;
    Ok(ClassificationChain::default().classify(&CheckContext {
        ast: &parsed.ast,
        document,
        selection_line: line,
        variable: variable.trim(),
    }))
}

/// Runs the whole pipeline and returns the edit to perform.
pub fn insert_debug_log(request: &InsertionRequest<'_>) -> TracepinResult<InsertionOutcome> {
    insert_with_report(request).map(|report| report.outcome)
}

/// [`insert_debug_log`] plus the intermediate classification and
/// resolution.
pub fn insert_with_report(request: &InsertionRequest<'_>) -> TracepinResult<InsertionReport> {
    let span = invocation_span(
        request.file_name.unwrap_or("<buffer>"),
        request.selection_line,
        request.variable,
    );
    let _enter = span.enter();

    let document = request.document;
    let line = request.selection_line;
    let variable = request.variable.trim();
    let parsed = parse(document, request.file_kind, line, variable)?;
    let ast = &parsed.ast;

    let classification = ClassificationChain::default().classify(&CheckContext {
        ast,
        document,
        selection_line: line,
        variable,
    });
    let resolution = resolve_insertion(ast, document, &classification, line, variable);

    let names = enclosing_names(ast, document, line);
    let builder = DebugMessageBuilder::new(request.message);
    let mut context = MessageContext {
        variable: classification.effective_variable(variable),
        file_name: request.file_name,
        line: 0,
        enclosing_class: names.class.as_deref(),
        enclosing_function: names.function.as_deref(),
    };
    let banner_lines = usize::from(request.message.wrap_log_message);

    if resolution.needs_transform {
        if let Some(site) = find_site(ast, document, line, variable) {
            context.line = site.statement_line(document) + banner_lines + 1;
            let statement = builder.build_statement(&context);
            if let Some(plan) = site.render(document, &statement, request.tab_size) {
                info!(
                    log_message_type = %classification.log_message_type,
                    statement_line = plan.statement_line,
                    "Rewrote function body"
                );
                let rewritten = plan.apply(document);
                return Ok(InsertionReport {
                    classification,
                    resolution,
                    outcome: InsertionOutcome::Rewrite {
                        plan,
                        document: rewritten,
                    },
                });
            }
        }
        debug!("No rewrite applies, inserting a line instead");
    }

    let mut indent = indentation_of(document, resolution.anchor_line).to_string();
    if resolution.inside_block {
        indent.push_str(&" ".repeat(request.tab_size));
    }
    context.line = resolution.target_line + builder.lines_before_statement() + 1;
    let text = builder.build_block(&context, &indent);
    info!(
        log_message_type = %classification.log_message_type,
        target_line = resolution.target_line,
        "Inserting debug statement"
    );

    Ok(InsertionReport {
        classification,
        resolution,
        outcome: InsertionOutcome::Insert {
            line: resolution.target_line,
            text,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain_message() -> MessageConfig {
        MessageConfig {
            prefix: String::new(),
            quote: "'".to_string(),
            include_file_name: false,
            include_line_number: false,
            insert_enclosing_class: false,
            insert_enclosing_function: false,
            ..MessageConfig::default()
        }
    }

    fn insert(document: &str, kind: FileKind, line: usize, variable: &str) -> TracepinResult<String> {
        let message = plain_message();
        let request = InsertionRequest {
            document,
            file_kind: kind,
            selection_line: line,
            variable,
            file_name: None,
            tab_size: 2,
            message: &message,
        };
        insert_debug_log(&request).map(|outcome| outcome.apply(document))
    }

    #[test]
    fn test_plain_insertion_keeps_indentation() {
        let document = "function f() {\n  const total = a + b;\n  return total;\n}\n";
        assert_eq!(
            insert(document, FileKind::JavaScript, 1, "total").unwrap(),
            "function f() {\n  const total = a + b;\n  console.log('total:', total);\n  return total;\n}\n"
        );
    }

    #[test]
    fn test_rejects_bad_selections() {
        assert!(matches!(
            insert("const a = 1;", FileKind::JavaScript, 5, "a"),
            Err(TracepinError::InvalidInput { .. })
        ));
        assert!(matches!(
            insert("const a = 1;", FileKind::JavaScript, 0, "  "),
            Err(TracepinError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_parse_errors_abort() {
        assert!(matches!(
            insert("const = ;", FileKind::JavaScript, 0, "a"),
            Err(TracepinError::Parse { .. })
        ));
    }

    #[test]
    fn test_line_number_in_label_points_at_the_statement() {
        let message = MessageConfig {
            include_file_name: true,
            include_line_number: true,
            ..plain_message()
        };
        let document = "const a = 1;\n";
        let request = InsertionRequest {
            document,
            file_kind: FileKind::TypeScript,
            selection_line: 0,
            variable: "a",
            file_name: Some("main.ts"),
            tab_size: 2,
            message: &message,
        };
        let outcome = insert_debug_log(&request).unwrap();
        assert_eq!(
            outcome,
            InsertionOutcome::Insert {
                line: 1,
                text: "console.log('main.ts:2 ~ a:', a);\n".to_string()
            }
        );
    }
}
