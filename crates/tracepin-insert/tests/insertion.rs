//! End-to-end insertion scenarios over whole documents

use pretty_assertions::assert_eq;
use tracepin_config::MessageConfig;
use tracepin_foundation::{FileKind, InsertionOutcome, LogMessageType};
use tracepin_insert::{
    classify_selection, insert_debug_log, insert_with_report, ClassificationChain,
    InsertionRequest,
};

fn bare_message() -> MessageConfig {
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

fn request<'a>(
    document: &'a str,
    kind: FileKind,
    line: usize,
    variable: &'a str,
    message: &'a MessageConfig,
) -> InsertionRequest<'a> {
    InsertionRequest {
        document,
        file_kind: kind,
        selection_line: line,
        variable,
        file_name: Some("app.ts"),
        tab_size: 2,
        message,
    }
}

fn insert(document: &str, kind: FileKind, line: usize, variable: &str) -> String {
    let message = bare_message();
    insert_debug_log(&request(document, kind, line, variable, &message))
        .unwrap()
        .apply(document)
}

#[test]
fn empty_function_body_is_opened() {
    let document = "function greet(x) {}\n";
    let message = bare_message();
    let outcome = insert_debug_log(&request(document, FileKind::JavaScript, 0, "x", &message)).unwrap();

    match &outcome {
        InsertionOutcome::Rewrite { plan, document: rewritten } => {
            assert_eq!(rewritten, "function greet(x) {\n  console.log('x:', x);\n}\n");
            assert_eq!(plan.statement_line, 1);
        }
        other => panic!("expected a rewrite, got {other:?}"),
    }
    assert_eq!(outcome.statement_line(), 1);
}

#[test]
fn plain_literal_falls_back_to_primitive_assignment() {
    let kind = classify_selection("const value = 42;", FileKind::JavaScript, 0, "value").unwrap();
    assert_eq!(kind.log_message_type, LogMessageType::PrimitiveAssignment);
    assert_eq!(kind.metadata, None);

    assert_eq!(
        insert("const value = 42;\n", FileKind::JavaScript, 0, "value"),
        "const value = 42;\nconsole.log('value:', value);\n"
    );
}

#[test]
fn parameter_of_function_with_nested_return_goes_first_in_body() {
    let document = "function outer(data) {\n  function inner(data) {\n    return data;\n  }\n  return inner(data);\n}";
    let message = bare_message();
    let outcome =
        insert_debug_log(&request(document, FileKind::JavaScript, 0, "data", &message)).unwrap();
    assert_eq!(
        outcome,
        InsertionOutcome::Insert {
            line: 1,
            text: "  console.log('data:', data);\n".to_string(),
        }
    );
}

#[test]
fn nested_object_key_logs_its_full_path_below_the_declaration() {
    let document = "const person = {\n  profile: {\n    fullName: 'Ada',\n  },\n};\n";
    let message = bare_message();
    let report =
        insert_with_report(&request(document, FileKind::TypeScript, 2, "fullName", &message)).unwrap();

    assert_eq!(report.classification.log_message_type, LogMessageType::RawPropertyAccess);
    assert_eq!(
        report
            .classification
            .metadata
            .as_ref()
            .and_then(|m| m.deep_object_path.as_deref()),
        Some("person.profile.fullName")
    );
    assert_eq!(
        report.outcome.apply(document),
        "const person = {\n  profile: {\n    fullName: 'Ada',\n  },\n};\nconsole.log('person.profile.fullName:', person.profile.fullName);\n"
    );
}

#[test]
fn expression_arrow_in_class_is_rewritten_with_indentation() {
    let document = "class Cart {\n  total = (items) => items.length;\n}\n";
    assert_eq!(
        insert(document, FileKind::TypeScript, 1, "items"),
        "class Cart {\n  total = (items) => {\n    console.log('items:', items);\n    return items.length;\n  };\n}\n"
    );
}

#[test]
fn label_carries_file_line_class_and_function() {
    let document = "class Cart {\n  add(item) {\n    const count = this.items.push(item);\n    return count;\n  }\n}\n";
    let message = MessageConfig::default();
    let outcome =
        insert_debug_log(&request(document, FileKind::TypeScript, 2, "count", &message)).unwrap();
    assert_eq!(
        outcome,
        InsertionOutcome::Insert {
            line: 3,
            text: "    console.log(\"🚀 ~ app.ts:4 ~ Cart ~ add ~ count:\", count);\n".to_string(),
        }
    );
}

#[test]
fn vue_script_block_positions_map_to_the_host_document() {
    let document = "<template>\n  <p>{{ total }}</p>\n</template>\n<script setup lang=\"ts\">\nconst total = price * count;\n</script>\n";
    assert_eq!(
        insert(document, FileKind::Vue, 4, "total"),
        "<template>\n  <p>{{ total }}</p>\n</template>\n<script setup lang=\"ts\">\nconst total = price * count;\nconsole.log('total:', total);\n</script>\n"
    );
}

#[test]
fn wrapped_message_is_framed_by_banners() {
    let message = MessageConfig {
        wrap_log_message: true,
        ..bare_message()
    };
    let document = "const ids = users.map((u) => u.id);\n";
    let outcome =
        insert_debug_log(&request(document, FileKind::JavaScript, 0, "ids", &message)).unwrap();
    assert_eq!(
        outcome.apply(document),
        "const ids = users.map((u) => u.id);\nconsole.log('----');\nconsole.log('ids:', ids);\nconsole.log('----');\n"
    );
}

#[test]
fn repeated_runs_produce_identical_outcomes() {
    let document = "export const view = (props) => (\n  <div>{props.title}</div>\n);\n";
    let message = bare_message();
    let first = insert_debug_log(&request(document, FileKind::Tsx, 0, "props", &message)).unwrap();
    let second = insert_debug_log(&request(document, FileKind::Tsx, 0, "props", &message)).unwrap();
    assert_eq!(first, second);
    assert!(matches!(first, InsertionOutcome::Rewrite { .. }));
}

#[test]
fn default_chain_order_is_stable() {
    let order = ClassificationChain::default().order();
    assert_eq!(order.len(), LogMessageType::ALL.len());
    assert_eq!(order.first(), Some(&LogMessageType::ArrayAssignment));
    assert_eq!(order.last(), Some(&LogMessageType::PrimitiveAssignment));
    assert_eq!(ClassificationChain::default().order(), order);
}
