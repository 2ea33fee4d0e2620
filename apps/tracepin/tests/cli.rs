//! Integration tests for the `tracepin` binary

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PLAIN_CONFIG: &str = r#"[message]
prefix = ""
quote = "'"
include_file_name = false
include_line_number = false
insert_enclosing_class = false
insert_enclosing_function = false
"#;

/// A workspace with a plain-label config and one source file.
fn workspace(file: &str, source: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".tracepin.toml"), PLAIN_CONFIG).unwrap();
    fs::write(dir.path().join(file), source).unwrap();
    dir
}

fn tracepin(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tracepin").unwrap();
    cmd.current_dir(dir).arg("--config-dir").arg(dir);
    cmd
}

#[test]
fn test_insert_prints_the_edited_document() {
    let dir = workspace("greet.js", "function greet(x) {}\n");
    tracepin(dir.path())
        .args(["insert", "greet.js", "--line", "1", "--variable", "x"])
        .assert()
        .success()
        .stdout("function greet(x) {\n  console.log('x:', x);\n}\n");

    // Without --write the file is untouched
    assert_eq!(
        fs::read_to_string(dir.path().join("greet.js")).unwrap(),
        "function greet(x) {}\n"
    );
}

#[test]
fn test_insert_write_edits_in_place() {
    let dir = workspace("app.ts", "const total = price * count;\nsave(total);\n");
    tracepin(dir.path())
        .args(["insert", "app.ts", "--line", "1", "--variable", "total", "--write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("app.ts:2: binaryExpression"));

    assert_eq!(
        fs::read_to_string(dir.path().join("app.ts")).unwrap(),
        "const total = price * count;\nconsole.log('total:', total);\nsave(total);\n"
    );
}

#[test]
fn test_insert_json_report() {
    let dir = workspace("data.ts", "const person = {\n  profile: {\n    fullName: 'Ada',\n  },\n};\n");
    let output = tracepin(dir.path())
        .args(["insert", "data.ts", "--line", "3", "--variable", "fullName", "--json"])
        .assert()
        .success();
    let report: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).unwrap();

    assert_eq!(report["classification"]["logMessageType"], "rawPropertyAccess");
    assert_eq!(
        report["classification"]["metadata"]["deepObjectPath"],
        "person.profile.fullName"
    );
    assert_eq!(report["outcome"]["kind"], "insert");
    assert_eq!(report["outcome"]["line"], 5);
}

#[test]
fn test_classify_defaults_to_primitive_assignment() {
    let dir = workspace("value.js", "const value = 42;\n");
    tracepin(dir.path())
        .args(["classify", "value.js", "--line", "1", "--variable", "value"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"primitiveAssignment\""));
}

#[test]
fn test_extract_prints_the_script_region() {
    let dir = workspace(
        "Counter.vue",
        "<template>\n  <p>{{ n }}</p>\n</template>\n<script>\nexport default { data: () => ({ n: 0 }) };\n</script>\n",
    );
    tracepin(dir.path())
        .args(["extract", "Counter.vue", "--line", "5", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"lineOffset\": 3"));
}

#[test]
fn test_housekeeping_round_trip() {
    let source = "run();\nconsole.log('a:', a);\nconsole.log('ready');\nnext();\n";
    let dir = workspace("main.js", source);

    tracepin(dir.path())
        .args(["comment", "main.js", "--write"])
        .assert()
        .success();
    let commented = fs::read_to_string(dir.path().join("main.js")).unwrap();
    assert_eq!(commented, "run();\n// console.log('a:', a);\nconsole.log('ready');\nnext();\n");

    tracepin(dir.path())
        .args(["list", "main.js"])
        .assert()
        .success()
        .stdout("2: commented\n");

    tracepin(dir.path())
        .args(["uncomment", "main.js"])
        .assert()
        .success()
        .stdout(source);

    tracepin(dir.path())
        .args(["delete", "main.js"])
        .assert()
        .success()
        .stdout("run();\nconsole.log('ready');\nnext();\n");
}

#[test]
fn test_config_prints_effective_values() {
    let dir = workspace("a.js", "");
    tracepin(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("quote = \"'\""))
        .stdout(predicate::str::contains("tab_size = 2"));
}

#[test]
fn test_errors_exit_with_code_one() {
    let dir = workspace("broken.js", "const = ;\n");
    tracepin(dir.path())
        .args(["insert", "broken.js", "--line", "1", "--variable", "a"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error: Parse error at line 1"));

    tracepin(dir.path())
        .args(["insert", "notes.txt", "--line", "1", "--variable", "a"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--kind"));

    tracepin(dir.path())
        .args(["insert", "broken.js", "--line", "0", "--variable", "a"])
        .assert()
        .failure();
}
