use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const USER_SCHEMA: &str = r#"[
    { "name": "id", "type": "integer", "optional": false },
    { "name": "user", "type": "object", "childSchemas": [
        { "name": "email", "type": "string", "format": "email" },
        { "name": "born", "type": "string", "format": "date", "nullable": true }
    ]}
]"#;

fn ovs() -> Command {
    Command::cargo_bin("ovs").unwrap()
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("schema.json"), USER_SCHEMA).unwrap();
    dir
}

#[test]
fn check_passes_valid_documents() {
    let dir = workspace();
    let inputs = dir.path().join("inputs");
    fs::create_dir(&inputs).unwrap();
    fs::write(inputs.join("a.json"), r#"{ "id": 1, "user": { "email": "a@example.com", "born": null } }"#).unwrap();
    fs::write(inputs.join("b.json"), r#"{ "id": 2 }"#).unwrap();

    ovs()
        .arg("check")
        .arg("--schema")
        .arg(dir.path().join("schema.json"))
        .arg("--input")
        .arg(format!("{}/*.json", inputs.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("a.json"))
        .stdout(predicate::str::contains("b.json"))
        .stderr(predicate::str::contains("2 checked, 0 failed"));
}

#[test]
fn check_reports_first_violation_and_exits_one() {
    let dir = workspace();
    let input = dir.path().join("bad.json");
    fs::write(&input, r#"{ "id": 1, "user": { "email": "foo" } }"#).unwrap();

    ovs()
        .args(["check", "--quiet", "--schema"])
        .arg(dir.path().join("schema.json"))
        .arg("--input")
        .arg(&input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("argument user.email invalid: valid email expected, given foo"))
        .stderr(predicate::str::contains("1 checked, 1 failed"));
}

#[test]
fn check_ndjson_with_pointer() {
    let dir = workspace();
    let input = dir.path().join("events.ndjson");
    fs::write(
        &input,
        "{\"payload\": {\"id\": 1}}\n\n{\"payload\": {\"id\": 2, \"extra\": true}}\n",
    )
    .unwrap();

    ovs()
        .args(["check", "--ndjson", "--json-pointer", "/payload", "--schema"])
        .arg(dir.path().join("schema.json"))
        .arg("--input")
        .arg(&input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("events.ndjson:1"))
        .stdout(predicate::str::contains("events.ndjson:3: argument (extra) not allowed"));
}

#[test]
fn missing_schema_file_exits_two() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("a.json");
    fs::write(&input, "{}").unwrap();

    ovs()
        .args(["check", "--schema", "/no/such/schema.json", "--input"])
        .arg(&input)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to load schema"));
}

#[test]
fn show_prints_normalized_schema() {
    let dir = workspace();
    ovs()
        .arg("show")
        .arg("--schema")
        .arg(dir.path().join("schema.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"childSchemas\""))
        .stdout(predicate::str::contains("\"format\": \"date\""));
}
