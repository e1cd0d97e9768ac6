//! Conformance runner.
//!
//! Every `*.json` file under `cases/` (or the directory given as the first
//! argument) holds an array of groups; each group is a schema document plus
//! data samples with the expected outcome:
//!
//! ```json
//! [{ "description": "...", "schema": [...], "tests": [
//!     { "description": "...", "data": {...}, "valid": false, "message": "regex" }
//! ]}]
//! ```
//!
//! `message`, when present, is a regex matched against the error text.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use object_value_schema::loader;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseGroup {
    description: String,
    schema: Value,
    tests: Vec<Case>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Case {
    description: String,
    data: Value,
    valid: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Default)]
struct Tally {
    pass: usize,
    fail: usize,
}

/// Case groups out of an already-parsed document; shape errors name the
/// offending JSON path.
fn case_groups(document: Value) -> Result<Vec<CaseGroup>, String> {
    serde_path_to_error::deserialize(document)
        .map_err(|err| format!("{} (at {})", err.inner(), err.path()))
}

fn case_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = std::fs::read_dir(dir).map_err(|e| format!("cannot list {}: {e}", dir.display()))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn run_case(group: &str, schema: &loader::SchemaDocument, case: &Case) -> Result<(), String> {
    let outcome = schema.validate(&case.data);
    match (case.valid, &outcome) {
        (true, Ok(())) => Ok(()),
        (true, Err(error)) => Err(format!("expected valid, got: {error}")),
        (false, Ok(())) => Err("expected a violation, got none".to_string()),
        (false, Err(error)) => {
            let Some(expected) = case.message.as_deref() else {
                return Ok(());
            };
            let matcher = Regex::new(expected).map_err(|e| format!("[{group}] bad message regex: {e}"))?;
            let text = error.to_string();
            if matcher.is_match(&text) {
                Ok(())
            } else {
                Err(format!("message {text:?} does not match /{expected}/"))
            }
        }
    }
}

fn run_file(path: &Path, tally: &mut Tally) -> Result<(), String> {
    let label = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    let source = std::fs::read_to_string(path).map_err(|e| format!("[{label}] read error: {e}"))?;
    let document: Value = serde_json::from_str(&source).map_err(|e| format!("[{label}] invalid JSON: {e}"))?;
    let groups = case_groups(document).map_err(|e| format!("[{label}] {e}"))?;

    for group in &groups {
        let schema = match loader::from_value(group.schema.clone()) {
            Ok(schema) => schema,
            Err(error) => {
                eprintln!("❌ [{label}] {}: schema does not load: {error}", group.description);
                tally.fail += group.tests.len();
                continue;
            }
        };
        for case in &group.tests {
            match run_case(&group.description, &schema, case) {
                Ok(()) => tally.pass += 1,
                Err(reason) => {
                    eprintln!("❌ [{label}] {} / {}: {reason}", group.description, case.description);
                    tally.fail += 1;
                }
            }
        }
    }
    eprintln!("✅ {label}: {} groups", groups.len());
    Ok(())
}

fn main() -> ExitCode {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("cases"));

    let files = match case_files(&dir) {
        Ok(files) => files,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(2);
        }
    };

    let mut tally = Tally::default();
    for file in &files {
        if let Err(error) = run_file(file, &mut tally) {
            eprintln!("{error}");
            return ExitCode::from(2);
        }
    }

    eprintln!("—— {} passed | {} failed | {} files ——", tally.pass, tally.fail, files.len());
    if tally.fail == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
