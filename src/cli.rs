//! Minimal CLI: check documents against a schema file, or show the parsed schema.
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use object_value_schema::loader::{self, SchemaDocument};
use object_value_schema::ValidationError;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON/NDJSON documents against an object value schema
#[derive(Parser, Debug)]
#[command(name = "ovs", version, about)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate every input document and report the first violation of each
    Check(CheckArgs),
    /// parse a schema file and print it back as normalized JSON
    Show(ShowArgs),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckArgs {
    /// schema file: one node object or an array of sibling nodes
    #[arg(long, short)]
    schema: PathBuf,

    #[command(flatten)]
    input_settings: InputSettings,

    /// only print failures
    #[arg(long, short)]
    quiet: bool,
}

#[derive(clap::Parser, Debug)]
struct ShowArgs {
    /// schema file to parse
    #[arg(long, short)]
    schema: PathBuf,
}

/// One input document, labelled for reporting.
#[derive(Debug)]
struct Document {
    label: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut documents = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            if self.ndjson {
                for (index, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let label = format!("{source_path_str}:{}", index + 1);
                    let value = serde_json::from_str::<Value>(line)
                        .with_context(|| format!("failed to parse JSON line ({label})"))?;
                    documents.push(self.select(label, value)?);
                }
            } else {
                let value = serde_json::from_str::<Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                documents.push(self.select(source_path_str, value)?);
            }
        }
        tracing::debug!(count = documents.len(), "loaded input documents");
        Ok(documents)
    }

    fn select(&self, label: String, value: Value) -> Result<Document> {
        let Some(pointer) = self.json_pointer.as_deref() else {
            return Ok(Document { label, value });
        };
        match value.pointer(pointer) {
            Some(selected) => Ok(Document { label, value: selected.clone() }),
            None => bail!("JSON pointer {pointer} selects nothing in {label}"),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Check(target) => {
                let schema = loader::from_path(&target.schema)
                    .with_context(|| format!("failed to load schema ({})", target.schema.display()))?;
                let documents = target.input_settings.load()?;

                // schema trees are read-only, so documents can be checked in parallel
                let outcomes: Vec<(&Document, Result<(), ValidationError>)> = documents
                    .par_iter()
                    .map(|document| (document, schema.validate(&document.value)))
                    .collect();

                let mut failed = 0usize;
                for (document, outcome) in &outcomes {
                    match outcome {
                        Ok(()) if !target.quiet => println!("{} {}", "ok".green(), document.label),
                        Ok(()) => {}
                        Err(error) => {
                            failed += 1;
                            report_failure(&document.label, error);
                        }
                    }
                }
                eprintln!("{} checked, {} failed", outcomes.len(), failed);
                Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::from(1) })
            }
            Command::Show(target) => {
                let schema: SchemaDocument = loader::from_path(&target.schema)
                    .with_context(|| format!("failed to load schema ({})", target.schema.display()))?;
                println!("{}", serde_json::to_string_pretty(&schema)?);
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn report_failure(label: &str, error: &ValidationError) {
    let tag = if error.is_structural() { "SCHEMA" } else { "FAIL" };
    println!("{} {label}: {error}", tag.red().bold());
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
