use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use schema_conformance::{
    enumerate, strict::{self, StrictIssue}, CompiledValidator, Draft, SchemaSource, ValidatorOptions,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xtask", about = "schema-conformance workspace tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Report every strict-mode problem in a schema, then try to compile it
    LintSchema {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Draft::Draft202012)]
        draft: Draft,
        #[arg(long)]
        strict_required: bool,
    },
    /// List the fixtures a glob selects, in run order
    ListFixtures {
        pattern: String,
        #[arg(short = 'C', long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::LintSchema { file, draft, strict_required } => {
            let issues = lint_schema(&file, draft, strict_required)?;
            if !issues.is_empty() {
                eprintln!("Invalid: {}", file.display());
                for i in issues {
                    eprintln!("- {}", i);
                }
                std::process::exit(1);
            }
            println!("OK: {}", file.display());
            Ok(())
        }
        Cmd::ListFixtures { pattern, dir } => {
            for rel in list_fixtures(&dir, &pattern)? {
                println!("{}", rel);
            }
            Ok(())
        }
    }
}

/// Every strict-mode issue in the schema; when there are none the schema is
/// also compiled, so an empty list means it is usable as is.
fn lint_schema(path: &Path, draft: Draft, strict_required: bool) -> Result<Vec<StrictIssue>> {
    let opts = ValidatorOptions { draft, strict_required, ..ValidatorOptions::default() };
    let schema = SchemaSource::load(path)?;
    // list all issues, compile() only reports them joined on one line
    let issues = strict::lint(schema.value(), &opts);
    if issues.is_empty() {
        CompiledValidator::compile(&schema, &opts).with_context(|| "compile schema")?;
    }
    Ok(issues)
}

fn list_fixtures(dir: &Path, pattern: &str) -> Result<Vec<String>> {
    let found = enumerate(dir, pattern).with_context(|| format!("enumerate {}", pattern))?;
    Ok(found.into_iter().map(|f| f.relative).collect())
}
