// conform/src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use schema_conformance::{
    render, render_single, run_conformance, validate_file, Config, Draft, Report, ReportFormat,
};
use std::{path::{Path, PathBuf}, process::ExitCode};

#[derive(Parser)]
#[command(name = "conform", version, about = "Validate JSON documents and fixture sets against a JSON Schema")]
struct Args {
    #[command(subcommand)]
    cmd: Option<Cmd>,

    /// Base directory; relative schema, input and fixture paths resolve against it
    #[arg(short = 'C', long, global = true, default_value = ".")]
    dir: PathBuf,
    /// Config file (default: <DIR>/conform.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Schema file (overrides the config)
    #[arg(short, long, global = true)]
    schema: Option<PathBuf>,
    /// JSON Schema draft the schema is written against
    #[arg(long, global = true, value_enum)]
    draft: Option<Draft>,
    /// Accept keywords the draft does not define
    #[arg(long, global = true)]
    no_strict: bool,
    /// Require every name in `required` to be declared in `properties`
    #[arg(long, global = true)]
    strict_required: bool,
    /// Do not assert `format`
    #[arg(long, global = true)]
    no_formats: bool,
}

#[derive(Subcommand)]
enum Cmd {
    /// Validate a single JSON file
    Validate { file: PathBuf },
    /// Run the valid/invalid fixture sets (default)
    Run {
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

impl Args {
    fn overlay(&self) -> Config {
        let mut cfg = Config::default();
        cfg.schema.path = self.schema.clone();
        cfg.schema.draft = self.draft;
        if self.no_strict { cfg.schema.strict = Some(false); }
        if self.strict_required { cfg.schema.strict_required = Some(true); }
        if self.no_formats { cfg.schema.validate_formats = Some(false); }
        cfg
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(report) => {
            print!("{}", report.text);
            ExitCode::from(report.exit_code)
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Report> {
    let cfg = Config::load_with_overlay(&args.dir, args.config.as_deref(), &args.overlay())?;
    match &args.cmd {
        Some(Cmd::Validate { file }) => {
            let input = resolve(&args.dir, file);
            let outcome = validate_file(&cfg, &args.dir, &input)?;
            Ok(render_single(&file.display().to_string(), &outcome))
        }
        Some(Cmd::Run { format }) => Ok(render(&run_conformance(&cfg, &args.dir)?, *format)),
        None => Ok(render(&run_conformance(&cfg, &args.dir)?, ReportFormat::Text)),
    }
}

fn resolve(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() { p.to_path_buf() } else { base.join(p) }
}
