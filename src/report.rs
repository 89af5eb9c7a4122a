// conform/src/report.rs

use serde::Serialize;
use std::fmt::Write as _;

use crate::{
    runner::{FileResult, OverallResult, SetResult},
    validator::{ValidationOutcome, ROOT_LOCATION},
};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAIL: u8 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Rendered output plus the process exit code it implies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub text: String,
    pub exit_code: u8,
}

fn exit_code(ok: bool) -> u8 { if ok { EXIT_OK } else { EXIT_FAIL } }

pub fn render(result: &OverallResult, format: ReportFormat) -> Report {
    let text = match format {
        ReportFormat::Text => render_text(result),
        ReportFormat::Json => render_json(result),
    };
    Report { text, exit_code: exit_code(result.success()) }
}

fn render_text(result: &OverallResult) -> String {
    let mut s = String::new();
    for set in &result.sets {
        render_set(&mut s, set);
    }
    if result.success() {
        s.push_str("✅ All tests behaved as expected.\n");
    } else {
        s.push_str("❌ Some tests failed.\n");
    }
    s
}

fn render_set(s: &mut String, set: &SetResult) {
    let _ = writeln!(s, "\n🔹 {} TESTS\n", set.label);
    for f in &set.files {
        render_file(s, f, set.expect_valid);
    }
    let _ = writeln!(s, "\n{}: {}/{} correct\n", set.label, set.passed, set.total);
}

fn render_file(s: &mut String, f: &FileResult, expect_valid: bool) {
    if f.passed {
        let _ = writeln!(s, "  ✔ {}", f.path);
        return;
    }
    let _ = writeln!(s, "  ✖ {}", f.path);
    if !expect_valid && f.outcome.violations.is_empty() {
        let _ = writeln!(s, "    → {} expected violations, document was accepted", ROOT_LOCATION);
    }
    for v in &f.outcome.violations {
        let _ = writeln!(s, "    → {} {}", v.location, v.message);
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    success: bool,
    #[serde(flatten)]
    result: &'a OverallResult,
}

fn render_json(result: &OverallResult) -> String {
    let doc = JsonReport { success: result.success(), result };
    // plain structs of strings/bools/ints; serialization cannot fail
    let mut out = serde_json::to_string_pretty(&doc).unwrap_or_default();
    out.push('\n');
    out
}

/// Verdict for the single-file mode.
pub fn render_single(path: &str, outcome: &ValidationOutcome) -> Report {
    let mut s = String::new();
    if outcome.is_valid {
        let _ = writeln!(s, "✅ Valid: {}", path);
    } else {
        let _ = writeln!(s, "❌ Invalid: {}", path);
        for v in &outcome.violations {
            let _ = writeln!(s, "{} {}", v.location, v.message);
        }
    }
    Report { text: s, exit_code: exit_code(outcome.is_valid) }
}
