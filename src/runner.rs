// conform/src/runner.rs

use serde::Serialize;
use serde_json::Value;
use std::{fs, path::{Path, PathBuf}};
use tracing::{debug, info, info_span, warn};

use crate::{
    config::{Config, FixtureSetConfig},
    error::Result,
    fixture::{self, FixturePath},
    schema_source::SchemaSource,
    validator::{CompiledValidator, ValidationOutcome, Violation},
};

/// Verdict for one fixture file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileResult {
    pub path: String,
    pub passed: bool,
    pub outcome: ValidationOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetResult {
    pub label: String,
    pub expect_valid: bool,
    pub total: usize,
    pub passed: usize,
    /// Every visited file, in enumeration order.
    pub files: Vec<FileResult>,
}

impl SetResult {
    fn new(set: &FixtureSetConfig) -> Self {
        Self { label: set.label.clone(), expect_valid: set.expect_valid, total: 0, passed: 0, files: vec![] }
    }

    /// A set passes when every member matched its expectation; 0/0 passes.
    pub fn success(&self) -> bool { self.passed == self.total }

    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.files.iter().filter(|f| !f.passed)
    }

    fn record(&mut self, path: String, outcome: ValidationOutcome) {
        let passed = outcome.is_valid == self.expect_valid;
        self.total += 1;
        if passed { self.passed += 1; }
        self.files.push(FileResult { path, passed, outcome });
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OverallResult {
    pub sets: Vec<SetResult>,
}

impl OverallResult {
    pub fn success(&self) -> bool { self.sets.iter().all(SetResult::success) }
}

/// Runs labeled fixture sets through one compiled validator.
pub struct ConformanceRunner<'a> {
    validator: &'a CompiledValidator,
    base_dir: PathBuf,
}

impl<'a> ConformanceRunner<'a> {
    pub fn new(validator: &'a CompiledValidator, base_dir: impl Into<PathBuf>) -> Self {
        Self { validator, base_dir: base_dir.into() }
    }

    /// Evaluate every set in order. Enumeration errors abort the run; a fixture
    /// that cannot be read or parsed is recorded as an invalid document.
    pub fn run(&self, sets: &[FixtureSetConfig]) -> Result<OverallResult> {
        let mut overall = OverallResult::default();
        for set in sets {
            overall.sets.push(self.run_set(set)?);
        }
        info!(sets = overall.sets.len(), success = overall.success(), "conformance run finished");
        Ok(overall)
    }

    fn run_set(&self, set: &FixtureSetConfig) -> Result<SetResult> {
        let _span = info_span!("fixture_set", label = %set.label).entered();
        let files = fixture::enumerate(&self.base_dir, &set.pattern)?;
        let mut result = SetResult::new(set);
        for f in files {
            let outcome = self.evaluate(&f);
            debug!(path = %f.relative, valid = outcome.is_valid, "checked fixture");
            result.record(f.relative, outcome);
        }
        info!(passed = result.passed, total = result.total, "set finished");
        Ok(result)
    }

    fn evaluate(&self, f: &FixturePath) -> ValidationOutcome {
        match load_fixture(&f.absolute) {
            Ok(doc) => self.validator.check(&doc),
            Err(message) => {
                warn!(path = %f.relative, error = %message, "fixture not loadable");
                ValidationOutcome::invalid(vec![Violation::at_root(message)])
            }
        }
    }
}

fn load_fixture(path: &Path) -> std::result::Result<Value, String> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        // not UTF-8: the file is there, its content just is not JSON text
        std::io::ErrorKind::InvalidData => format!("parse error: {}", e),
        _ => format!("read error: {}", e),
    })?;
    serde_json::from_str(&text).map_err(|e| format!("parse error: {}", e))
}

/// Load the configured schema, compile it once and run all configured sets.
pub fn run_conformance(cfg: &Config, base_dir: &Path) -> Result<OverallResult> {
    let schema = SchemaSource::load(&cfg.schema_path(base_dir))?;
    let validator = CompiledValidator::compile(&schema, &cfg.validator_options())?;
    ConformanceRunner::new(&validator, base_dir).run(&cfg.fixture_sets())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ValidatorOptions, schema_source::SchemaDocument, validator::ROOT_LOCATION};
    use serde_json::json;

    fn validator() -> CompiledValidator {
        let schema = SchemaDocument::new("s.json", json!({
            "type": "object",
            "required": ["intent"],
            "properties": {"intent": {"type": "string"}}
        }));
        CompiledValidator::compile(&schema, &ValidatorOptions::default()).unwrap()
    }

    fn write(root: &Path, rel: &str, body: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, body).unwrap();
    }

    #[test]
    fn polarity_decides_pass() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "tests/valid/ok.json", r#"{"intent":"greet"}"#);
        write(dir.path(), "tests/valid/wrong.json", r#"{"intent":42}"#);
        write(dir.path(), "tests/invalid/empty.json", "{}");
        write(dir.path(), "tests/invalid/sneaky.json", r#"{"intent":"ok"}"#);

        let v = validator();
        let res = ConformanceRunner::new(&v, dir.path()).run(&crate::config::default_sets()).unwrap();

        let valid = &res.sets[0];
        assert_eq!((valid.passed, valid.total), (1, 2));
        assert_eq!(valid.failures().map(|f| f.path.as_str()).collect::<Vec<_>>(), vec!["tests/valid/wrong.json"]);

        let invalid = &res.sets[1];
        assert_eq!((invalid.passed, invalid.total), (1, 2));
        let sneaky = invalid.failures().next().unwrap();
        assert_eq!(sneaky.path, "tests/invalid/sneaky.json");
        assert!(sneaky.outcome.is_valid);
        assert!(!res.success());
    }

    #[test]
    fn malformed_fixture_is_an_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "tests/valid/broken.json", "{\"intent\": ");
        write(dir.path(), "tests/invalid/broken.json", "not json");

        let v = validator();
        let res = ConformanceRunner::new(&v, dir.path()).run(&crate::config::default_sets()).unwrap();
        let bad = &res.sets[0].files[0];
        assert!(!bad.passed);
        assert_eq!(bad.outcome.violations[0].location, ROOT_LOCATION);
        assert!(bad.outcome.violations[0].message.starts_with("parse error:"));
        assert!(res.sets[1].success());
    }

    #[test]
    fn non_utf8_fixture_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tests/valid")).unwrap();
        fs::write(dir.path().join("tests/valid/latin1.json"), b"{\"intent\": \"caf\xe9\"}").unwrap();
        write(dir.path(), "tests/invalid/empty.json", "{}");

        let v = validator();
        let res = ConformanceRunner::new(&v, dir.path()).run(&crate::config::default_sets()).unwrap();
        let bad = &res.sets[0].files[0];
        assert!(!bad.passed);
        assert_eq!(bad.outcome.violations[0].location, ROOT_LOCATION);
        assert!(bad.outcome.violations[0].message.starts_with("parse error:"), "{}", bad.outcome.violations[0].message);
    }

    #[test]
    fn empty_sets_pass() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tests/valid")).unwrap();
        fs::create_dir_all(dir.path().join("tests/invalid")).unwrap();
        let v = validator();
        let res = ConformanceRunner::new(&v, dir.path()).run(&crate::config::default_sets()).unwrap();
        assert!(res.sets.iter().all(|s| s.total == 0 && s.passed == 0));
        assert!(res.success());
    }

    #[test]
    fn missing_fixture_dir_aborts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tests/valid")).unwrap();
        let v = validator();
        assert!(ConformanceRunner::new(&v, dir.path()).run(&crate::config::default_sets()).is_err());
    }

    #[test]
    fn missing_schema_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_conformance(&Config::default(), dir.path()).unwrap_err();
        assert!(matches!(err, crate::ConformError::NotFound { what: "Schema", .. }));
    }
}
