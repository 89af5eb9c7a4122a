// conform/src/validator.rs

use serde::Serialize;
use serde_json::Value;

use crate::{
    config::{Draft, ValidatorOptions},
    error::{ConformError, Result},
    schema_source::SchemaDocument,
    strict,
};

/// Location shown for violations that concern the whole document.
pub const ROOT_LOCATION: &str = "(root)";

/// One way a document failed the schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub location: String,
    pub message: String,
}

impl Violation {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self { location: location.into(), message: message.into() }
    }
    pub fn at_root(message: impl Into<String>) -> Self { Self::new(ROOT_LOCATION, message) }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationOutcome {
    pub fn valid() -> Self { Self { is_valid: true, violations: vec![] } }
    pub fn invalid(violations: Vec<Violation>) -> Self { Self { is_valid: false, violations } }
}

impl From<Draft> for jsonschema::Draft {
    fn from(d: Draft) -> Self {
        match d {
            Draft::Draft4 => jsonschema::Draft::Draft4,
            Draft::Draft6 => jsonschema::Draft::Draft6,
            Draft::Draft7 => jsonschema::Draft::Draft7,
            Draft::Draft201909 => jsonschema::Draft::Draft201909,
            Draft::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

/// A schema compiled once and reused for every document of a run.
pub struct CompiledValidator {
    inner: jsonschema::Validator,
}

impl CompiledValidator {
    pub fn compile(schema: &SchemaDocument, options: &ValidatorOptions) -> Result<Self> {
        let issues = strict::lint(schema.value(), options);
        if !issues.is_empty() {
            let message = issues.iter().map(|i| i.to_string()).collect::<Vec<_>>().join("; ");
            return Err(ConformError::Schema { path: schema.path().to_path_buf(), message });
        }
        let inner = jsonschema::options()
            .with_draft(options.draft.into())
            .should_validate_formats(options.validate_formats)
            // strict mode: a misspelled format name is a schema error, not a no-op
            .should_ignore_unknown_formats(!options.strict)
            .build(schema.value())
            .map_err(|e| ConformError::Schema { path: schema.path().to_path_buf(), message: e.to_string() })?;
        tracing::debug!(path = %schema.path().display(), ?options, "compiled schema");
        Ok(Self { inner })
    }

    /// Collect every violation, in the order the library reports them.
    pub fn check(&self, document: &Value) -> ValidationOutcome {
        let violations: Vec<Violation> = self
            .inner
            .iter_errors(document)
            .map(|e| {
                let pointer = e.instance_path().to_string();
                let location = if pointer.is_empty() { ROOT_LOCATION.to_string() } else { pointer };
                Violation { location, message: e.to_string() }
            })
            .collect();
        if violations.is_empty() { ValidationOutcome::valid() } else { ValidationOutcome::invalid(violations) }
    }
}
