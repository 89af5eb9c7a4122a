// conform/src/single.rs

use std::path::Path;

use crate::{
    config::Config,
    error::{ConformError, Result},
    schema_source::{read_json, SchemaSource},
    validator::{CompiledValidator, ValidationOutcome},
};

/// Validate one document. Every failure to get as far as validating is fatal:
/// missing schema or input, malformed JSON in either, or a schema that does
/// not compile.
pub fn validate_file(cfg: &Config, base_dir: &Path, input: &Path) -> Result<ValidationOutcome> {
    let schema_path = cfg.schema_path(base_dir);
    if !schema_path.is_file() {
        return Err(ConformError::NotFound { what: "Schema", path: schema_path });
    }
    if !input.is_file() {
        return Err(ConformError::NotFound { what: "Input JSON", path: input.to_path_buf() });
    }
    let schema = SchemaSource::load(&schema_path)?;
    let data = read_json(input, "Input JSON")?;
    let validator = CompiledValidator::compile(&schema, &cfg.validator_options())?;
    let outcome = validator.check(&data);
    tracing::info!(path = %input.display(), valid = outcome.is_valid, violations = outcome.violations.len(), "validated");
    Ok(outcome)
}
