// conform/src/schema_source.rs

use serde_json::Value;
use std::{fs, path::{Path, PathBuf}};

use crate::error::{ConformError, Result};

/// A loaded schema. Read-only once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaDocument {
    path: PathBuf,
    value: Value,
}

impl SchemaDocument {
    pub fn new(path: impl Into<PathBuf>, value: Value) -> Self {
        Self { path: path.into(), value }
    }
    pub fn path(&self) -> &Path { &self.path }
    pub fn value(&self) -> &Value { &self.value }
}

pub struct SchemaSource;

impl SchemaSource {
    pub fn load(path: &Path) -> Result<SchemaDocument> {
        let value = read_json(path, "Schema")?;
        tracing::debug!(path = %path.display(), "loaded schema");
        Ok(SchemaDocument::new(path, value))
    }
}

/// Read and parse one JSON file; a missing file is reported as `NotFound`
/// naming `what`.
pub(crate) fn read_json(path: &Path, what: &'static str) -> Result<Value> {
    if !path.is_file() {
        return Err(ConformError::NotFound { what, path: path.to_path_buf() });
    }
    let text = fs::read_to_string(path).map_err(|e| ConformError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| ConformError::Parse { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_schema_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = SchemaSource::load(&dir.path().join("nope.schema.json")).unwrap_err();
        assert!(matches!(err, ConformError::NotFound { what: "Schema", .. }));
    }

    #[test]
    fn malformed_schema_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("schema.json");
        fs::write(&p, "{\"type\": ").unwrap();
        assert!(matches!(SchemaSource::load(&p).unwrap_err(), ConformError::Parse { .. }));
    }

    #[test]
    fn loads_document() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("schema.json");
        fs::write(&p, r#"{"type":"object"}"#).unwrap();
        let doc = SchemaSource::load(&p).unwrap();
        assert_eq!(doc.path(), p.as_path());
        assert_eq!(doc.value()["type"], "object");
    }
}
