// conform/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Every way a conformance run or a single validation can fail fatally.
///
/// Per-fixture parse failures are not represented here; the runner turns them
/// into failing [`crate::ValidationOutcome`]s instead.
#[derive(Debug, Error)]
pub enum ConformError {
    #[error("{what} not found: {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    #[error("Parse error: {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Compile error: {}: {message}", path.display())]
    Schema { path: PathBuf, message: String },

    #[error("I/O error: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob {pattern:?}: {message}")]
    Glob { pattern: String, message: String },

    #[error("Config error: {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConformError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T, E = ConformError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_missing_thing() {
        let e = ConformError::NotFound { what: "Schema", path: PathBuf::from("a/schema.json") };
        assert_eq!(e.to_string(), "Schema not found: a/schema.json");
    }

    #[test]
    fn schema_error_carries_compile_message() {
        let e = ConformError::Schema { path: "s.json".into(), message: "unknown keyword \"foo\"".into() };
        assert!(e.to_string().starts_with("Compile error: s.json:"));
    }
}
