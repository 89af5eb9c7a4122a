pub mod error;
pub mod config;
pub mod schema_source;
pub mod strict;
pub mod validator;
pub mod fixture;
pub mod runner;
pub mod report;
pub mod single;

pub use error::{ConformError, Result};
pub use config::{Config, Draft, FixtureSetConfig, ValidatorOptions};
pub use schema_source::{SchemaDocument, SchemaSource};
pub use validator::{CompiledValidator, ValidationOutcome, Violation};
pub use fixture::{enumerate, FixturePath};
pub use runner::{run_conformance, ConformanceRunner, FileResult, OverallResult, SetResult};
pub use report::{render, render_single, Report, ReportFormat};
pub use single::validate_file;
