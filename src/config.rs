// conform/src/config.rs

use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::error::{ConformError, Result};

/// File looked up under the base directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "conform.toml";
pub const DEFAULT_SCHEMA_FILE: &str = "schema.json";

/// Config is merged: defaults -> config file -> command line (ephemeral)
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub schema: SchemaConfig,
    pub sets: Vec<FixtureSetConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SchemaConfig {
    pub path: Option<PathBuf>,             // relative paths resolve against the base dir
    pub draft: Option<Draft>,
    pub strict: Option<bool>,
    pub strict_required: Option<bool>,
    pub validate_formats: Option<bool>,
}

/// One labeled group of fixtures sharing an expected verdict.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixtureSetConfig {
    pub label: String,
    pub pattern: String,                   // glob relative to the base dir, e.g. "tests/valid/**/*.json"
    pub expect_valid: bool,
}

impl FixtureSetConfig {
    pub fn new(label: impl Into<String>, pattern: impl Into<String>, expect_valid: bool) -> Self {
        Self { label: label.into(), pattern: pattern.into(), expect_valid }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Draft {
    #[serde(rename = "4")]
    #[value(name = "4")]
    Draft4,
    #[serde(rename = "6")]
    #[value(name = "6")]
    Draft6,
    #[serde(rename = "7")]
    #[value(name = "7")]
    Draft7,
    #[serde(rename = "2019-09")]
    #[value(name = "2019-09")]
    Draft201909,
    #[default]
    #[serde(rename = "2020-12")]
    #[value(name = "2020-12")]
    Draft202012,
}

/// Fully resolved knobs handed to [`crate::CompiledValidator::compile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ValidatorOptions {
    pub draft: Draft,
    pub strict: bool,
    pub strict_required: bool,
    pub validate_formats: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self { draft: Draft::default(), strict: true, strict_required: false, validate_formats: true }
    }
}

/// The two conventional sets: everything under `tests/valid` must pass,
/// everything under `tests/invalid` must be rejected.
pub fn default_sets() -> Vec<FixtureSetConfig> {
    vec![
        FixtureSetConfig::new("VALID", "tests/valid/**/*.json", true),
        FixtureSetConfig::new("INVALID", "tests/invalid/**/*.json", false),
    ]
}

pub fn merge(a: &mut Config, b: &Config) {
    fn overlay<T: Clone>(dst: &mut Option<T>, src: &Option<T>) { if src.is_some() { *dst = src.clone(); } }
    overlay(&mut a.schema.path, &b.schema.path);
    overlay(&mut a.schema.draft, &b.schema.draft);
    overlay(&mut a.schema.strict, &b.schema.strict);
    overlay(&mut a.schema.strict_required, &b.schema.strict_required);
    overlay(&mut a.schema.validate_formats, &b.schema.validate_formats);

    if !b.sets.is_empty() { a.sets = b.sets.clone(); }
}

impl Config {
    /// Read a config file. An explicitly named file must exist; the implicit
    /// `conform.toml` under `base_dir` is optional.
    pub fn load(base_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => {
                let p = resolve(base_dir, p);
                if !p.is_file() {
                    return Err(ConformError::NotFound { what: "Config", path: p });
                }
                p
            }
            None => {
                let p = base_dir.join(DEFAULT_CONFIG_FILE);
                if !p.is_file() {
                    tracing::debug!(path = %p.display(), "no config file, using defaults");
                    return Ok(Self::default());
                }
                p
            }
        };
        Self::read_file(&path)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConformError::io(path, e))?;
        let cfg: Config = toml::from_str(&text).map_err(|source| ConformError::Config { path: path.to_path_buf(), source })?;
        tracing::debug!(path = %path.display(), sets = cfg.sets.len(), "loaded config");
        Ok(cfg)
    }

    /// Load from disk and apply the command-line overlay on top.
    pub fn load_with_overlay(base_dir: &Path, explicit: Option<&Path>, overlay: &Config) -> Result<Self> {
        let mut merged = Self::load(base_dir, explicit)?;
        merge(&mut merged, overlay);
        Ok(merged)
    }

    pub fn schema_path(&self, base_dir: &Path) -> PathBuf {
        let p = self.schema.path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_FILE));
        resolve(base_dir, &p)
    }

    pub fn validator_options(&self) -> ValidatorOptions {
        let d = ValidatorOptions::default();
        ValidatorOptions {
            draft: self.schema.draft.unwrap_or(d.draft),
            strict: self.schema.strict.unwrap_or(d.strict),
            strict_required: self.schema.strict_required.unwrap_or(d.strict_required),
            validate_formats: self.schema.validate_formats.unwrap_or(d.validate_formats),
        }
    }

    pub fn fixture_sets(&self) -> Vec<FixtureSetConfig> {
        if self.sets.is_empty() { default_sets() } else { self.sets.clone() }
    }
}

fn resolve(base_dir: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() { p.to_path_buf() } else { base_dir.join(p) }
}
