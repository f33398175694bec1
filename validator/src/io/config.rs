//! Validator configuration (TOML).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Validator configuration.
///
/// Intended to be edited by humans. Missing fields default to running every
/// rule and every set-level check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Bucket key for findings not tied to one record handle.
    pub global_key: String,

    /// Catalog rule ids to skip.
    pub disabled_rules: Vec<String>,

    pub checks: ChecksConfig,
}

/// Toggles for the whole-set validators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChecksConfig {
    pub records_presence: bool,
    pub memory_topology: bool,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            records_presence: true,
            memory_topology: true,
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            global_key: "global".to_string(),
            disabled_rules: Vec::new(),
            checks: ChecksConfig::default(),
        }
    }
}

impl ValidatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.global_key.trim().is_empty() {
            return Err(anyhow!("global_key must be non-empty"));
        }
        if let Some(id) = self.disabled_rules.iter().find(|id| id.trim().is_empty()) {
            return Err(anyhow!("disabled_rules contains an empty id ({id:?})"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ValidatorConfig::default()`.
pub fn load_config(path: &Path) -> Result<ValidatorConfig> {
    if !path.exists() {
        let cfg = ValidatorConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ValidatorConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ValidatorConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDir;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, ValidatorConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        let cfg = ValidatorConfig {
            disabled_rules: vec!["bios-version".to_string()],
            ..ValidatorConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TestDir::new().expect("dir");
        let path = dir
            .write("config.toml", "[checks]\nmemory_topology = false\n")
            .expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.global_key, "global");
        assert!(cfg.checks.records_presence);
        assert!(!cfg.checks.memory_topology);
    }

    #[test]
    fn empty_global_key_is_rejected() {
        let dir = TestDir::new().expect("dir");
        let path = dir.write("config.toml", "global_key = \" \"\n").expect("write");
        let err = load_config(&path).expect_err("invalid config");
        assert!(err.to_string().contains("global_key must be non-empty"));
    }
}
