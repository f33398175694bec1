//! Validation orchestration.
//!
//! Per-record rules run for every record in parser order, rules in catalog
//! order. Set-level validators run once per run and report under the global
//! key. Non-compliance never produces an `Err`; only unreadable input or bad
//! configuration does.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::catalog::enabled_rules;
use crate::core::error_bucket::{ErrorBucket, ErrorEntry};
use crate::core::memory_groups::MemoryGroupAssociationsChecker;
use crate::core::presence::RecordsPresenceChecker;
use crate::core::rule::Rule;
use crate::core::validator::SetValidator;
use crate::io::config::ValidatorConfig;
use crate::io::dmidecode::parse_file;
use crate::record::RecordSet;

/// Which set-level validators run, and where their findings go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    pub global_key: String,
    pub records_presence: bool,
    pub memory_topology: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::from(&ValidatorConfig::default())
    }
}

impl From<&ValidatorConfig> for ValidationOptions {
    fn from(config: &ValidatorConfig) -> Self {
        Self {
            global_key: config.global_key.clone(),
            records_presence: config.checks.records_presence,
            memory_topology: config.checks.memory_topology,
        }
    }
}

/// Apply every rule to every matching record, keyed by record handle.
pub fn validate_records(rules: &[Rule], records: &RecordSet) -> ErrorBucket {
    let mut bucket = ErrorBucket::new();
    for record in records.records() {
        for rule in rules {
            if !rule.applies_to(record) || rule.is_satisfied_by(record, records) {
                continue;
            }
            debug!(
                rule = rule.id(),
                handle = %record.handle(),
                reasons = ?rule.explain(record, records),
                "rule failed"
            );
            bucket.add_error(
                record.handle().as_str(),
                ErrorEntry::new(rule.err_msg(), rule.action_msg()),
            );
        }
    }
    bucket
}

/// Run the enabled set-level validators once, keyed by `options.global_key`.
pub fn validate_set(records: &RecordSet, options: &ValidationOptions) -> ErrorBucket {
    let mut validators: Vec<Box<dyn SetValidator + '_>> = Vec::new();
    if options.records_presence {
        validators.push(Box::new(RecordsPresenceChecker::new(records)));
    }
    if options.memory_topology {
        validators.push(Box::new(MemoryGroupAssociationsChecker::new(records)));
    }

    let mut bucket = ErrorBucket::new();
    for validator in &validators {
        let findings = validator.validate();
        debug!(
            validator = validator.name(),
            findings = findings.len(),
            "set validator finished"
        );
        for (error, action) in findings {
            bucket.add_error(options.global_key.as_str(), (error, action));
        }
    }
    bucket
}

/// Full run: per-record findings first, then set-level findings.
pub fn run(rules: &[Rule], records: &RecordSet, options: &ValidationOptions) -> ErrorBucket {
    let mut bucket = validate_records(rules, records);
    bucket.merge(validate_set(records, options));
    info!(
        records = records.len(),
        rules = rules.len(),
        keys = bucket.len(),
        errors = bucket.error_count(),
        "validation finished"
    );
    bucket
}

/// Parse `dump` and validate it with the catalog rules enabled by `config`.
pub fn validate_dump(dump: &Path, config: &ValidatorConfig) -> Result<ErrorBucket> {
    let rules = enabled_rules(&config.disabled_rules).context("build rule catalog")?;
    let records = parse_file(dump)?;
    Ok(run(&rules, &records, &ValidationOptions::from(config)))
}
