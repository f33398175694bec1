//! Field-level checks over a single record.
//!
//! Checkers are stateless and reusable across records. Each one can explain
//! its own failure for diagnostics. The user-facing message always comes from
//! the rule that owns the checker.

use std::fmt;

use anyhow::{Context, Result};
use regex::Regex;

use crate::record::{Handle, Record, RecordSet, RecordType};

pub trait Checker: fmt::Debug {
    /// True when `record` passes. `records` is the universe for cross-record lookups.
    fn check(&self, record: &Record, records: &RecordSet) -> bool;

    /// Short description of what a failing record got wrong.
    fn explain(&self, record: &Record) -> String;
}

/// Fails when the field is absent or has an empty value.
#[derive(Debug, Clone)]
pub struct FieldPresentChecker {
    field: String,
}

impl FieldPresentChecker {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
        }
    }
}

impl Checker for FieldPresentChecker {
    fn check(&self, record: &Record, _records: &RecordSet) -> bool {
        record
            .field(&self.field)
            .is_some_and(|value| !value.is_empty())
    }

    fn explain(&self, record: &Record) -> String {
        format!("field '{}' missing or empty in {}", self.field, record.handle())
    }
}

/// Fails when the field's text does not fully match `pattern`.
///
/// An absent field passes: rules pair this with a [`FieldPresentChecker`].
#[derive(Debug, Clone)]
pub struct FieldValueRegexpChecker {
    field: String,
    pattern: Regex,
}

impl FieldValueRegexpChecker {
    pub fn new(field: &str, pattern: &str) -> Result<Self> {
        let anchored = format!("^(?:{pattern})$");
        let pattern = Regex::new(&anchored)
            .with_context(|| format!("compile pattern for field '{field}'"))?;
        Ok(Self {
            field: field.to_string(),
            pattern,
        })
    }
}

impl Checker for FieldValueRegexpChecker {
    fn check(&self, record: &Record, _records: &RecordSet) -> bool {
        match record.field(&self.field) {
            None => true,
            Some(value) => value
                .text()
                .is_some_and(|text| self.pattern.is_match(text.trim())),
        }
    }

    fn explain(&self, record: &Record) -> String {
        format!(
            "field '{}' of {} does not match {}",
            self.field,
            record.handle(),
            self.pattern.as_str()
        )
    }
}

/// Fails when the field's text is not one of `allowed` (exact, case-sensitive).
///
/// An absent field passes: rules pair this with a [`FieldPresentChecker`].
#[derive(Debug, Clone)]
pub struct FieldValueEnumChecker {
    field: String,
    allowed: Vec<String>,
}

impl FieldValueEnumChecker {
    pub fn new(field: &str, allowed: &[&str]) -> Self {
        Self {
            field: field.to_string(),
            allowed: allowed.iter().map(|value| value.to_string()).collect(),
        }
    }
}

impl Checker for FieldValueEnumChecker {
    fn check(&self, record: &Record, _records: &RecordSet) -> bool {
        match record.field(&self.field) {
            None => true,
            Some(value) => value
                .text()
                .is_some_and(|text| self.allowed.iter().any(|allowed| allowed == text.trim())),
        }
    }

    fn explain(&self, record: &Record) -> String {
        format!(
            "field '{}' of {} is not one of [{}]",
            self.field,
            record.handle(),
            self.allowed.join(", ")
        )
    }
}

/// Fails when a list field is empty or its declared count disagrees with the
/// number of entries actually present.
#[derive(Debug, Clone)]
pub struct FieldItemCountChecker {
    field: String,
}

impl FieldItemCountChecker {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
        }
    }
}

impl Checker for FieldItemCountChecker {
    fn check(&self, record: &Record, _records: &RecordSet) -> bool {
        let Some((declared, actual)) = record.field(&self.field).and_then(|value| value.counts())
        else {
            return false;
        };
        if actual == 0 {
            return false;
        }
        match declared {
            None => true,
            Some(declared) => declared.trim().parse::<usize>().ok() == Some(actual),
        }
    }

    fn explain(&self, record: &Record) -> String {
        let counts = record.field(&self.field).and_then(|value| value.counts());
        match counts {
            Some((declared, actual)) => format!(
                "field '{}' of {} declares {} items but lists {}",
                self.field,
                record.handle(),
                declared.unwrap_or("no"),
                actual
            ),
            None => format!("field '{}' of {} has no item list", self.field, record.handle()),
        }
    }
}

/// Treats the field's value as a handle; fails unless it resolves to a record
/// of `expected`.
#[derive(Debug, Clone)]
pub struct HandleFieldChecker {
    field: String,
    expected: RecordType,
}

impl HandleFieldChecker {
    pub fn new(field: &str, expected: RecordType) -> Self {
        Self {
            field: field.to_string(),
            expected,
        }
    }
}

impl Checker for HandleFieldChecker {
    fn check(&self, record: &Record, records: &RecordSet) -> bool {
        record
            .field(&self.field)
            .and_then(|value| value.text())
            .and_then(|text| records.get(&Handle::new(text)))
            .is_some_and(|target| target.record_type() == self.expected)
    }

    fn explain(&self, record: &Record) -> String {
        format!(
            "field '{}' of {} does not reference a {} record",
            self.field, record.handle(), self.expected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{DATE_REGEXP, PROCESSOR_TYPE};
    use crate::record::FieldValue;
    use crate::test_support::{list_field, record, record_with};

    fn set_of(records: Vec<Record>) -> RecordSet {
        RecordSet::new(records).expect("set")
    }

    #[test]
    fn present_rejects_missing_and_blank_fields() {
        let checker = FieldPresentChecker::new("Vendor");
        let empty = set_of(Vec::new());
        assert!(checker.check(&record("0x0000", RecordType::Bios, &[("Vendor", "Acme")]), &empty));
        assert!(!checker.check(&record("0x0000", RecordType::Bios, &[("Vendor", " ")]), &empty));
        assert!(!checker.check(&record("0x0000", RecordType::Bios, &[]), &empty));
    }

    #[test]
    fn regexp_requires_full_match() {
        let checker = FieldValueRegexpChecker::new("Release Date", DATE_REGEXP).expect("regex");
        let empty = set_of(Vec::new());
        let good = record("0x0000", RecordType::Bios, &[("Release Date", "03/14/2023")]);
        let trailing = record("0x0000", RecordType::Bios, &[("Release Date", "03/14/2023x")]);
        let swapped = record("0x0000", RecordType::Bios, &[("Release Date", "14/03/2023")]);
        assert!(checker.check(&good, &empty));
        assert!(!checker.check(&trailing, &empty));
        assert!(!checker.check(&swapped, &empty));
        assert!(checker.check(&record("0x0000", RecordType::Bios, &[]), &empty));
    }

    #[test]
    fn regexp_rejects_invalid_pattern_at_definition() {
        let err = FieldValueRegexpChecker::new("Version", "(unclosed").expect_err("bad regex");
        assert!(err.to_string().contains("compile pattern for field 'Version'"));
    }

    #[test]
    fn enum_is_case_sensitive() {
        let checker = FieldValueEnumChecker::new("Type", PROCESSOR_TYPE);
        let empty = set_of(Vec::new());
        let good = record("0x0004", RecordType::Processor, &[("Type", "Central Processor")]);
        let lower = record("0x0004", RecordType::Processor, &[("Type", "central processor")]);
        assert!(checker.check(&good, &empty));
        assert!(!checker.check(&lower, &empty));
        assert!(checker.explain(&lower).contains("Central Processor"));
    }

    #[test]
    fn item_count_detects_truncated_lists() {
        let checker = FieldItemCountChecker::new("Contained Object Handles");
        let empty = set_of(Vec::new());
        let board = |value: FieldValue| {
            record_with(
                "0x0002",
                RecordType::Baseboard,
                vec![("Contained Object Handles", value)],
            )
        };

        assert!(checker.check(&board(list_field(Some("2"), &["0x0010", "0x0011"])), &empty));

        let truncated = board(list_field(Some("3"), &["0x0010", "0x0011"]));
        assert!(!checker.check(&truncated, &empty));
        assert_eq!(
            checker.explain(&truncated),
            "field 'Contained Object Handles' of 0x0002 declares 3 items but lists 2"
        );

        assert!(!checker.check(&board(list_field(Some("0"), &[])), &empty));
        assert!(!checker.check(&board(FieldValue::Scalar("2".to_string())), &empty));
    }

    #[test]
    fn handle_field_resolves_and_checks_type() {
        let checker = HandleFieldChecker::new("L1 Cache Handle", RecordType::Cache);
        let records = set_of(vec![
            record("0x0007", RecordType::Cache, &[]),
            record("0x0008", RecordType::Chassis, &[]),
        ]);
        let points_to = |handle: &str| {
            record("0x0004", RecordType::Processor, &[("L1 Cache Handle", handle)])
        };
        assert!(checker.check(&points_to("0x0007"), &records));
        assert!(checker.check(&points_to("0x7"), &records));
        assert!(!checker.check(&points_to("0x0008"), &records));
        assert!(!checker.check(&points_to("0x0099"), &records));
        assert!(!checker.check(&points_to("Not Provided"), &records));
        assert!(!checker.check(&record("0x0004", RecordType::Processor, &[]), &records));
    }
}
