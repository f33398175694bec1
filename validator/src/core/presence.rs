//! Required record types.

use tracing::debug;

use crate::core::validator::{Findings, SetValidator};
use crate::record::{RecordSet, RecordType};

/// Record types every compliant table must contain, with their report label.
pub const REQUIRED_RECORDS: &[(RecordType, &str)] = &[
    (RecordType::Bios, "BIOS"),
    (RecordType::Baseboard, "Motherboard"),
    (RecordType::Chassis, "Chassis"),
    (RecordType::Processor, "Processor"),
];

/// Reports each required record type absent from the set.
#[derive(Debug, Clone, Copy)]
pub struct RecordsPresenceChecker<'a> {
    records: &'a RecordSet,
}

impl<'a> RecordsPresenceChecker<'a> {
    pub fn new(records: &'a RecordSet) -> Self {
        Self { records }
    }
}

impl SetValidator for RecordsPresenceChecker<'_> {
    fn name(&self) -> &'static str {
        "records-presence"
    }

    fn validate(&self) -> Findings {
        let mut findings = Findings::new();
        for (record_type, label) in REQUIRED_RECORDS {
            if !self.records.contains_type(*record_type) {
                debug!(record_type = %record_type, "required record missing");
                findings.insert(format!("{label} SMBIOS record is missing."), String::new());
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{compliant_records, compliant_set, set_without};

    #[test]
    fn complete_set_has_no_findings() {
        let set = compliant_set();
        assert!(RecordsPresenceChecker::new(&set).validate().is_empty());
    }

    #[test]
    fn missing_baseboard_reports_motherboard() {
        let baseboard = compliant_records()
            .into_iter()
            .find(|record| record.record_type() == RecordType::Baseboard)
            .expect("baseboard")
            .handle()
            .clone();
        let set = set_without(&[baseboard]);
        let findings = RecordsPresenceChecker::new(&set).validate();
        let messages: Vec<&str> = findings.keys().map(String::as_str).collect();
        assert_eq!(messages, vec!["Motherboard SMBIOS record is missing."]);
    }

    #[test]
    fn empty_set_reports_every_requirement_in_table_order() {
        let set = RecordSet::default();
        let findings = RecordsPresenceChecker::new(&set).validate();
        let messages: Vec<&str> = findings.keys().map(String::as_str).collect();
        assert_eq!(
            messages,
            vec![
                "BIOS SMBIOS record is missing.",
                "Motherboard SMBIOS record is missing.",
                "Chassis SMBIOS record is missing.",
                "Processor SMBIOS record is missing.",
            ]
        );
        assert!(findings.values().all(String::is_empty));
    }
}
