//! Record selection predicates.

use std::fmt;

use crate::record::{Record, RecordType};

/// Decides whether a record is in scope for a rule. Total and side-effect free.
pub trait RecordMatcher: fmt::Debug {
    fn is_matched_record(&self, record: &Record) -> bool;
}

/// Matches records of exactly one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordTypeMatcher {
    record_type: RecordType,
}

impl RecordTypeMatcher {
    pub fn new(record_type: RecordType) -> Self {
        Self { record_type }
    }
}

impl RecordMatcher for RecordTypeMatcher {
    fn is_matched_record(&self, record: &Record) -> bool {
        record.record_type() == self.record_type
    }
}

/// Logical AND over sub-matchers. An empty matcher matches every record.
#[derive(Debug, Default)]
pub struct Matcher {
    matchers: Vec<Box<dyn RecordMatcher>>,
}

impl Matcher {
    pub fn new(matchers: Vec<Box<dyn RecordMatcher>>) -> Self {
        Self { matchers }
    }

    pub fn push(&mut self, matcher: impl RecordMatcher + 'static) {
        self.matchers.push(Box::new(matcher));
    }
}

impl RecordMatcher for Matcher {
    fn is_matched_record(&self, record: &Record) -> bool {
        self.matchers
            .iter()
            .all(|matcher| matcher.is_matched_record(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{compliant_records, record};

    fn type_matcher(record_type: RecordType) -> Matcher {
        Matcher::new(vec![Box::new(RecordTypeMatcher::new(record_type))])
    }

    #[test]
    fn type_matcher_selects_single_bios_record() {
        let records = compliant_records();
        let matcher = type_matcher(RecordType::Bios);
        let matched = records
            .iter()
            .filter(|record| matcher.is_matched_record(record))
            .count();
        assert_eq!(matched, 1);
    }

    #[test]
    fn type_matcher_selects_every_group_record() {
        let records = compliant_records();
        let matcher = type_matcher(RecordType::GroupAssociations);
        let matched = records
            .iter()
            .filter(|record| matcher.is_matched_record(record))
            .count();
        assert_eq!(matched, 5);
    }

    #[test]
    fn type_matcher_rejects_unknown_types() {
        let unknown = record("0x00F0", RecordType::Other(222), &[]);
        assert!(!type_matcher(RecordType::Bios).is_matched_record(&unknown));
        assert!(type_matcher(RecordType::Other(222)).is_matched_record(&unknown));
        assert!(!type_matcher(RecordType::Other(221)).is_matched_record(&unknown));
    }

    #[test]
    fn empty_matcher_matches_everything() {
        let matcher = Matcher::default();
        for record in compliant_records() {
            assert!(matcher.is_matched_record(&record));
        }
    }

    #[test]
    fn all_sub_matchers_must_agree() {
        let mut matcher = type_matcher(RecordType::Bios);
        let bios = record("0x0000", RecordType::Bios, &[]);
        assert!(matcher.is_matched_record(&bios));
        matcher.push(RecordTypeMatcher::new(RecordType::Chassis));
        assert!(!matcher.is_matched_record(&bios));
    }
}
