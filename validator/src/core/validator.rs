//! Validator family: per-record validation and whole-set validation.

use indexmap::IndexMap;

use crate::core::checker::Checker;
use crate::record::{Record, RecordSet};

/// Error message → action message. Empty map means the set is consistent.
///
/// Set-level validators produce no specific action, so actions are empty.
pub type Findings = IndexMap<String, String>;

/// A validator that judges the whole record set once per run.
pub trait SetValidator {
    /// Stable name used in diagnostics.
    fn name(&self) -> &'static str;

    fn validate(&self) -> Findings;
}

/// AND-combination of checkers over one record.
#[derive(Debug, Default)]
pub struct IndividualValidator {
    checkers: Vec<Box<dyn Checker>>,
}

impl IndividualValidator {
    pub fn new(checkers: Vec<Box<dyn Checker>>) -> Self {
        Self { checkers }
    }

    /// True iff every checker passes.
    pub fn validate(&self, record: &Record, records: &RecordSet) -> bool {
        self.checkers
            .iter()
            .all(|checker| checker.check(record, records))
    }

    /// Explanations of each failing checker, in checker order.
    pub fn failures(&self, record: &Record, records: &RecordSet) -> Vec<String> {
        self.checkers
            .iter()
            .filter(|checker| !checker.check(record, records))
            .map(|checker| checker.explain(record))
            .collect()
    }
}
