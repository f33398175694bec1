//! Declarative rule binding: matcher + validators → error and action text.

use anyhow::{Result, bail};

use crate::core::checker::Checker;
use crate::core::matcher::{Matcher, RecordMatcher, RecordTypeMatcher};
use crate::core::validator::IndividualValidator;
use crate::record::{Record, RecordSet, RecordType};

/// Immutable rule configuration. Rules are data; the engine never special-cases one.
#[derive(Debug)]
pub struct Rule {
    id: String,
    matcher: Matcher,
    validators: Vec<IndividualValidator>,
    err_msg: String,
    action_msg: String,
}

impl Rule {
    pub fn builder(id: &str) -> RuleBuilder {
        RuleBuilder {
            id: id.to_string(),
            matcher: Matcher::default(),
            validators: Vec::new(),
            err_msg: String::new(),
            action_msg: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn err_msg(&self) -> &str {
        &self.err_msg
    }

    pub fn action_msg(&self) -> &str {
        &self.action_msg
    }

    /// True iff every matcher matches `record`.
    pub fn applies_to(&self, record: &Record) -> bool {
        self.matcher.is_matched_record(record)
    }

    /// True iff every validator accepts `record`.
    pub fn is_satisfied_by(&self, record: &Record, records: &RecordSet) -> bool {
        self.validators
            .iter()
            .all(|validator| validator.validate(record, records))
    }

    /// Diagnostic explanations for a record this rule rejects.
    pub fn explain(&self, record: &Record, records: &RecordSet) -> Vec<String> {
        self.validators
            .iter()
            .flat_map(|validator| validator.failures(record, records))
            .collect()
    }
}

#[derive(Debug)]
pub struct RuleBuilder {
    id: String,
    matcher: Matcher,
    validators: Vec<IndividualValidator>,
    err_msg: String,
    action_msg: String,
}

impl RuleBuilder {
    pub fn matching(mut self, matcher: impl RecordMatcher + 'static) -> Self {
        self.matcher.push(matcher);
        self
    }

    /// Shorthand for `matching(RecordTypeMatcher::new(record_type))`.
    pub fn for_type(self, record_type: RecordType) -> Self {
        self.matching(RecordTypeMatcher::new(record_type))
    }

    pub fn validator(mut self, validator: IndividualValidator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Wrap `checkers` in a single [`IndividualValidator`].
    pub fn checks(self, checkers: Vec<Box<dyn Checker>>) -> Self {
        self.validator(IndividualValidator::new(checkers))
    }

    pub fn error(mut self, err_msg: impl Into<String>) -> Self {
        self.err_msg = err_msg.into();
        self
    }

    pub fn action(mut self, action_msg: impl Into<String>) -> Self {
        self.action_msg = action_msg.into();
        self
    }

    pub fn build(self) -> Result<Rule> {
        if self.id.trim().is_empty() {
            bail!("rule id must be non-empty");
        }
        if self.validators.is_empty() {
            bail!("rule '{}' has no validators", self.id);
        }
        if self.err_msg.trim().is_empty() {
            bail!("rule '{}' has no error message", self.id);
        }
        if self.action_msg.trim().is_empty() {
            bail!("rule '{}' has no action message", self.id);
        }
        Ok(Rule {
            id: self.id,
            matcher: self.matcher,
            validators: self.validators,
            err_msg: self.err_msg,
            action_msg: self.action_msg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::checker::FieldPresentChecker;
    use crate::test_support::record;

    fn vendor_rule() -> Rule {
        Rule::builder("bios-vendor")
            .for_type(RecordType::Bios)
            .checks(vec![Box::new(FieldPresentChecker::new("Vendor"))])
            .error("ERROR: vendor missing")
            .action("ACTION: add vendor")
            .build()
            .expect("rule")
    }

    #[test]
    fn applies_only_to_matching_type() {
        let rule = vendor_rule();
        assert!(rule.applies_to(&record("0x0000", RecordType::Bios, &[])));
        assert!(!rule.applies_to(&record("0x0003", RecordType::Chassis, &[])));
    }

    #[test]
    fn satisfied_when_validators_pass() {
        let rule = vendor_rule();
        let records = RecordSet::default();
        assert!(rule.is_satisfied_by(
            &record("0x0000", RecordType::Bios, &[("Vendor", "Acme")]),
            &records
        ));
        let missing = record("0x0000", RecordType::Bios, &[]);
        assert!(!rule.is_satisfied_by(&missing, &records));
        assert_eq!(
            rule.explain(&missing, &records),
            vec!["field 'Vendor' missing or empty in 0x0000".to_string()]
        );
    }

    #[test]
    fn build_rejects_incomplete_rules() {
        let err = Rule::builder("no-validators")
            .for_type(RecordType::Bios)
            .error("e")
            .action("a")
            .build()
            .expect_err("no validators");
        assert!(err.to_string().contains("has no validators"));

        let err = Rule::builder("no-action")
            .for_type(RecordType::Bios)
            .checks(vec![Box::new(FieldPresentChecker::new("Vendor"))])
            .error("e")
            .build()
            .expect_err("no action");
        assert!(err.to_string().contains("has no action message"));
    }
}
