//! Memory topology consistency over Group Associations records.
//!
//! Die groups (`die0`, `die1`, ...) list the integrated memory controller
//! groups (`IMC0`, `IMC1`, ...) they own. Controller groups list their own
//! Group Associations children. The checker verifies that:
//!
//! - every controller is listed by at least one die,
//! - every die lists at least one controller,
//! - every controller item is itself a Group Associations record,
//! - no controller is listed by two different dies.
//!
//! All checks run over the full data, so one run reports every violation.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::core::constants::{CONTROLLER_GROUP_PREFIX, DIE_GROUP_PREFIX};
use crate::core::validator::{Findings, SetValidator};
use crate::record::{Group, Handle, RecordSet, RecordType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupRole {
    Die,
    Controller,
}

fn group_role(name: &str) -> Option<GroupRole> {
    if is_numbered(name, DIE_GROUP_PREFIX) {
        Some(GroupRole::Die)
    } else if is_numbered(name, CONTROLLER_GROUP_PREFIX) {
        Some(GroupRole::Controller)
    } else {
        None
    }
}

/// `prefix` (ASCII case-insensitive) followed by one or more digits.
fn is_numbered(name: &str, prefix: &str) -> bool {
    let Some(head) = name.get(..prefix.len()) else {
        return false;
    };
    let tail = &name[prefix.len()..];
    head.eq_ignore_ascii_case(prefix)
        && !tail.is_empty()
        && tail.chars().all(|c| c.is_ascii_digit())
}

#[derive(Debug, Clone, Copy)]
pub struct MemoryGroupAssociationsChecker<'a> {
    records: &'a RecordSet,
}

impl<'a> MemoryGroupAssociationsChecker<'a> {
    pub fn new(records: &'a RecordSet) -> Self {
        Self { records }
    }

    fn groups_with_role(&self, role: GroupRole) -> Vec<&'a Group> {
        self.records
            .groups()
            .filter(|group| group_role(&group.name) == Some(role))
            .collect()
    }

    fn check_controllers_listed(
        &self,
        dies: &[&Group],
        controllers: &[&Group],
        findings: &mut Findings,
    ) {
        for controller in controllers {
            let listed = dies.iter().any(|die| {
                die.items
                    .iter()
                    .any(|item| *item == controller.handle)
            });
            if !listed {
                findings.insert(
                    format!(
                        "Memory Controller Handle {} ({}) is not listed in any die record.",
                        controller.handle, controller.name
                    ),
                    String::new(),
                );
            }
        }
    }

    fn check_dies_not_empty(
        &self,
        dies: &[&Group],
        controller_handles: &HashSet<&Handle>,
        findings: &mut Findings,
    ) {
        for die in dies {
            let has_controller = die
                .items
                .iter()
                .any(|item| controller_handles.contains(&item));
            if !has_controller {
                findings.insert(
                    format!(
                        "There is no memory controller handle in items of Die Handle {} ({}).",
                        die.handle, die.name
                    ),
                    String::new(),
                );
            }
        }
    }

    fn check_controller_items(&self, controllers: &[&Group], findings: &mut Findings) {
        for controller in controllers {
            let all_groups = controller.items.iter().all(|item| {
                self.records
                    .get(item)
                    .is_some_and(|record| record.record_type() == RecordType::GroupAssociations)
            });
            if !all_groups {
                findings.insert(
                    format!(
                        "Some items in Handle {} ({}) are not Type 14 handles (Group Associations).",
                        controller.handle, controller.name
                    ),
                    String::new(),
                );
            }
        }
    }

    /// The first die (in group order) to list a controller owns it.
    fn check_single_owner(
        &self,
        dies: &[&Group],
        controller_handles: &HashSet<&Handle>,
        findings: &mut Findings,
    ) {
        let mut owners: IndexMap<&Handle, &Group> = IndexMap::new();
        for die in dies {
            for item in &die.items {
                if !controller_handles.contains(&item) {
                    continue;
                }
                match owners.get(&item) {
                    Some(owner) if owner.handle != die.handle => {
                        findings.insert(
                            format!(
                                "In items of Die Handle {} ({}), memory controller handle {} was belong to another die record ({}).",
                                die.handle, die.name, item, owner.handle
                            ),
                            String::new(),
                        );
                    }
                    Some(_) => {}
                    None => {
                        owners.insert(item, *die);
                    }
                }
            }
        }
    }
}

impl SetValidator for MemoryGroupAssociationsChecker<'_> {
    fn name(&self) -> &'static str {
        "memory-group-associations"
    }

    fn validate(&self) -> Findings {
        let dies = self.groups_with_role(GroupRole::Die);
        let controllers = self.groups_with_role(GroupRole::Controller);
        let controller_handles: HashSet<&Handle> =
            controllers.iter().map(|group| &group.handle).collect();
        debug!(
            dies = dies.len(),
            controllers = controllers.len(),
            "checking memory topology"
        );

        let mut findings = Findings::new();
        self.check_controllers_listed(&dies, &controllers, &mut findings);
        self.check_dies_not_empty(&dies, &controller_handles, &mut findings);
        self.check_controller_items(&controllers, &mut findings);
        self.check_single_owner(&dies, &controller_handles, &mut findings);
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{compliant_set, group_record, record, topology_violations_set};

    fn messages(set: &RecordSet) -> Vec<String> {
        MemoryGroupAssociationsChecker::new(set)
            .validate()
            .into_keys()
            .collect()
    }

    #[test]
    fn group_names_are_classified_by_prefix() {
        assert_eq!(group_role("die0"), Some(GroupRole::Die));
        assert_eq!(group_role("DIE12"), Some(GroupRole::Die));
        assert_eq!(group_role("IMC1"), Some(GroupRole::Controller));
        assert_eq!(group_role("imc3"), Some(GroupRole::Controller));
        assert_eq!(group_role("die"), None);
        assert_eq!(group_role("dies0"), None);
        assert_eq!(group_role("CH0"), None);
        assert_eq!(group_role("d"), None);
        assert_eq!(group_role("dié0"), None);
    }

    #[test]
    fn consistent_topology_has_no_findings() {
        assert!(messages(&compliant_set()).is_empty());
    }

    #[test]
    fn reports_every_category_in_one_run() {
        let findings = MemoryGroupAssociationsChecker::new(&topology_violations_set()).validate();
        let keys: Vec<&str> = findings.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "Memory Controller Handle 0x0297 (IMC0) is not listed in any die record.",
                "Memory Controller Handle 0x0298 (IMC1) is not listed in any die record.",
                "Memory Controller Handle 0x0299 (IMC0) is not listed in any die record.",
                "There is no memory controller handle in items of Die Handle 0x02C9 (die0).",
                "Some items in Handle 0x0298 (IMC1) are not Type 14 handles (Group Associations).",
                "In items of Die Handle 0x02CC (die0), memory controller handle 0x029B was belong to another die record (0x02CB).",
            ]
        );
        assert!(findings.values().all(String::is_empty));
    }

    #[test]
    fn dangling_controller_item_is_not_homogeneous() {
        let set = RecordSet::new(vec![
            group_record("0x0100", "die0", &["0x0101"]),
            group_record("0x0101", "IMC0", &["0x0F00"]),
        ])
        .expect("set");
        assert_eq!(
            messages(&set),
            vec!["Some items in Handle 0x0101 (IMC0) are not Type 14 handles (Group Associations).".to_string()]
        );
    }

    #[test]
    fn repeated_controller_in_same_die_is_not_a_conflict() {
        let set = RecordSet::new(vec![
            group_record("0x0100", "die0", &["0x0101", "0x0101"]),
            group_record("0x0101", "IMC0", &[]),
        ])
        .expect("set");
        assert!(messages(&set).is_empty());
    }

    #[test]
    fn first_die_in_group_order_owns_controller() {
        let set = RecordSet::new(vec![
            group_record("0x0200", "die1", &["0x0101"]),
            group_record("0x0100", "die0", &["0x0101"]),
            group_record("0x0101", "IMC0", &[]),
            group_record("0x0300", "die2", &["0x0101"]),
        ])
        .expect("set");
        assert_eq!(
            messages(&set),
            vec![
                "In items of Die Handle 0x0100 (die0), memory controller handle 0x0101 was belong to another die record (0x0200).".to_string(),
                "In items of Die Handle 0x0300 (die2), memory controller handle 0x0101 was belong to another die record (0x0200).".to_string(),
            ]
        );
    }

    #[test]
    fn non_topology_groups_are_ignored() {
        let set = RecordSet::new(vec![
            group_record("0x0100", "Cpu Module", &["0x0004"]),
            record("0x0004", RecordType::Processor, &[]),
        ])
        .expect("set");
        assert!(messages(&set).is_empty());
    }

    #[test]
    fn validation_is_deterministic() {
        let set = topology_violations_set();
        let first = MemoryGroupAssociationsChecker::new(&set).validate();
        let second = MemoryGroupAssociationsChecker::new(&set).validate();
        assert_eq!(first, second);
    }
}
