//! Test-only helpers for constructing records and record sets.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::record::{
    FieldValue, GROUP_ITEMS_FIELD, GROUP_NAME_FIELD, Handle, Record, RecordSet, RecordType,
};

/// Create a record with scalar fields.
pub fn record(handle: &str, record_type: RecordType, fields: &[(&str, &str)]) -> Record {
    record_with(
        handle,
        record_type,
        fields
            .iter()
            .map(|(name, value)| (*name, FieldValue::Scalar(value.to_string())))
            .collect(),
    )
}

/// Create a record from already-built field values, in the given order.
pub fn record_with(
    handle: &str,
    record_type: RecordType,
    fields: Vec<(&str, FieldValue)>,
) -> Record {
    Record::new(
        Handle::new(handle),
        record_type,
        fields
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    )
}

/// Create a multi-line field value.
pub fn list_field(declared: Option<&str>, entries: &[&str]) -> FieldValue {
    FieldValue::List {
        declared: declared.map(str::to_string),
        entries: entries.iter().map(|entry| entry.to_string()).collect(),
    }
}

/// Create a Group Associations record whose items reference `items`.
pub fn group_record(handle: &str, name: &str, items: &[&str]) -> Record {
    record_with(
        handle,
        RecordType::GroupAssociations,
        vec![
            (GROUP_NAME_FIELD, FieldValue::Scalar(name.to_string())),
            (
                GROUP_ITEMS_FIELD,
                FieldValue::Items {
                    declared: Some(items.len().to_string()),
                    items: items.iter().map(|handle| Handle::new(handle)).collect(),
                },
            ),
        ],
    )
}

/// A record list that passes every catalog rule and set-level check.
///
/// Mirrors `tests/fixtures/compliant.txt`.
pub fn compliant_records() -> Vec<Record> {
    let scalar = |value: &str| FieldValue::Scalar(value.to_string());
    let baseboard = record_with(
        "0x0002",
        RecordType::Baseboard,
        vec![
            ("Manufacturer", scalar("Acme")),
            ("Product Name", scalar("Sled 9")),
            (
                "Features",
                list_field(None, &["Board is a hosting board", "Board is replaceable"]),
            ),
            ("Location In Chassis", scalar("/phys")),
            ("Chassis Handle", scalar("0x0003")),
            (
                "Contained Object Handles",
                list_field(Some("2"), &["0x0004", "0x0005"]),
            ),
        ],
    );

    vec![
        record(
            "0x0000",
            RecordType::Bios,
            &[
                ("Vendor", "Acme"),
                ("Version", "1.2.3"),
                ("Release Date", "03/14/2023"),
                ("ROM Size", "32 MB"),
            ],
        ),
        record(
            "0x0001",
            RecordType::System,
            &[("Manufacturer", "Acme"), ("Product Name", "Sled 9")],
        ),
        baseboard,
        record(
            "0x0003",
            RecordType::Chassis,
            &[
                ("Manufacturer", "Acme"),
                ("Type", "Rack Mount Chassis"),
                ("Lock", "Not Present"),
                ("Contained Elements", "0"),
            ],
        ),
        record(
            "0x0004",
            RecordType::Processor,
            &[
                ("Socket Designation", "CPU0"),
                ("Type", "Central Processor"),
                ("Status", "Populated, Enabled"),
                ("L1 Cache Handle", "0x0005"),
                ("L2 Cache Handle", "0x0006"),
                ("L3 Cache Handle", "0x0007"),
                ("Core Count", "32"),
                ("Core Enabled", "32"),
                ("Thread Count", "64"),
            ],
        ),
        record("0x0005", RecordType::Cache, &[("Socket Designation", "L1")]),
        record("0x0006", RecordType::Cache, &[("Socket Designation", "L2")]),
        record("0x0007", RecordType::Cache, &[("Socket Designation", "L3")]),
        group_record("0x0100", "die0", &["0x0101", "0x0102"]),
        group_record("0x0101", "IMC0", &["0x0103"]),
        group_record("0x0102", "IMC1", &["0x0104"]),
        group_record("0x0103", "CH0", &["0x0200"]),
        group_record("0x0104", "CH1", &["0x0201"]),
        record("0x0200", RecordType::MemoryDevice, &[("Size", "32 GB")]),
        record("0x0201", RecordType::MemoryDevice, &[("Size", "32 GB")]),
    ]
}

pub fn compliant_set() -> RecordSet {
    RecordSet::new(compliant_records()).expect("compliant records have unique handles")
}

/// The compliant set minus the records at `handles`.
pub fn set_without(handles: &[Handle]) -> RecordSet {
    let records = compliant_records()
        .into_iter()
        .filter(|record| !handles.contains(record.handle()))
        .collect();
    RecordSet::new(records).expect("subset keeps unique handles")
}

/// Memory topology with one violation of each kind:
///
/// - controllers `0x0297`, `0x0298`, `0x0299` listed by no die,
/// - die `0x02C9` listing no controller,
/// - controller `0x0298` listing a Memory Device,
/// - controller `0x029B` listed by die `0x02CB` and then die `0x02CC`.
pub fn topology_violations_set() -> RecordSet {
    RecordSet::new(vec![
        group_record("0x0297", "IMC0", &["0x02A0"]),
        group_record("0x0298", "IMC1", &["0x02A0", "0x0300"]),
        group_record("0x0299", "IMC0", &["0x02A0"]),
        group_record("0x029A", "IMC0", &["0x02A0"]),
        group_record("0x029B", "IMC1", &["0x02A1"]),
        group_record("0x02A0", "CH0", &["0x0300"]),
        group_record("0x02A1", "CH1", &["0x0300"]),
        group_record("0x02C9", "die0", &["0x0300"]),
        group_record("0x02CA", "die1", &["0x029A"]),
        group_record("0x02CB", "die0", &["0x029B"]),
        group_record("0x02CC", "die0", &["0x029B"]),
        record("0x0300", RecordType::MemoryDevice, &[("Size", "16 GB")]),
    ])
    .expect("topology records have unique handles")
}

/// Temporary directory holding input files for file-level tests.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` under the directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
