//! Parsed SMBIOS record model.
//!
//! Records are immutable once parsed. Cross-record references are plain
//! [`Handle`] keys resolved through [`RecordSet::get`], never pointers.

use std::fmt;

use anyhow::{Result, bail};
use indexmap::IndexMap;

/// Field holding the group name of a Group Associations record.
pub const GROUP_NAME_FIELD: &str = "Name";
/// Field holding the `(type, handle)` items of a Group Associations record.
pub const GROUP_ITEMS_FIELD: &str = "Items";

/// Opaque record identifier, e.g. `0x02C9`.
///
/// Hex handles are canonicalized to `0x` followed by four uppercase digits so
/// that `0x2c9` and `0x02C9` resolve to the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(String);

impl Handle {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"));
        match digits.map(|digits| u32::from_str_radix(digits, 16)) {
            Some(Ok(value)) => Self(format!("0x{value:04X}")),
            _ => Self(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Handle {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// DMI structure type.
///
/// Types the rule catalog reasons about get their own variant; anything else
/// keeps its numeric code in [`RecordType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    Bios,
    System,
    Baseboard,
    Chassis,
    Processor,
    Cache,
    GroupAssociations,
    PhysicalMemoryArray,
    MemoryDevice,
    Other(u8),
}

impl RecordType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Bios,
            1 => Self::System,
            2 => Self::Baseboard,
            3 => Self::Chassis,
            4 => Self::Processor,
            7 => Self::Cache,
            14 => Self::GroupAssociations,
            16 => Self::PhysicalMemoryArray,
            17 => Self::MemoryDevice,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Bios => 0,
            Self::System => 1,
            Self::Baseboard => 2,
            Self::Chassis => 3,
            Self::Processor => 4,
            Self::Cache => 7,
            Self::GroupAssociations => 14,
            Self::PhysicalMemoryArray => 16,
            Self::MemoryDevice => 17,
            Self::Other(code) => code,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bios => "BIOS Information",
            Self::System => "System Information",
            Self::Baseboard => "Base Board Information",
            Self::Chassis => "Chassis Information",
            Self::Processor => "Processor Information",
            Self::Cache => "Cache Information",
            Self::GroupAssociations => "Group Associations",
            Self::PhysicalMemoryArray => "Physical Memory Array",
            Self::MemoryDevice => "Memory Device",
            Self::Other(_) => "Unknown",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type {} ({})", self.code(), self.label())
    }
}

/// Value of a single record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    /// Multi-line field. `declared` is the header value (usually a count).
    List {
        declared: Option<String>,
        entries: Vec<String>,
    },
    /// Referenced handles of an association, only produced for Group
    /// Associations records.
    Items {
        declared: Option<String>,
        items: Vec<Handle>,
    },
}

impl FieldValue {
    /// Scalar text of the field: the value itself or the list header.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value.as_str()),
            Self::List { declared, .. } | Self::Items { declared, .. } => declared.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(value) => value.trim().is_empty(),
            Self::List { declared, entries } => {
                entries.is_empty() && declared.as_deref().is_none_or(|d| d.trim().is_empty())
            }
            Self::Items { declared, items } => {
                items.is_empty() && declared.as_deref().is_none_or(|d| d.trim().is_empty())
            }
        }
    }

    /// Declared entry count and actual entry count, for list-like fields.
    pub fn counts(&self) -> Option<(Option<&str>, usize)> {
        match self {
            Self::Scalar(_) => None,
            Self::List { declared, entries } => Some((declared.as_deref(), entries.len())),
            Self::Items { declared, items } => Some((declared.as_deref(), items.len())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    handle: Handle,
    record_type: RecordType,
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new(
        handle: Handle,
        record_type: RecordType,
        fields: IndexMap<String, FieldValue>,
    ) -> Self {
        Self {
            handle,
            record_type,
            fields,
        }
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Association items, empty for records without an `Items` item list.
    pub fn items(&self) -> &[Handle] {
        match self.fields.get(GROUP_ITEMS_FIELD) {
            Some(FieldValue::Items { items, .. }) => items,
            _ => &[],
        }
    }
}

/// Derived view of one Group Associations record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub handle: Handle,
    pub items: Vec<Handle>,
}

/// The full record universe of one parse plus its derived group index.
///
/// Both maps keep parser order, which the topology checks rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: IndexMap<Handle, Record>,
    groups: IndexMap<Handle, Group>,
}

impl RecordSet {
    /// Index `records` by handle and derive the group index.
    ///
    /// Fails on duplicate handles: the set would not be a valid universe.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        let mut indexed = IndexMap::with_capacity(records.len());
        for record in records {
            if indexed.contains_key(&record.handle) {
                bail!("duplicate record handle {}", record.handle);
            }
            indexed.insert(record.handle.clone(), record);
        }
        let groups = build_groups(&indexed);
        Ok(Self {
            records: indexed,
            groups,
        })
    }

    pub fn get(&self, handle: &Handle) -> Option<&Record> {
        self.records.get(handle)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn contains_type(&self, record_type: RecordType) -> bool {
        self.records().any(|record| record.record_type == record_type)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Build the group index from Group Associations records, in record order.
pub fn build_groups(records: &IndexMap<Handle, Record>) -> IndexMap<Handle, Group> {
    records
        .values()
        .filter(|record| record.record_type == RecordType::GroupAssociations)
        .map(|record| {
            let name = record
                .field(GROUP_NAME_FIELD)
                .and_then(FieldValue::text)
                .unwrap_or_default()
                .trim()
                .to_string();
            let group = Group {
                name,
                handle: record.handle.clone(),
                items: record.items().to_vec(),
            };
            (record.handle.clone(), group)
        })
        .collect()
}
