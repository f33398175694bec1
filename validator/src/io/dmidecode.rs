//! Parser for `dmidecode` text output.
//!
//! ```text
//! Handle 0x0002, DMI type 2, 15 bytes
//! Base Board Information
//!     Manufacturer: Acme
//!     Contained Object Handles: 2
//!         0x0004
//!         0x0005
//! ```
//!
//! (indentation is tabs in real output). One tab introduces a field, two tabs
//! an entry of the preceding field. Anything before the first handle line is
//! banner text and is skipped. Unindented lines after a record's title are
//! dmidecode diagnostics (e.g. a wrong structure count) and are skipped with
//! a warning.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, warn};

use crate::record::{FieldValue, GROUP_ITEMS_FIELD, Handle, Record, RecordSet, RecordType};

static HANDLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Handle (0[xX][0-9A-Fa-f]+), DMI type (\d+), (\d+) bytes$").unwrap()
});

static ITEM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[xX][0-9A-Fa-f]+) \(.*\)$").unwrap());

/// Parse and index `dmidecode` output read from `path`.
pub fn parse_file(path: &Path) -> Result<RecordSet> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse(&text).with_context(|| format!("parse {}", path.display()))
}

/// Parse `dmidecode` output into an indexed record set.
pub fn parse(text: &str) -> Result<RecordSet> {
    let mut records = Vec::new();
    let mut pending: Option<PendingRecord> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end();

        if line.starts_with("Handle ") {
            if let Some(done) = pending.take() {
                records.push(done.finish());
            }
            let caps = HANDLE_LINE
                .captures(line)
                .ok_or_else(|| anyhow!("line {line_no}: malformed handle line '{line}'"))?;
            let code: u8 = caps[2]
                .parse()
                .with_context(|| format!("line {line_no}: DMI type '{}' out of range", &caps[2]))?;
            pending = Some(PendingRecord::new(
                Handle::new(&caps[1]),
                RecordType::from_code(code),
            ));
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        let content = line.trim_start_matches('\t');
        let depth = line.len() - content.len();
        let Some(record) = pending.as_mut() else {
            if depth > 0 {
                bail!("line {line_no}: field outside of a record");
            }
            continue;
        };

        match depth {
            0 if !record.titled => record.titled = true,
            0 => warn!(
                line = line_no,
                handle = %record.handle,
                text = content,
                "skipping unexpected line"
            ),
            1 => record.push_field(content),
            _ => record.push_entry(content.trim(), line_no)?,
        }
    }

    if let Some(done) = pending.take() {
        records.push(done.finish());
    }
    debug!(records = records.len(), "parsed dmidecode output");
    RecordSet::new(records)
}

struct PendingRecord {
    handle: Handle,
    record_type: RecordType,
    titled: bool,
    fields: IndexMap<String, FieldValue>,
    last_field: Option<String>,
}

impl PendingRecord {
    fn new(handle: Handle, record_type: RecordType) -> Self {
        Self {
            handle,
            record_type,
            titled: false,
            fields: IndexMap::new(),
            last_field: None,
        }
    }

    fn holds_items(&self, field: &str) -> bool {
        self.record_type == RecordType::GroupAssociations && field == GROUP_ITEMS_FIELD
    }

    fn push_field(&mut self, content: &str) {
        let (name, value) = match content.split_once(':') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (content.trim(), ""),
        };
        self.fields
            .insert(name.to_string(), FieldValue::Scalar(value.to_string()));
        self.last_field = Some(name.to_string());
    }

    fn push_entry(&mut self, entry: &str, line_no: usize) -> Result<()> {
        let name = self
            .last_field
            .clone()
            .ok_or_else(|| anyhow!("line {line_no}: list entry before any field in {}", self.handle))?;
        let holds_items = self.holds_items(&name);
        let value = self
            .fields
            .get_mut(&name)
            .ok_or_else(|| anyhow!("line {line_no}: unknown field '{name}'"))?;

        let current = std::mem::replace(value, FieldValue::Scalar(String::new()));
        *value = match current {
            FieldValue::Scalar(declared) if holds_items => FieldValue::Items {
                declared: non_empty(declared),
                items: vec![parse_item(entry, line_no)?],
            },
            FieldValue::Scalar(declared) => FieldValue::List {
                declared: non_empty(declared),
                entries: vec![entry.to_string()],
            },
            FieldValue::List {
                declared,
                mut entries,
            } => {
                entries.push(entry.to_string());
                FieldValue::List { declared, entries }
            }
            FieldValue::Items {
                declared,
                mut items,
            } => {
                items.push(parse_item(entry, line_no)?);
                FieldValue::Items { declared, items }
            }
        };
        Ok(())
    }

    fn finish(mut self) -> Record {
        // An association without entries still gets an (empty) item list.
        if self.record_type == RecordType::GroupAssociations {
            if let Some(value) = self.fields.get_mut(GROUP_ITEMS_FIELD) {
                if let FieldValue::Scalar(declared) = value {
                    let declared = non_empty(std::mem::take(declared));
                    *value = FieldValue::Items {
                        declared,
                        items: Vec::new(),
                    };
                }
            }
        }
        Record::new(self.handle, self.record_type, self.fields)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_item(entry: &str, line_no: usize) -> Result<Handle> {
    let caps = ITEM_LINE
        .captures(entry)
        .ok_or_else(|| anyhow!("line {line_no}: malformed group item '{entry}'"))?;
    Ok(Handle::new(&caps[1]))
}
