//! Static rule catalog.
//!
//! Example:
//!
//! ```rust,ignore
//! Rule::builder("bios-vendor")
//!     .for_type(RecordType::Bios)
//!     .checks(vec![present("Vendor")])
//!     .error("ERROR: Invalid Vendor field in Type 0 (BIOS Information) record.")
//!     .action("ACTION: Please populate Vendor field with valid string.")
//!     .build()?
//! ```
//!
//! matches DMI type 0 records and fails those without a non-empty `Vendor`.

use anyhow::{Result, bail};

use crate::core::checker::{
    Checker, FieldItemCountChecker, FieldPresentChecker, FieldValueEnumChecker,
    FieldValueRegexpChecker, HandleFieldChecker,
};
use crate::core::constants::{
    CHASSIS_LOCK, DATE_REGEXP, DEVPATH_REGEXP, NUMBER_REGEXP, PROCESSOR_STATUS, PROCESSOR_TYPE,
    ROM_SIZE_REGEXP,
};
use crate::core::rule::Rule;
use crate::record::RecordType;

fn present(field: &str) -> Box<dyn Checker> {
    Box::new(FieldPresentChecker::new(field))
}

fn matches(field: &str, pattern: &str) -> Result<Box<dyn Checker>> {
    Ok(Box::new(FieldValueRegexpChecker::new(field, pattern)?))
}

fn one_of(field: &str, allowed: &[&str]) -> Box<dyn Checker> {
    Box::new(FieldValueEnumChecker::new(field, allowed))
}

fn counted(field: &str) -> Box<dyn Checker> {
    Box::new(FieldItemCountChecker::new(field))
}

fn handle_to(field: &str, expected: RecordType) -> Box<dyn Checker> {
    Box::new(HandleFieldChecker::new(field, expected))
}

/// Rule requiring a non-empty field, the most common catalog entry.
fn field_rule(
    id: &str,
    record_type: RecordType,
    field: &str,
    err_msg: &str,
    action_msg: &str,
) -> Result<Rule> {
    Rule::builder(id)
        .for_type(record_type)
        .checks(vec![present(field)])
        .error(err_msg)
        .action(action_msg)
        .build()
}

/// Build every catalog rule in declaration order.
pub fn rules() -> Result<Vec<Rule>> {
    let mut rules = Vec::new();
    rules.extend(bios_rules()?);
    rules.extend(baseboard_rules()?);
    rules.extend(chassis_rules()?);
    rules.extend(processor_rules()?);
    Ok(rules)
}

/// Catalog minus `disabled` rule ids. Unknown ids are an error.
pub fn enabled_rules(disabled: &[String]) -> Result<Vec<Rule>> {
    let all = rules()?;
    for id in disabled {
        if !all.iter().any(|rule| rule.id() == id) {
            bail!("unknown rule id '{id}' in disabled_rules");
        }
    }
    Ok(all
        .into_iter()
        .filter(|rule| !disabled.iter().any(|id| id == rule.id()))
        .collect())
}

fn bios_rules() -> Result<Vec<Rule>> {
    Ok(vec![
        field_rule(
            "bios-vendor",
            RecordType::Bios,
            "Vendor",
            "ERROR: Invalid Vendor field in Type 0 (BIOS Information) record.",
            "ACTION: Please populate Vendor field with valid string.",
        )?,
        field_rule(
            "bios-version",
            RecordType::Bios,
            "Version",
            "ERROR: Invalid Version field in Type 0 (BIOS Information) record.",
            "ACTION: BIOS Version can be any string as long as it follows properly documented procedure.\n\
             If none available please follow the XX.YY.RR format.",
        )?,
        Rule::builder("bios-release-date")
            .for_type(RecordType::Bios)
            .checks(vec![
                present("Release Date"),
                matches("Release Date", DATE_REGEXP)?,
            ])
            .error("ERROR: Invalid Release Date field in Type 0 (BIOS Information) record.")
            .action(
                "ACTION: Please populate BIOS Release Date field with correct date (format is MM/DD/YYYY).",
            )
            .build()?,
        Rule::builder("bios-rom-size")
            .for_type(RecordType::Bios)
            .checks(vec![present("ROM Size"), matches("ROM Size", ROM_SIZE_REGEXP)?])
            .error("ERROR: Invalid ROM Size field in Type 0 (BIOS Information) record.")
            .action(
                "ACTION: Please populate BIOS ROM Size field with valid size.\n\
                 *BIOS ROM Size indicates the BIOS size not the flash part size.*",
            )
            .build()?,
    ])
}

fn baseboard_rules() -> Result<Vec<Rule>> {
    Ok(vec![
        field_rule(
            "baseboard-manufacturer",
            RecordType::Baseboard,
            "Manufacturer",
            "ERROR: Invalid Manufacturer field in Type 2 (Board Information) record.",
            "ACTION: Please populate Manufacturer field with valid string.",
        )?,
        field_rule(
            "baseboard-product-name",
            RecordType::Baseboard,
            "Product Name",
            "ERROR: Invalid Product field in Type 2 (Board Information) record.",
            "ACTION: Please populate Product field with valid string.",
        )?,
        field_rule(
            "baseboard-features",
            RecordType::Baseboard,
            "Features",
            "ERROR: Invalid Features field in Type 2 (Board Information) record.",
            "ACTION: Please populate Features field with valid feature flags.\n\
             Bit0 - 1 for Motherboard, 0 for daughter boards; Bit3 - 1 for replaceable board.",
        )?,
        Rule::builder("baseboard-location")
            .for_type(RecordType::Baseboard)
            .checks(vec![
                present("Location In Chassis"),
                matches("Location In Chassis", DEVPATH_REGEXP)?,
            ])
            .error("ERROR: Invalid Location In Chassis field in Type 2 (Board Information) record.")
            .action(
                "ACTION: Please populate Location In Chassis field with valid devpath.\n\
                 This field provides the devpath for the daughter board.",
            )
            .build()?,
        field_rule(
            "baseboard-chassis-handle",
            RecordType::Baseboard,
            "Chassis Handle",
            "ERROR: Invalid Chassis Handle in Type 2 (Board Information) record.",
            "ACTION: Please populate Chassis Handle field.",
        )?,
        Rule::builder("baseboard-contained-handles")
            .for_type(RecordType::Baseboard)
            .checks(vec![
                present("Contained Object Handles"),
                counted("Contained Object Handles"),
            ])
            .error(
                "ERROR: Invalid Contained Object Handles field in Type 2 (Board Information) record.",
            )
            .action("ACTION: Please populate Contained Object Handles field with valid handles.")
            .build()?,
    ])
}

fn chassis_rules() -> Result<Vec<Rule>> {
    Ok(vec![
        field_rule(
            "chassis-manufacturer",
            RecordType::Chassis,
            "Manufacturer",
            "ERROR: Invalid Manufacturer field in Type 3 (Chassis) record.",
            "ACTION: Please populate Manufacturer field with valid string.",
        )?,
        field_rule(
            "chassis-type",
            RecordType::Chassis,
            "Type",
            "ERROR: Invalid Type field in Type 3 (Chassis) record.",
            "ACTION: Please populate Type field with valid string.",
        )?,
        Rule::builder("chassis-lock")
            .for_type(RecordType::Chassis)
            .checks(vec![present("Lock"), one_of("Lock", CHASSIS_LOCK)])
            .error("ERROR: Invalid Lock field in Type 3 (Chassis) record.")
            .action(format!(
                "ACTION: Please populate Lock field with valid string.\nValid Lock Status: {}",
                CHASSIS_LOCK.join(", ")
            ))
            .build()?,
        Rule::builder("chassis-contained-elements")
            .for_type(RecordType::Chassis)
            .checks(vec![
                present("Contained Elements"),
                matches("Contained Elements", NUMBER_REGEXP)?,
            ])
            .error("ERROR: Invalid Contained Elements field in Type 3 (Chassis) record.")
            .action("ACTION: Please populate Contained Elements field with valid number.")
            .build()?,
    ])
}

fn processor_rules() -> Result<Vec<Rule>> {
    let mut rules = vec![
        field_rule(
            "processor-socket",
            RecordType::Processor,
            "Socket Designation",
            "ERROR: Invalid Socket Designation field in Type 4 (Processor Information) record.",
            "ACTION: Please populate Socket Designation field with valid string.",
        )?,
        Rule::builder("processor-type")
            .for_type(RecordType::Processor)
            .checks(vec![present("Type"), one_of("Type", PROCESSOR_TYPE)])
            .error("ERROR: Invalid Type field in Type 4 (Processor Information) record.")
            .action(format!(
                "ACTION: Please populate Type field with valid string.\nValid Processor Type(s): {}",
                PROCESSOR_TYPE.join(", ")
            ))
            .build()?,
        Rule::builder("processor-status")
            .for_type(RecordType::Processor)
            .checks(vec![present("Status"), one_of("Status", PROCESSOR_STATUS)])
            .error("ERROR: Invalid Status field in Type 4 (Processor Information) record.")
            .action(format!(
                "ACTION: Please populate Status field with valid string.\nValid Status: {}",
                PROCESSOR_STATUS.join(", ")
            ))
            .build()?,
    ];

    for level in ["L1", "L2", "L3"] {
        let field = format!("{level} Cache Handle");
        rules.push(
            Rule::builder(&format!("processor-{}-cache", level.to_lowercase()))
                .for_type(RecordType::Processor)
                .checks(vec![present(&field), handle_to(&field, RecordType::Cache)])
                .error(format!(
                    "ERROR: Invalid {field} field in Type 4 (Processor Information) record."
                ))
                .action(format!(
                    "ACTION: Please populate {field} field with valid handle."
                ))
                .build()?,
        );
    }

    for (id, field) in [
        ("processor-core-count", "Core Count"),
        ("processor-core-enabled", "Core Enabled"),
        ("processor-thread-count", "Thread Count"),
    ] {
        rules.push(
            Rule::builder(id)
                .for_type(RecordType::Processor)
                .checks(vec![present(field), matches(field, NUMBER_REGEXP)?])
                .error(format!(
                    "ERROR: Invalid {field} field in Type 4 (Processor Information) record."
                ))
                .action(format!(
                    "ACTION: Please populate {field} field with valid number."
                ))
                .build()?,
        );
    }

    Ok(rules)
}
