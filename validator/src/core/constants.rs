//! Field value patterns and allowed enumerations used by the rule catalog.

/// `MM/DD/YYYY`.
pub const DATE_REGEXP: &str = r"(0[1-9]|1[0-2])/(0[1-9]|[12][0-9]|3[01])/[0-9]{4}";
/// Decimal number.
pub const NUMBER_REGEXP: &str = r"[0-9]+";
/// Size with a unit, e.g. `64 kB` or `32 MB`.
pub const ROM_SIZE_REGEXP: &str = r"\d+ [kmgKMG]B";
/// Physical devpath, e.g. `/phys/PE0:device:nic`.
pub const DEVPATH_REGEXP: &str = r"/phys(/\S*)?";

pub const CHASSIS_LOCK: &[&str] = &["Present", "Not Present"];

pub const PROCESSOR_TYPE: &[&str] = &[
    "Other",
    "Unknown",
    "Central Processor",
    "Math Processor",
    "DSP Processor",
    "Video Processor",
];

pub const PROCESSOR_STATUS: &[&str] = &[
    "Unpopulated",
    "Populated, Enabled",
    "Populated, Disabled By User",
    "Populated, Disabled By BIOS",
    "Populated, Idle",
    "Populated, Other",
];

/// Group name prefix of a memory die association, e.g. `die0`.
pub const DIE_GROUP_PREFIX: &str = "die";
/// Group name prefix of an integrated memory controller association, e.g. `IMC1`.
pub const CONTROLLER_GROUP_PREFIX: &str = "IMC";
