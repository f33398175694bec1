//! I/O helpers: dump parsing and configuration files.

pub mod config;
pub mod dmidecode;
