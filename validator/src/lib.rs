//! SMBIOS compliance validation.
//!
//! Parsed SMBIOS records are checked against a declarative rule catalog and a
//! set of whole-table consistency checks. Findings are collected into an
//! [`ErrorBucket`](core::error_bucket::ErrorBucket) keyed by record handle.
//!
//! - **[`core`]**: Pure, deterministic engine (matchers, checkers, validators,
//!   rules, error bucket). No I/O.
//! - **[`io`]**: Side-effecting helpers (dmidecode parsing, config files).
//!
//! [`validate`] orchestrates a run; [`catalog`] holds the rules; [`report`]
//! renders the result.

pub mod catalog;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod record;
pub mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
