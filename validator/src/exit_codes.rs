//! Stable exit codes for validator CLI commands.

/// Command succeeded; for `validate`, the dump is compliant.
pub const OK: i32 = 0;
/// Command failed due to unreadable input, invalid config, or other errors.
pub const INVALID: i32 = 1;
/// `validate` found at least one compliance error.
pub const NONCOMPLIANT: i32 = 2;
