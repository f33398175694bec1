//! Deterministic, pure logic of the rule engine.
//!
//! Core modules must be free of I/O side effects. They operate on an
//! in-memory [`RecordSet`](crate::record::RecordSet) and return deterministic
//! outputs suitable for tests.

pub mod checker;
pub mod constants;
pub mod error_bucket;
pub mod matcher;
pub mod memory_groups;
pub mod presence;
pub mod rule;
pub mod validator;
