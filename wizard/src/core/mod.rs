//! Deterministic, pure logic for declarative flows.
//!
//! Core modules are free of I/O. They operate on the in-memory [`machine`]
//! definition and return deterministic outputs suitable for tests.

pub mod flags;
pub mod machine;
pub mod merge;
pub mod resolver;
pub mod schema;
pub mod traverse;
pub mod usage;
pub mod validate;
pub mod value;
