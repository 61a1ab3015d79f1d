//! Stable exit codes for wizard binaries.

/// The flow completed, or `--help`/`--schema` was answered.
pub const OK: i32 = 0;
/// A value was missing or invalid, or the command line/config could not be read.
pub const INVALID: i32 = 1;
/// A task failed and the flow had no error branch for it.
pub const TASK_FAILED: i32 = 2;
/// The user cancelled an interactive prompt.
pub const CANCELLED: i32 = 130;
