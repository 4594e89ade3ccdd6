//! Exit codes for the CLI

/// Success
pub const SUCCESS: i32 = 0;

/// Conflict, unsupported framework, failed migration, or any other error
pub const ERROR: i32 = 1;
