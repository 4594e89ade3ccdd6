//! Autofix Core - shared foundation for the autofix migration tool
//!
//! This crate provides error handling, project configuration, and the
//! external command abstraction used by the migration pipeline.

pub mod config;
pub mod error;
pub mod process;

pub use config::{Config, MigrationConfig, ProcessConfig};
pub use error::{AutofixError, ConfigError, ProcessError, Result};
pub use process::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};

#[cfg(any(test, feature = "test-util"))]
pub use process::ScriptedRunner;
