//! Configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults::{DEFAULT_OUTPUT_DIR, DEFAULT_PROJECT_NAME};

/// Main configuration for autofix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Migration settings
    pub migration: MigrationConfig,

    /// External process settings
    pub process: ProcessConfig,
}

/// Settings that shape the generated Workers configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Directory bound as the Workers static assets directory
    pub output_dir: String,

    /// Worker name used when package.json has no `name`
    pub default_project_name: String,

    /// Fixed compatibility date (`YYYY-MM-DD`); today's date when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility_date: Option<String>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            default_project_name: DEFAULT_PROJECT_NAME.to_string(),
            compatibility_date: None,
        }
    }
}

/// Settings for package manager and build subprocesses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Timeout for each external command in seconds (0 = no timeout)
    pub timeout_secs: u64,
}

impl ProcessConfig {
    /// Effective timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
