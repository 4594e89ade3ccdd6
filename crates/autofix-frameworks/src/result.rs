//! Migration result model
//!
//! [`MigrationResult`] is always fully populated: every change list exists
//! (possibly empty) and validation is defaulted to failed on early errors.

use serde::{Deserialize, Serialize};

/// Category of a non-fatal advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The requested framework was not detected in the project
    FrameworkMismatch,
    /// An existing config file was (or would be) backed up
    ConfigBackup,
    /// The generated config did not pass schema validation
    ConfigValidation,
    /// The migration aborted
    MigrationError,
}

/// Non-fatal advisory collected during a migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            recommendation: None,
            details: None,
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// A file created or modified by the migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Path relative to the project root
    pub path: String,
    pub summary: String,
}

impl FileChange {
    pub fn new(path: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            summary: summary.into(),
        }
    }
}

/// Everything the migration changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    pub files_created: Vec<FileChange>,
    pub files_modified: Vec<FileChange>,
    pub dependencies_updated: Vec<String>,
}

/// Post-migration checks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub config_valid: bool,
    pub build_successful: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_output: Option<String>,
}

/// Outcome of a framework handler run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationResult {
    pub success: bool,
    pub changes: Changes,
    pub warnings: Vec<Warning>,
    pub validation: Validation,
}

impl MigrationResult {
    /// Result for a pipeline that ran to completion
    pub fn completed(changes: Changes, warnings: Vec<Warning>, validation: Validation) -> Self {
        Self {
            success: true,
            changes,
            warnings,
            validation,
        }
    }

    /// Result for a pipeline that aborted with `error`.
    ///
    /// Keeps whatever changes were recorded before the failure; earlier
    /// advisories are replaced by a single `migration_error` warning.
    pub fn failed(changes: Changes, error: &dyn std::error::Error) -> Self {
        Self {
            success: false,
            changes,
            warnings: vec![Warning::new(WarningKind::MigrationError, error.to_string())
                .with_recommendation("Check error details and try again")],
            validation: Validation {
                config_valid: false,
                build_successful: false,
                build_output: Some(format!("Error: {}", error)),
            },
        }
    }
}
