//! Structured output for the migration command
//!
//! Every invocation prints exactly one JSON object: a success envelope built
//! from a [`MigrationResult`], or an error envelope. Formatting is pure and
//! cannot fail.

use serde::{Deserialize, Serialize};

use crate::detection::Framework;
use crate::result::{Changes, MigrationResult, Validation, Warning};

/// Category of an error envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// More than one framework detected without `--force`
    FrameworkConflict,
    /// Framework is detected but has no handler
    FrameworkNotImplemented,
    /// The handler reported `success: false`
    MigrationFailed,
    /// Any other error reaching the command boundary
    UnexpectedError,
    /// Command line could not be parsed
    InvalidArguments,
    /// Project configuration file is invalid
    InvalidConfig,
}

/// Envelope for a completed migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessOutput {
    pub framework: Framework,
    pub changes: Changes,
    pub validation: Validation,
    pub warnings: Vec<Warning>,
    pub summary: String,
}

/// Envelope for anything that stopped the migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorOutput {
    pub error_type: ErrorType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_frameworks: Option<Vec<Framework>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// The single object written to stdout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MigrationOutput {
    Success(SuccessOutput),
    Error(ErrorOutput),
}

impl MigrationOutput {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Pretty-printed JSON
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            serde_json::json!({
                "status": "error",
                "error_type": ErrorType::UnexpectedError,
                "message": format!("Failed to serialize output: {}", e),
            })
            .to_string()
        })
    }
}

/// Optional fields of an error envelope
#[derive(Debug, Clone, Default)]
pub struct ErrorOptions {
    pub detected_frameworks: Option<Vec<Framework>>,
    pub recommendation: Option<String>,
}

impl ErrorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detected_frameworks(mut self, frameworks: Vec<Framework>) -> Self {
        self.detected_frameworks = Some(frameworks);
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// Builds output envelopes
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationOutputFormatter;

impl MigrationOutputFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_success(&self, framework: Framework, result: MigrationResult) -> MigrationOutput {
        let summary = summarize(framework, &result);
        MigrationOutput::Success(SuccessOutput {
            framework,
            changes: result.changes,
            validation: result.validation,
            warnings: result.warnings,
            summary,
        })
    }

    pub fn format_error(
        &self,
        error_type: ErrorType,
        message: impl Into<String>,
        options: ErrorOptions,
    ) -> MigrationOutput {
        MigrationOutput::Error(ErrorOutput {
            error_type,
            message: message.into(),
            detected_frameworks: options.detected_frameworks,
            recommendation: options.recommendation,
        })
    }
}

fn summarize(framework: Framework, result: &MigrationResult) -> String {
    let changes = &result.changes;
    let mut actions = Vec::new();

    if !changes.files_created.is_empty() {
        actions.push(format!("created {} file(s)", changes.files_created.len()));
    }
    if !changes.files_modified.is_empty() {
        actions.push(format!("modified {} file(s)", changes.files_modified.len()));
    }
    if !changes.dependencies_updated.is_empty() {
        actions.push(format!(
            "updated {} dependency(ies)",
            changes.dependencies_updated.len()
        ));
    }

    let build = if result.validation.build_successful {
        "build passed"
    } else {
        "build failed"
    };
    let config = if result.validation.config_valid {
        "config valid"
    } else {
        "config issues"
    };

    format!(
        "Successfully migrated {} project to Workers: {} ({}, {})",
        framework,
        actions.join(", "),
        build,
        config
    )
}
