//! Error types for detection and migration

use std::path::PathBuf;

use thiserror::Error;

/// Result type for migration operations
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Detection and migration errors
#[derive(Error, Debug)]
pub enum MigrationError {
    /// package.json could not be read
    #[error("Failed to read package.json at {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// package.json is not valid JSON of the expected shape
    #[error("Failed to parse package.json at {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// Package manager executable is not available
    #[error("Package manager {tool} not found in PATH")]
    ToolNotFound { tool: String },

    /// Dependency installation failed
    #[error("Failed to install wrangler: {output}")]
    InstallFailed { output: String },

    /// Generic error with context
    #[error("{context}: {message}")]
    Context { context: String, message: String },
}

impl MigrationError {
    /// Create a context error
    pub fn context(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            message: message.into(),
        }
    }
}
