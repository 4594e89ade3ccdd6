//! Error types for autofix

use thiserror::Error;

/// Result type alias using AutofixError
pub type Result<T> = std::result::Result<T, AutofixError>;

/// Main error type for autofix core operations
#[derive(Debug, Error)]
pub enum AutofixError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while running an external command
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be started
    #[error("Failed to spawn '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },

    /// The command did not finish within the configured timeout
    #[error("Command '{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_error_messages() {
        let err = ProcessError::SpawnFailed {
            command: "bun --version".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to spawn 'bun --version': No such file or directory"
        );

        let err = ProcessError::Timeout {
            command: "npm run build".to_string(),
            seconds: 30.0,
        };
        assert_eq!(err.to_string(), "Command 'npm run build' timed out after 30s");

        let err = ProcessError::Timeout {
            command: "npm run build".to_string(),
            seconds: 0.25,
        };
        assert_eq!(err.to_string(), "Command 'npm run build' timed out after 0.25s");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: AutofixError = ConfigError::InvalidValue {
            field: "migration.output_dir".to_string(),
            message: "cannot be empty".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: migration.output_dir - cannot be empty"
        );
    }
}
