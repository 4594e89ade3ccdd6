//! Configuration validation

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_migration(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_migration(config: &Config) -> Result<()> {
    if config.migration.output_dir.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "migration.output_dir".to_string(),
            message: "output directory cannot be empty".to_string(),
        }
        .into());
    }

    if config.migration.default_project_name.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "migration.default_project_name".to_string(),
            message: "project name cannot be empty".to_string(),
        }
        .into());
    }

    if let Some(ref date) = config.migration.compatibility_date {
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(ConfigError::InvalidValue {
                field: "migration.compatibility_date".to_string(),
                message: format!("'{}' is not a YYYY-MM-DD date", date),
            }
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_project_name_rejected() {
        let mut config = Config::default();
        config.migration.default_project_name = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_compatibility_date_format() {
        let mut config = Config::default();
        config.migration.compatibility_date = Some("2024-09-23".to_string());
        assert!(validate_config(&config).is_ok());

        config.migration.compatibility_date = Some("23/09/2024".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("migration.compatibility_date"));
    }
}
