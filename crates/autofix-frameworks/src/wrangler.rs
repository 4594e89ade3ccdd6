//! Workers configuration document (`wrangler.jsonc`)
//!
//! Only the static-assets shape is generated:
//!
//! ```json
//! { "name": "...", "compatibility_date": "YYYY-MM-DD", "assets": { "directory": "./dist" } }
//! ```
//!
//! The older Pages shape with `pages_build_output_dir` is not produced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MigrationError, Result};

/// Config file name at the project root
pub const CONFIG_FILE: &str = "wrangler.jsonc";

/// Backup written before an existing config is overwritten
pub const BACKUP_FILE: &str = "wrangler.jsonc.backup";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Generated Workers configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WranglerConfig {
    pub name: String,
    pub compatibility_date: String,
    pub assets: AssetsConfig,
}

/// Static assets binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetsConfig {
    pub directory: String,
}

impl WranglerConfig {
    pub fn new(name: impl Into<String>, compatibility_date: NaiveDate, directory: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            compatibility_date: compatibility_date.format(DATE_FORMAT).to_string(),
            assets: AssetsConfig {
                directory: directory.into(),
            },
        }
    }

    /// Pretty-printed JSON, as written to disk
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            MigrationError::context(format!("Failed to serialize {}", CONFIG_FILE), e.to_string())
        })
    }

    /// Schema problems with a `wrangler.jsonc` document; empty when valid
    pub fn validate_document(content: &str) -> Vec<String> {
        match serde_json::from_str::<WranglerConfig>(content) {
            Ok(config) => config.validate(),
            Err(e) => vec![format!("does not match schema: {}", e)],
        }
    }

    /// Field-level problems with this config; empty when valid
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push("name must not be empty".to_string());
        }

        if NaiveDate::parse_from_str(&self.compatibility_date, DATE_FORMAT).is_err() {
            issues.push(format!(
                "compatibility_date '{}' is not a YYYY-MM-DD date",
                self.compatibility_date
            ));
        }

        if self.assets.directory.trim().is_empty() {
            issues.push("assets.directory must not be empty".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_generated_shape() {
        let config = WranglerConfig::new("blog", date(), "./dist");
        let value: serde_json::Value =
            serde_json::from_str(&config.to_json_pretty().unwrap()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "name": "blog",
                "compatibility_date": "2025-03-14",
                "assets": { "directory": "./dist" }
            })
        );
        assert!(value.get("pages_build_output_dir").is_none());
    }

    #[test]
    fn test_valid_config() {
        assert!(WranglerConfig::new("blog", date(), "./dist").validate().is_empty());
    }

    #[test]
    fn test_invalid_fields_reported() {
        let mut config = WranglerConfig::new(" ", date(), "");
        config.compatibility_date = "March 14".to_string();

        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues[1].contains("March 14"));
    }

    #[test]
    fn test_legacy_shape_rejected() {
        let legacy = r#"{ "name": "blog", "compatibility_date": "2025-03-14", "pages_build_output_dir": "./dist" }"#;
        let issues = WranglerConfig::validate_document(legacy);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("does not match schema"));
    }

    #[test]
    fn test_written_document_validates() {
        let document = WranglerConfig::new("blog", date(), "./dist").to_json_pretty().unwrap();
        assert!(WranglerConfig::validate_document(&document).is_empty());
    }

    #[test]
    fn test_document_field_issues_reported() {
        let document = r#"{ "name": "", "compatibility_date": "2025-03-14", "assets": { "directory": "./dist" } }"#;
        assert_eq!(
            WranglerConfig::validate_document(document),
            vec!["name must not be empty".to_string()]
        );
    }
}
