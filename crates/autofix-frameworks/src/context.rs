//! Options that shape a migration run

use autofix_core::MigrationConfig;
use chrono::{NaiveDate, Utc};

use autofix_core::config::{DEFAULT_OUTPUT_DIR, DEFAULT_PROJECT_NAME};

/// Settings a handler applies when generating the Workers config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Assets directory bound in `wrangler.jsonc`
    pub output_dir: String,
    /// Worker name when the manifest declares none
    pub default_project_name: String,
    /// Fixed compatibility date; today (UTC) when `None`
    pub compatibility_date: Option<NaiveDate>,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            default_project_name: DEFAULT_PROJECT_NAME.to_string(),
            compatibility_date: None,
        }
    }
}

impl MigrationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from validated project configuration
    pub fn from_config(config: &MigrationConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            default_project_name: config.default_project_name.clone(),
            compatibility_date: config
                .compatibility_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_compatibility_date(mut self, date: NaiveDate) -> Self {
        self.compatibility_date = Some(date);
        self
    }

    /// Date written as `compatibility_date`
    pub fn effective_compatibility_date(&self) -> NaiveDate {
        self.compatibility_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = MigrationConfig {
            output_dir: "./build".to_string(),
            default_project_name: "docs".to_string(),
            compatibility_date: Some("2024-09-23".to_string()),
        };

        let options = MigrationOptions::from_config(&config);
        assert_eq!(options.output_dir, "./build");
        assert_eq!(options.default_project_name, "docs");
        assert_eq!(
            options.effective_compatibility_date(),
            NaiveDate::from_ymd_opt(2024, 9, 23).unwrap()
        );
    }

    #[test]
    fn test_defaults_to_today() {
        let options = MigrationOptions::new();
        assert_eq!(options.output_dir, "./dist");
        assert_eq!(options.effective_compatibility_date(), Utc::now().date_naive());
    }
}
