//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "autofix.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "autofix.yaml";

/// Default assets directory for static builds
pub const DEFAULT_OUTPUT_DIR: &str = "./dist";

/// Worker name used when the manifest has none
pub const DEFAULT_PROJECT_NAME: &str = "my-astro-app";

/// Environment variable overriding `migration.output_dir`
pub const ENV_OUTPUT_DIR: &str = "AUTOFIX_OUTPUT_DIR";

/// Environment variable overriding `process.timeout_secs`
pub const ENV_TIMEOUT: &str = "AUTOFIX_TIMEOUT";

/// Get list of config file names to search for, in priority order
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".autofix.toml",
        ".autofix.yaml",
    ]
}

/// Commented configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# autofix configuration

[migration]
# Directory bound as the Workers static assets directory
output_dir = "./dist"
# Worker name used when package.json has no "name"
default_project_name = "my-astro-app"
# compatibility_date = "2025-01-01"

[process]
# Timeout for install and build commands in seconds (0 = none)
timeout_secs = 0
"#;
