//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::{config_file_names, ENV_OUTPUT_DIR, ENV_TIMEOUT};
use super::types::Config;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find a configuration file in the directory or its parents.
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.is_file() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration for a project directory.
///
/// A missing file yields defaults; a file that exists but fails to parse or
/// validate is an error. Environment overrides are applied on top.
pub fn load_project_config(dir: &Path) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, path) = match find_config(dir) {
        Some(path) => (load_config(&path)?, Some(path)),
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config)?;
    Ok((config, path))
}

/// Apply `AUTOFIX_*` overrides read through `lookup`
pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
        debug!(output_dir = %dir, "output_dir overridden from environment");
        config.migration.output_dir = dir;
    }

    if let Some(raw) = lookup(ENV_TIMEOUT) {
        match raw.parse() {
            Ok(secs) => config.process.timeout_secs = secs,
            Err(_) => warn!(value = %raw, "ignoring non-numeric {}", ENV_TIMEOUT),
        }
    }
}
