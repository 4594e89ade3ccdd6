//! package.json handling

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{MigrationError, Result};

/// Manifest file name at the project root
pub const MANIFEST_FILE: &str = "package.json";

/// The parts of package.json the migration cares about
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    /// Package name; anything but a string is treated as absent
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Dependencies
    #[serde(default, deserialize_with = "lenient_map")]
    pub dependencies: BTreeMap<String, String>,

    /// Dev dependencies
    #[serde(default, deserialize_with = "lenient_map")]
    pub dev_dependencies: BTreeMap<String, String>,

    /// Scripts
    #[serde(default, deserialize_with = "lenient_map")]
    pub scripts: BTreeMap<String, String>,
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// `null` or a non-object section reads as empty; non-string values keep
/// their JSON text so the key still counts as present
fn lenient_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect(),
        _ => BTreeMap::new(),
    })
}

impl PackageJson {
    /// Read and parse `package.json` in `project_path`
    pub async fn load(project_path: &Path) -> Result<Self> {
        let path = project_path.join(MANIFEST_FILE);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| MigrationError::ManifestRead {
                path: path.clone(),
                source,
            })?;

        Self::parse(&content).map_err(|e| MigrationError::ManifestParse {
            path,
            message: e.to_string(),
        })
    }

    /// Parse manifest content
    pub fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// `dependencies` and `devDependencies` merged; dev entries win on clashes
    pub fn all_dependencies(&self) -> BTreeMap<&str, &str> {
        self.dependencies
            .iter()
            .chain(self.dev_dependencies.iter())
            .map(|(name, version)| (name.as_str(), version.as_str()))
            .collect()
    }

    /// Non-empty package name, if declared
    pub fn project_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}
