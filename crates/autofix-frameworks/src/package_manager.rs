//! Package manager detection and dependency installation

use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use autofix_core::{CommandRunner, CommandSpec};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// JavaScript package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Pnpm,
    Yarn,
    Npm,
    Bun,
}

impl PackageManager {
    /// Executable name
    pub fn command(&self) -> &'static str {
        match self {
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Npm => "npm",
            Self::Bun => "bun",
        }
    }

    /// Arguments that add `package` to the project
    fn install_args(&self, package: &str) -> Vec<String> {
        let verb = match self {
            Self::Npm => "install",
            Self::Pnpm | Self::Yarn | Self::Bun => "add",
        };
        vec![verb.to_string(), package.to_string()]
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Lock files in priority order; the first one present wins
pub const LOCK_FILES: [(&str, PackageManager); 5] = [
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("package-lock.json", PackageManager::Npm),
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
];

/// Package the migration installs
pub const WRANGLER_PACKAGE: &str = "wrangler";

/// Outcome of package manager detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    pub manager: PackageManager,
    /// Lock file that decided the manager; `None` for the npm fallback
    pub lock_file: Option<String>,
    /// Whether `<manager> --version` ran successfully
    pub available: bool,
}

/// Outcome of installing wrangler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub success: bool,
    /// Combined stdout and stderr of the install command
    pub output: String,
    /// Installed version, when the package manager listing reveals it
    pub version: Option<String>,
}

/// Detects the package manager of a project and installs through it
#[derive(Clone)]
pub struct PackageManagerDetector {
    runner: Arc<dyn CommandRunner>,
}

impl PackageManagerDetector {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Detect the package manager used in the project.
    ///
    /// Never fails: a missing executable is reported as `available: false`.
    #[instrument(skip_all, fields(path = %project_path.display()))]
    pub async fn detect(&self, project_path: &Path) -> DetectionResult {
        for (lock_file, manager) in LOCK_FILES {
            let present = tokio::fs::try_exists(project_path.join(lock_file))
                .await
                .unwrap_or(false);
            if present {
                let available = self.is_available(project_path, manager).await;
                info!(%manager, lock_file, available, "package manager detected from lock file");
                return DetectionResult {
                    manager,
                    lock_file: Some(lock_file.to_string()),
                    available,
                };
            }
        }

        let manager = PackageManager::Npm;
        let available = self.is_available(project_path, manager).await;
        info!(%manager, available, "no lock file found, falling back to npm");
        DetectionResult {
            manager,
            lock_file: None,
            available,
        }
    }

    async fn is_available(&self, project_path: &Path, manager: PackageManager) -> bool {
        let spec = CommandSpec::new(manager.command())
            .arg("--version")
            .current_dir(project_path);

        match self.runner.run(&spec).await {
            Ok(output) => output.success,
            Err(e) => {
                debug!(%manager, error = %e, "package manager probe failed");
                false
            }
        }
    }

    /// Install the latest wrangler into the project.
    ///
    /// Never fails: install errors are reported through `success: false`.
    #[instrument(skip_all, fields(path = %project_path.display(), %manager))]
    pub async fn install_wrangler(
        &self,
        project_path: &Path,
        manager: PackageManager,
    ) -> InstallOutcome {
        let spec = CommandSpec::new(manager.command())
            .args(manager.install_args(&format!("{}@latest", WRANGLER_PACKAGE)))
            .current_dir(project_path);

        let output = match self.runner.run(&spec).await {
            Ok(output) if output.success => output,
            Ok(output) => {
                warn!(exit_code = ?output.exit_code, "wrangler install failed");
                return InstallOutcome {
                    success: false,
                    output: output.combined(),
                    version: None,
                };
            }
            Err(e) => {
                warn!(error = %e, "wrangler install could not run");
                return InstallOutcome {
                    success: false,
                    output: e.to_string(),
                    version: None,
                };
            }
        };

        let version = self.installed_version(project_path, manager).await;
        info!(version = ?version, "wrangler installed");

        InstallOutcome {
            success: true,
            output: output.combined(),
            version,
        }
    }

    /// Best-effort lookup of the installed wrangler version
    async fn installed_version(&self, project_path: &Path, manager: PackageManager) -> Option<String> {
        let spec = CommandSpec::new(manager.command())
            .args(["list", WRANGLER_PACKAGE])
            .current_dir(project_path);

        match self.runner.run(&spec).await {
            Ok(output) if output.success => extract_wrangler_version(&output.stdout),
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "version listing failed");
                None
            }
        }
    }
}

/// Pull `x.y.z` out of `wrangler@x.y.z` in package manager listing output
pub fn extract_wrangler_version(output: &str) -> Option<String> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"wrangler@(\d+\.\d+\.\d+)").ok())
        .as_ref()?;

    let raw = pattern.captures(output)?.get(1)?.as_str();
    semver::Version::parse(raw).ok().map(|v| v.to_string())
}
