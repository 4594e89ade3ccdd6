//! Astro static site handler
//!
//! Moves an Astro SSG project from Pages to Workers static assets: installs
//! wrangler, writes `wrangler.jsonc` (backing up any existing one) and runs
//! the project's build to confirm it still works.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use autofix_core::{CommandRunner, CommandSpec};
use tracing::{debug, info, instrument, warn};

use crate::context::MigrationOptions;
use crate::detection::{Framework, ProjectDetector};
use crate::error::{MigrationError, Result};
use crate::manifest::PackageJson;
use crate::package_manager::{PackageManager, PackageManagerDetector};
use crate::result::{Changes, FileChange, MigrationResult, Validation, Warning, WarningKind};
use crate::traits::FrameworkHandler;
use crate::wrangler::{WranglerConfig, BACKUP_FILE, CONFIG_FILE};

const DRY_RUN_SUFFIX: &str = " [DRY RUN]";

/// Handler for `astro-ssg` projects
pub struct AstroSsgHandler {
    runner: Arc<dyn CommandRunner>,
    package_managers: PackageManagerDetector,
    detector: ProjectDetector,
    options: MigrationOptions,
}

impl AstroSsgHandler {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self::with_options(runner, MigrationOptions::default())
    }

    pub fn with_options(runner: Arc<dyn CommandRunner>, options: MigrationOptions) -> Self {
        Self {
            package_managers: PackageManagerDetector::new(runner.clone()),
            detector: ProjectDetector::new(),
            runner,
            options,
        }
    }

    /// Run every step, recording progress into `changes` and `warnings` so
    /// that a failure part-way still reports what was done.
    async fn run_pipeline(
        &self,
        project_path: &Path,
        build_command: &str,
        dry_run: bool,
        changes: &mut Changes,
        warnings: &mut Vec<Warning>,
    ) -> Result<Validation> {
        let suffix = if dry_run { DRY_RUN_SUFFIX } else { "" };

        // 1. Package manager
        let detected = self.package_managers.detect(project_path).await;
        if !detected.available {
            return Err(MigrationError::ToolNotFound {
                tool: detected.manager.to_string(),
            });
        }
        let manager = detected.manager;

        // 2. Framework
        let validation = self
            .detector
            .validate_framework(project_path, Framework::AstroSsg)
            .await;
        if !validation.valid {
            warn!(details = ?validation.warnings, "project does not look like Astro SSG");
            warnings.push(
                Warning::new(
                    WarningKind::FrameworkMismatch,
                    "Astro SSG dependencies not found in package.json",
                )
                .with_recommendation("Verify project uses Astro SSG")
                .with_details(validation.warnings.join(", ")),
            );
        }

        // 3. Wrangler dependency
        let dependency = if dry_run {
            format!("wrangler@latest (using {}){}", manager, DRY_RUN_SUFFIX)
        } else {
            self.install_wrangler(project_path, manager).await?
        };
        changes.dependencies_updated.push(dependency);

        // 4. Config document
        let config = WranglerConfig::new(
            self.project_name(project_path).await,
            self.options.effective_compatibility_date(),
            self.options.output_dir.clone(),
        );

        let document = config.to_json_pretty()?;

        // 5. Backup and write
        let config_path = project_path.join(CONFIG_FILE);
        let existed = tokio::fs::try_exists(&config_path).await.unwrap_or(false);

        if existed {
            if dry_run {
                warnings.push(
                    Warning::new(
                        WarningKind::ConfigBackup,
                        format!("Existing {} would be backed up", CONFIG_FILE),
                    )
                    .with_details(format!("Backup would be saved as {}{}", BACKUP_FILE, DRY_RUN_SUFFIX)),
                );
            } else {
                tokio::fs::copy(&config_path, project_path.join(BACKUP_FILE))
                    .await
                    .map_err(|e| {
                        MigrationError::context(format!("Failed to back up {}", CONFIG_FILE), e.to_string())
                    })?;
                info!(backup = BACKUP_FILE, "existing config backed up");
                warnings.push(
                    Warning::new(WarningKind::ConfigBackup, format!("Existing {} backed up", CONFIG_FILE))
                        .with_details(format!("Backup saved as {}", BACKUP_FILE)),
                );
            }
        }

        if !dry_run {
            tokio::fs::write(&config_path, &document)
                .await
                .map_err(|e| {
                    MigrationError::context(format!("Failed to write {}", CONFIG_FILE), e.to_string())
                })?;
            info!(path = %config_path.display(), "config written");
        }

        let assets = &self.options.output_dir;
        if existed {
            changes.files_modified.push(FileChange::new(
                CONFIG_FILE,
                format!(
                    "Updated Workers configuration with assets directory set to \"{}\"{}",
                    assets, suffix
                ),
            ));
        } else {
            changes.files_created.push(FileChange::new(
                CONFIG_FILE,
                format!(
                    "Generated Workers configuration with assets directory set to \"{}\"{}",
                    assets, suffix
                ),
            ));
        }

        // 6. Schema check of the document as written
        let issues = WranglerConfig::validate_document(&document);
        let config_valid = issues.is_empty();
        if !config_valid {
            warn!(?issues, "generated config failed validation");
            warnings.push(
                Warning::new(
                    WarningKind::ConfigValidation,
                    format!("Generated {} may have issues", CONFIG_FILE),
                )
                .with_recommendation("Review configuration manually")
                .with_details(issues.join(", ")),
            );
        }

        // 7. Build
        let (build_successful, build_output) = if dry_run {
            (true, "Build validation skipped in dry run".to_string())
        } else {
            self.run_build(project_path, build_command).await
        };

        Ok(Validation {
            config_valid,
            build_successful,
            build_output: Some(build_output),
        })
    }

    async fn install_wrangler(&self, project_path: &Path, manager: PackageManager) -> Result<String> {
        let outcome = self.package_managers.install_wrangler(project_path, manager).await;
        if !outcome.success {
            return Err(MigrationError::InstallFailed {
                output: outcome.output,
            });
        }

        Ok(match outcome.version {
            Some(version) => format!("wrangler@{} (using {})", version, manager),
            None => format!("wrangler@latest (using {})", manager),
        })
    }

    /// Declared package name, or the configured default
    async fn project_name(&self, project_path: &Path) -> String {
        match PackageJson::load(project_path).await {
            Ok(manifest) => manifest
                .project_name()
                .map(str::to_string)
                .unwrap_or_else(|| self.options.default_project_name.clone()),
            Err(e) => {
                debug!(error = %e, "using default project name");
                self.options.default_project_name.clone()
            }
        }
    }

    /// A build that cannot be started counts as a failed build
    async fn run_build(&self, project_path: &Path, build_command: &str) -> (bool, String) {
        let spec = CommandSpec::shell(build_command).current_dir(project_path);
        info!(command = %spec, "running build");

        match self.runner.run(&spec).await {
            Ok(output) => {
                if !output.success {
                    warn!(exit_code = ?output.exit_code, "build failed");
                }
                (output.success, output.combined())
            }
            Err(e) => {
                warn!(error = %e, "build could not run");
                (false, e.to_string())
            }
        }
    }
}

#[async_trait]
impl FrameworkHandler for AstroSsgHandler {
    fn framework(&self) -> Framework {
        Framework::AstroSsg
    }

    #[instrument(skip_all, fields(path = %project_path.display(), dry_run = dry_run))]
    async fn migrate(&self, project_path: &Path, build_command: &str, dry_run: bool) -> MigrationResult {
        let mut changes = Changes::default();
        let mut warnings = Vec::new();

        match self
            .run_pipeline(project_path, build_command, dry_run, &mut changes, &mut warnings)
            .await
        {
            Ok(validation) => {
                info!(
                    build_successful = validation.build_successful,
                    config_valid = validation.config_valid,
                    "migration completed"
                );
                MigrationResult::completed(changes, warnings, validation)
            }
            Err(e) => {
                warn!(error = %e, "migration aborted");
                MigrationResult::failed(changes, &e)
            }
        }
    }
}
