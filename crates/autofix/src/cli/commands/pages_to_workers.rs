//! Pages-to-Workers command
//!
//! Validates the request, refuses ambiguous projects, dispatches to the
//! framework's handler and prints exactly one JSON envelope on stdout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use tracing::{info, instrument, warn};

use autofix_core::config::load_project_config;
use autofix_core::{CommandRunner, Config, SystemRunner};
use autofix_frameworks::{
    ErrorOptions, ErrorType, Framework, HandlerRegistry, MigrationOptions, MigrationOutput,
    MigrationOutputFormatter, ProjectDetector,
};

use crate::cli::{output, Cli};
use crate::exit_codes;

/// Migrate a Cloudflare Pages project to Workers
#[derive(Debug, Args)]
pub struct PagesToWorkersCommand {
    /// Framework to migrate
    #[arg(long)]
    pub framework: Framework,

    /// Build command used by the Pages project
    #[arg(long)]
    pub pages_build_command: String,

    /// Assets directory for the Workers config (overrides config and environment)
    #[arg(long)]
    pub pages_output_dir: Option<String>,

    /// Migrate even if multiple frameworks are detected
    #[arg(long)]
    pub force: bool,

    /// Preview changes without modifying files
    #[arg(long)]
    pub dry_run: bool,

    /// Enable detailed logging
    #[arg(long)]
    pub verbose: bool,
}

impl PagesToWorkersCommand {
    /// Execute the command, returning the process exit code
    pub fn execute(&self, cli: &Cli) -> i32 {
        info!(
            framework = %self.framework,
            dry_run = self.dry_run,
            force = self.force,
            "executing pages-to-workers command"
        );

        let formatter = MigrationOutputFormatter::new();
        let output = match self.prepare(cli) {
            Ok((project_path, config)) => {
                let runner: Arc<dyn CommandRunner> =
                    Arc::new(SystemRunner::new().with_timeout(config.process.timeout()));
                match tokio::runtime::Runtime::new() {
                    Ok(runtime) => runtime.block_on(self.run(&project_path, runner, &config)),
                    Err(e) => unexpected(&formatter, &anyhow::Error::from(e)),
                }
            }
            Err(output) => *output,
        };

        emit(&output)
    }

    /// Resolve the project directory and load its configuration
    fn prepare(&self, cli: &Cli) -> Result<(PathBuf, Config), Box<MigrationOutput>> {
        let formatter = MigrationOutputFormatter::new();

        let project_path = resolve_project_path(cli.directory.as_deref())
            .map_err(|e| Box::new(unexpected(&formatter, &e)))?;

        if self.dry_run {
            output::warning("DRY RUN: No files will be modified");
        }

        if self.verbose {
            output::info(&output::key_value(
                "Project path",
                &output::path_style()
                    .apply_to(project_path.display())
                    .to_string(),
            ));
            output::info(&output::key_value("Framework", self.framework.as_str()));
            output::info(&output::key_value("Build command", &self.pages_build_command));
        }

        let config = self.load_config(&project_path)?;
        Ok((project_path, config))
    }

    /// Load the project's configuration; an invalid file becomes an
    /// `invalid_config` envelope
    fn load_config(&self, project_path: &Path) -> Result<Config, Box<MigrationOutput>> {
        let (config, config_path) = load_project_config(project_path).map_err(|e| {
            warn!(error = %e, "invalid project configuration");
            Box::new(MigrationOutputFormatter::new().format_error(
                ErrorType::InvalidConfig,
                e.to_string(),
                ErrorOptions::new().with_recommendation("Fix the autofix configuration file and try again"),
            ))
        })?;

        if self.verbose {
            if let Some(path) = config_path {
                output::info(&output::key_value("Config", &path.display().to_string()));
            }
        }

        Ok(config)
    }

    /// Run the migration against `project_path`, never failing outward
    pub async fn run(
        &self,
        project_path: &Path,
        runner: Arc<dyn CommandRunner>,
        config: &Config,
    ) -> MigrationOutput {
        let formatter = MigrationOutputFormatter::new();
        match self.migrate(project_path, runner, config, &formatter).await {
            Ok(output) => output,
            Err(e) => unexpected(&formatter, &e),
        }
    }

    #[instrument(skip_all, fields(path = %project_path.display(), framework = %self.framework))]
    async fn migrate(
        &self,
        project_path: &Path,
        runner: Arc<dyn CommandRunner>,
        config: &Config,
        formatter: &MigrationOutputFormatter,
    ) -> anyhow::Result<MigrationOutput> {
        let detections = ProjectDetector::new().detect_frameworks(project_path).await?;

        if detections.len() > 1 && !self.force {
            let detected: Vec<Framework> = detections.iter().map(|d| d.framework).collect();
            warn!(?detected, "multiple frameworks detected");
            return Ok(formatter.format_error(
                ErrorType::FrameworkConflict,
                "Multiple frameworks detected",
                ErrorOptions::new()
                    .with_detected_frameworks(detected)
                    .with_recommendation("Re-run with --framework flag and --force option"),
            ));
        }

        let mut options = MigrationOptions::from_config(&config.migration);
        if let Some(ref dir) = self.pages_output_dir {
            options = options.with_output_dir(dir.clone());
        }

        let registry = HandlerRegistry::with_builtins(runner, &options);
        let Some(handler) = registry.get(self.framework) else {
            return Ok(formatter.format_error(
                ErrorType::FrameworkNotImplemented,
                format!("Framework {} is not yet implemented", self.framework),
                ErrorOptions::new().with_recommendation(format!(
                    "Currently only {} is supported",
                    supported_list(&registry.frameworks())
                )),
            ));
        };

        let result = handler
            .migrate(project_path, &self.pages_build_command, self.dry_run)
            .await;

        if result.success {
            return Ok(formatter.format_success(self.framework, result));
        }

        if self.verbose {
            output::error("Migration failed with details:");
            eprintln!("Warnings: {}", serde_json::to_string_pretty(&result.warnings)?);
            eprintln!("Validation: {}", serde_json::to_string_pretty(&result.validation)?);
        }

        Ok(formatter.format_error(
            ErrorType::MigrationFailed,
            "Migration failed",
            ErrorOptions::new().with_recommendation("Check error details in validation output"),
        ))
    }
}

fn resolve_project_path(directory: Option<&Path>) -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match directory {
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

fn supported_list(frameworks: &[Framework]) -> String {
    frameworks
        .iter()
        .map(Framework::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn unexpected(formatter: &MigrationOutputFormatter, err: &anyhow::Error) -> MigrationOutput {
    warn!(error = %err, "unexpected error");
    formatter.format_error(
        ErrorType::UnexpectedError,
        err.to_string(),
        ErrorOptions::new().with_recommendation("Check command arguments and try again"),
    )
}

/// Print the envelope and pick the exit code
fn emit(output: &MigrationOutput) -> i32 {
    println!("{}", output.render());
    exit_code(output)
}

fn exit_code(output: &MigrationOutput) -> i32 {
    if output.is_success() {
        exit_codes::SUCCESS
    } else {
        exit_codes::ERROR
    }
}
