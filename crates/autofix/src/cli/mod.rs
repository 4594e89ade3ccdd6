//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use autofix_frameworks::{ErrorOptions, ErrorType, MigrationOutput, MigrationOutputFormatter};

use crate::exit_codes;
use commands::PagesToWorkersCommand;

/// autofix - migrate Cloudflare Pages projects to Workers
#[derive(Debug, Parser)]
#[command(name = "autofix")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Migrate a Cloudflare Pages project to Workers
    PagesToWorkers(PagesToWorkersCommand),
}

impl Cli {
    /// Whether detailed logging was requested
    pub fn verbose(&self) -> bool {
        match self.command {
            Commands::PagesToWorkers(ref cmd) => cmd.verbose,
        }
    }

    /// Execute the CLI command, returning the process exit code
    pub fn execute(self) -> i32 {
        match self.command {
            Commands::PagesToWorkers(ref cmd) => cmd.execute(&self),
        }
    }
}

/// Report a command-line error and return the exit code.
///
/// Help and version requests print as usual; everything else becomes an
/// `invalid_arguments` envelope on stdout.
pub fn report_parse_error(err: clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => err.exit(),
        _ => {
            println!("{}", parse_error_output(&err).render());
            exit_codes::ERROR
        }
    }
}

fn parse_error_output(err: &clap::Error) -> MigrationOutput {
    MigrationOutputFormatter::new().format_error(
        ErrorType::InvalidArguments,
        parse_error_message(err),
        ErrorOptions::new().with_recommendation("Run with --help to see valid arguments"),
    )
}

/// First line of clap's rendering, without the `error:` prefix
fn parse_error_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use autofix_frameworks::Framework;

    #[test]
    fn test_parses_full_command() {
        let cli = Cli::try_parse_from([
            "autofix",
            "-C",
            "/tmp/site",
            "pages-to-workers",
            "--framework",
            "astro-ssg",
            "--pages-build-command",
            "bun run build",
            "--pages-output-dir",
            "./out",
            "--force",
            "--dry-run",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(cli.directory, Some(PathBuf::from("/tmp/site")));
        assert!(cli.verbose());
        let Commands::PagesToWorkers(cmd) = cli.command;
        assert_eq!(cmd.framework, Framework::AstroSsg);
        assert_eq!(cmd.pages_build_command, "bun run build");
        assert_eq!(cmd.pages_output_dir.as_deref(), Some("./out"));
        assert!(cmd.force);
        assert!(cmd.dry_run);
    }

    #[test]
    fn test_unknown_framework_is_rejected() {
        let err = Cli::try_parse_from([
            "autofix",
            "pages-to-workers",
            "--framework",
            "gatsby",
            "--pages-build-command",
            "npm run build",
        ])
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        let message = parse_error_message(&err);
        assert!(!message.starts_with("error:"));
        assert!(message.contains("Invalid framework: gatsby"));
    }

    #[test]
    fn test_build_command_is_required() {
        let err = Cli::try_parse_from(["autofix", "pages-to-workers", "--framework", "astro-ssg"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_invalid_arguments_envelope() {
        let err = Cli::try_parse_from([
            "autofix",
            "pages-to-workers",
            "--framework",
            "gatsby",
            "--pages-build-command",
            "npm run build",
        ])
        .unwrap_err();

        let json: serde_json::Value =
            serde_json::from_str(&parse_error_output(&err).render()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error_type"], "invalid_arguments");
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("Invalid framework: gatsby. Must be one of: astro-ssg"));
        assert_eq!(json["recommendation"], "Run with --help to see valid arguments");
        assert!(json.get("detected_frameworks").is_none());
    }

    #[test]
    fn test_invalid_arguments_exit_code() {
        let err = Cli::try_parse_from(["autofix", "pages-to-workers", "--bogus"]).unwrap_err();
        assert_eq!(report_parse_error(err), exit_codes::ERROR);
    }
}
