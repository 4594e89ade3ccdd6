//! Framework handler trait

use std::path::Path;

use async_trait::async_trait;

use crate::detection::Framework;
use crate::result::MigrationResult;

/// Migrates one framework's Pages project to Workers.
///
/// `migrate` never returns an error: failures are folded into a
/// [`MigrationResult`] with `success: false`. Under `dry_run` nothing on disk
/// is touched and no install or build command is run.
#[async_trait]
pub trait FrameworkHandler: Send + Sync {
    /// Framework this handler migrates
    fn framework(&self) -> Framework;

    /// Run the migration for the project at `project_path`
    async fn migrate(&self, project_path: &Path, build_command: &str, dry_run: bool) -> MigrationResult;
}
