//! Autofix Frameworks - detection and migration handlers
//!
//! This crate inspects a JavaScript web project, works out which framework
//! and package manager it uses, and migrates its deployment setup from
//! Cloudflare Pages to Workers.
//!
//! ## Pipeline
//!
//! 1. [`PackageManagerDetector`] picks the package manager from lock files
//! 2. [`ProjectDetector`] guesses the framework(s) from `package.json`
//! 3. A [`FrameworkHandler`] from the [`HandlerRegistry`] performs the migration
//! 4. [`MigrationOutputFormatter`] turns the outcome into the JSON envelope
//!
//! Only `astro-ssg` has a handler today. Other frameworks are detected so
//! that conflicts can be reported, but are rejected at dispatch.

pub mod context;
pub mod detection;
pub mod error;
pub mod frameworks;
pub mod manifest;
pub mod output;
pub mod package_manager;
pub mod registry;
pub mod result;
pub mod traits;
pub mod wrangler;

pub use context::MigrationOptions;
pub use detection::{Confidence, Framework, FrameworkDetection, FrameworkValidation, ProjectDetector};
pub use error::{MigrationError, Result};
pub use frameworks::AstroSsgHandler;
pub use manifest::PackageJson;
pub use output::{
    ErrorOptions, ErrorOutput, ErrorType, MigrationOutput, MigrationOutputFormatter, SuccessOutput,
};
pub use package_manager::{DetectionResult, InstallOutcome, PackageManager, PackageManagerDetector};
pub use registry::HandlerRegistry;
pub use result::{Changes, FileChange, MigrationResult, Validation, Warning, WarningKind};
pub use traits::FrameworkHandler;
pub use wrangler::WranglerConfig;
