//! Framework handler implementations
//!
//! One handler per supported framework. Frameworks without a handler are
//! still detected, but rejected when dispatched.

pub mod astro_ssg;

pub use astro_ssg::AstroSsgHandler;

use std::sync::Arc;

use autofix_core::CommandRunner;

use crate::context::MigrationOptions;
use crate::registry::HandlerRegistry;

/// Register all built-in framework handlers
pub fn register_all(
    registry: &mut HandlerRegistry,
    runner: Arc<dyn CommandRunner>,
    options: &MigrationOptions,
) {
    registry.register(AstroSsgHandler::with_options(runner, options.clone()));
}
