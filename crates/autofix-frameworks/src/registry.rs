//! Framework handler registry
//!
//! Maps each [`Framework`] to the handler that migrates it. Frameworks
//! without an entry are detected but cannot be migrated.

use std::collections::HashMap;
use std::sync::Arc;

use autofix_core::CommandRunner;
use tracing::debug;

use crate::context::MigrationOptions;
use crate::detection::Framework;
use crate::traits::FrameworkHandler;

/// Registry of framework handlers
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<Framework, Arc<dyn FrameworkHandler>>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in handlers
    pub fn with_builtins(runner: Arc<dyn CommandRunner>, options: &MigrationOptions) -> Self {
        let mut registry = Self::empty();
        crate::frameworks::register_all(&mut registry, runner, options);
        registry
    }

    /// Register a handler, replacing any previous one for the same framework
    pub fn register<H: FrameworkHandler + 'static>(&mut self, handler: H) {
        let framework = handler.framework();
        debug!(%framework, "registering framework handler");
        self.handlers.insert(framework, Arc::new(handler));
    }

    /// Get the handler for a framework
    pub fn get(&self, framework: Framework) -> Option<Arc<dyn FrameworkHandler>> {
        self.handlers.get(&framework).cloned()
    }

    /// Frameworks with a handler, in declaration order
    pub fn frameworks(&self) -> Vec<Framework> {
        Framework::ALL
            .into_iter()
            .filter(|f| self.handlers.contains_key(f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autofix_core::ScriptedRunner;

    #[test]
    fn test_builtins_cover_astro_ssg_only() {
        let registry =
            HandlerRegistry::with_builtins(Arc::new(ScriptedRunner::new()), &MigrationOptions::new());

        assert_eq!(registry.frameworks(), vec![Framework::AstroSsg]);
        assert!(registry.get(Framework::AstroSsg).is_some());
        assert!(registry.get(Framework::Remix).is_none());
        assert!(registry.get(Framework::SvelteSsr).is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = HandlerRegistry::empty();
        assert!(registry.frameworks().is_empty());
    }
}
