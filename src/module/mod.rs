//! Application module management
//!
//! Modules are coarse-grained application units (an admin section, an API
//! surface) set up once at bootstrap from their config section.

use log::info;
use serde_json::Value as JsonValue;

use crate::core::{AppResult, ComponentRegistry};

/// Ordered collection of configured modules, set up through the registry.
#[derive(Default)]
pub struct ModuleManager {
    modules: Vec<(String, JsonValue)>,
}

impl ModuleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module with its configuration data.
    pub fn add_module(&mut self, ident: impl Into<String>, config: JsonValue) -> &mut Self {
        self.modules.push((ident.into(), config));
        self
    }

    /// Register every module from a config map.
    pub fn set_modules<I, S>(&mut self, modules: I) -> &mut Self
    where
        I: IntoIterator<Item = (S, JsonValue)>,
        S: Into<String>,
    {
        for (ident, config) in modules {
            self.add_module(ident, config);
        }
        self
    }

    pub fn modules(&self) -> &[(String, JsonValue)] {
        &self.modules
    }

    /// Create and set up every registered module, in registration order.
    ///
    /// A resolution or setup failure aborts the walk with the offending
    /// module named in the log.
    pub fn setup_modules(&self, registry: &ComponentRegistry) -> AppResult<()> {
        info!("Setting up {} modules", self.modules.len());

        for (ident, config) in &self.modules {
            info!("Setting up module: {ident}");
            let mut module = registry.create_module(ident)?;
            if let Err(e) = module.setup(config) {
                log::error!("Failed to set up module {ident}: {e}");
                return Err(e);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AppError, Module};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingModule {
        order: Arc<AtomicUsize>,
        seen_at: Arc<AtomicUsize>,
    }

    impl Module for CountingModule {
        fn setup(&mut self, config: &JsonValue) -> AppResult<()> {
            assert!(config.get("enabled").is_some());
            self.seen_at
                .store(self.order.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_setup_modules_in_registration_order() {
        let registry = ComponentRegistry::new();
        let order = Arc::new(AtomicUsize::new(0));
        let admin_at = Arc::new(AtomicUsize::new(usize::MAX));
        let api_at = Arc::new(AtomicUsize::new(usize::MAX));

        {
            let order = order.clone();
            let seen = admin_at.clone();
            registry.register_module(
                "admin",
                Box::new(move || {
                    Box::new(CountingModule {
                        order: order.clone(),
                        seen_at: seen.clone(),
                    })
                }),
            );
        }
        {
            let order = order.clone();
            let seen = api_at.clone();
            registry.register_module(
                "api",
                Box::new(move || {
                    Box::new(CountingModule {
                        order: order.clone(),
                        seen_at: seen.clone(),
                    })
                }),
            );
        }

        let mut manager = ModuleManager::new();
        manager.set_modules([
            ("admin", json!({"enabled": true})),
            ("api", json!({"enabled": true})),
        ]);

        manager.setup_modules(&registry).unwrap();
        assert_eq!(admin_at.load(Ordering::SeqCst), 0);
        assert_eq!(api_at.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unregistered_module_aborts_setup() {
        let registry = ComponentRegistry::new();
        let mut manager = ModuleManager::new();
        manager.add_module("ghost", json!({}));

        let err = manager.setup_modules(&registry).unwrap_err();
        assert!(matches!(err, AppError::UnresolvedComponent { .. }));
    }
}
