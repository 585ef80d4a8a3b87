//! Centralized component registry
//!
//! This module provides the create-by-identifier capability consumed by the
//! route dispatchers: an explicit registry mapping identifiers to
//! constructor functions, populated by the host at startup.

use dashmap::DashMap;
use log::debug;

use super::error::{AppError, AppResult};
use super::traits::{Action, Module, Script, Template};

/// Constructor function for an action controller
pub type ActionCreateFn = Box<dyn Fn() -> Box<dyn Action> + Send + Sync>;

/// Constructor function for a CLI script
pub type ScriptCreateFn = Box<dyn Fn() -> Box<dyn Script> + Send + Sync>;

/// Constructor function for a template controller
pub type TemplateCreateFn = Box<dyn Fn() -> Box<dyn Template> + Send + Sync>;

/// Constructor function for an application module
pub type ModuleCreateFn = Box<dyn Fn() -> Box<dyn Module> + Send + Sync>;

/// Registry of all component constructors, keyed by identifier.
///
/// Each `create_*` call constructs a fresh instance; components are never
/// shared across requests. Unknown identifiers fail with
/// [`AppError::UnresolvedComponent`], propagated to the host.
#[derive(Default)]
pub struct ComponentRegistry {
    actions: DashMap<String, ActionCreateFn>,
    scripts: DashMap<String, ScriptCreateFn>,
    templates: DashMap<String, TemplateCreateFn>,
    modules: DashMap<String, ModuleCreateFn>,
}

impl ComponentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action constructor (last registration wins)
    pub fn register_action(&self, ident: impl Into<String>, create: ActionCreateFn) {
        let ident = ident.into();
        debug!("Registering action constructor: {ident}");
        self.actions.insert(ident, create);
    }

    /// Register a script constructor
    pub fn register_script(&self, ident: impl Into<String>, create: ScriptCreateFn) {
        let ident = ident.into();
        debug!("Registering script constructor: {ident}");
        self.scripts.insert(ident, create);
    }

    /// Register a template constructor
    pub fn register_template(&self, ident: impl Into<String>, create: TemplateCreateFn) {
        let ident = ident.into();
        debug!("Registering template constructor: {ident}");
        self.templates.insert(ident, create);
    }

    /// Register a module constructor
    pub fn register_module(&self, ident: impl Into<String>, create: ModuleCreateFn) {
        let ident = ident.into();
        debug!("Registering module constructor: {ident}");
        self.modules.insert(ident, create);
    }

    /// Construct a fresh action for the given identifier
    pub fn create_action(&self, ident: &str) -> AppResult<Box<dyn Action>> {
        self.actions
            .get(ident)
            .map(|entry| entry.value()())
            .ok_or_else(|| AppError::UnresolvedComponent {
                kind: "action",
                ident: ident.to_string(),
            })
    }

    /// Construct a fresh script for the given identifier
    pub fn create_script(&self, ident: &str) -> AppResult<Box<dyn Script>> {
        self.scripts
            .get(ident)
            .map(|entry| entry.value()())
            .ok_or_else(|| AppError::UnresolvedComponent {
                kind: "script",
                ident: ident.to_string(),
            })
    }

    /// Construct a fresh template for the given identifier
    pub fn create_template(&self, ident: &str) -> AppResult<Box<dyn Template>> {
        self.templates
            .get(ident)
            .map(|entry| entry.value()())
            .ok_or_else(|| AppError::UnresolvedComponent {
                kind: "template",
                ident: ident.to_string(),
            })
    }

    /// Construct a fresh module for the given identifier
    pub fn create_module(&self, ident: &str) -> AppResult<Box<dyn Module>> {
        self.modules
            .get(ident)
            .map(|entry| entry.value()())
            .ok_or_else(|| AppError::UnresolvedComponent {
                kind: "module",
                ident: ident.to_string(),
            })
    }

    /// Get all registered action identifiers
    pub fn list_action_idents(&self) -> Vec<String> {
        self.actions.iter().map(|e| e.key().clone()).collect()
    }

    /// Get all registered script identifiers
    pub fn list_script_idents(&self) -> Vec<String> {
        self.scripts.iter().map(|e| e.key().clone()).collect()
    }

    /// Get all registered template identifiers
    pub fn list_template_idents(&self) -> Vec<String> {
        self.templates.iter().map(|e| e.key().clone()).collect()
    }

    /// Get registration counts for introspection
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            action_count: self.actions.len(),
            script_count: self.scripts.len(),
            template_count: self.templates.len(),
            module_count: self.modules.len(),
        }
    }
}

/// Statistics about registry contents
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub action_count: usize,
    pub script_count: usize,
    pub template_count: usize,
    pub module_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{ActionMode, AppRequest, AppResponse};
    use serde_json::{Map as JsonMap, Value as JsonValue};

    #[derive(Default)]
    struct NoopAction {
        mode: ActionMode,
        success: bool,
    }

    impl Action for NoopAction {
        fn mode(&self) -> ActionMode {
            self.mode
        }

        fn set_mode(&mut self, mode: ActionMode) {
            self.mode = mode;
        }

        fn success(&self) -> bool {
            self.success
        }

        fn set_success(&mut self, success: bool) {
            self.success = success;
        }

        fn invoke(&mut self, _req: &AppRequest, resp: AppResponse) -> AppResult<AppResponse> {
            Ok(resp)
        }
    }

    struct NoopTemplate;

    impl Template for NoopTemplate {
        fn set_data(&mut self, _data: &JsonMap<String, JsonValue>) -> AppResult<()> {
            Ok(())
        }

        fn render(&self) -> AppResult<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_registry_resolution() {
        let registry = ComponentRegistry::new();
        registry.register_action("hello", Box::new(|| Box::new(NoopAction::default())));
        registry.register_template("home", Box::new(|| Box::new(NoopTemplate)));

        assert!(registry.create_action("hello").is_ok());
        assert!(registry.create_template("home").is_ok());

        let stats = registry.stats();
        assert_eq!(stats.action_count, 1);
        assert_eq!(stats.template_count, 1);
        assert_eq!(stats.script_count, 0);
    }

    #[test]
    fn test_unknown_ident_fails_with_unresolved() {
        let registry = ComponentRegistry::new();
        match registry.create_action("missing") {
            Err(AppError::UnresolvedComponent { kind, ident }) => {
                assert_eq!(kind, "action");
                assert_eq!(ident, "missing");
            }
            other => panic!("expected UnresolvedComponent, got {other:?}"),
        }
    }

    #[test]
    fn test_fresh_instance_per_create() {
        let registry = ComponentRegistry::new();
        registry.register_action("hello", Box::new(|| Box::new(NoopAction::default())));

        let mut first = registry.create_action("hello").unwrap();
        first.set_success(true);

        let second = registry.create_action("hello").unwrap();
        assert!(!second.success());
    }
}
