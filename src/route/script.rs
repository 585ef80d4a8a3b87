//! Script route handler
//!
//! Scripts share the request/response abstraction with actions so they can
//! run headlessly from the CLI; this handler resolves and runs one of them
//! for a configured route.

use log::debug;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::core::{AppRequest, AppResponse, AppResult, ComponentRegistry, Script};

use super::ScriptRouteConfig;

/// Dispatches one script route.
pub struct ScriptRoute {
    config: ScriptRouteConfig,
}

impl ScriptRoute {
    pub fn new(config: ScriptRouteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScriptRouteConfig {
        &self.config
    }

    /// Resolve and run the configured script controller.
    pub fn handle(
        &self,
        registry: &ComponentRegistry,
        request: &AppRequest,
        response: AppResponse,
    ) -> AppResult<AppResponse> {
        let controller = self.config.route.controller();
        debug!(
            "Dispatching script route '{}' to controller '{}'",
            self.config.route.ident(),
            controller
        );

        let mut script = registry.create_script(controller)?;
        apply_script_data(script.as_mut(), &self.config.script_data)?;
        script.run(request, response)
    }
}

/// Applies route-level static data onto a freshly created script through its
/// `set_field` hook. Null values are skipped; unapplied keys are ignored.
pub fn apply_script_data(
    script: &mut dyn Script,
    data: &JsonMap<String, JsonValue>,
) -> AppResult<()> {
    for (key, value) in data {
        if value.is_null() {
            continue;
        }
        if !script.set_field(key, value)? {
            debug!("Ignoring unrecognized script data key '{key}'");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ArgumentConfig;
    use bytes::Bytes;

    struct ListUsersScript {
        arguments: Vec<(String, ArgumentConfig)>,
        limit: u64,
    }

    impl ListUsersScript {
        fn new() -> Self {
            Self {
                arguments: Vec::new(),
                limit: 10,
            }
        }
    }

    impl Script for ListUsersScript {
        fn ident(&self) -> &str {
            "users/list"
        }

        fn description(&self) -> &str {
            "List registered users"
        }

        fn arguments(&self) -> &[(String, ArgumentConfig)] {
            &self.arguments
        }

        fn set_field(&mut self, key: &str, value: &JsonValue) -> AppResult<bool> {
            if key == "limit" {
                self.limit = value.as_u64().unwrap_or(self.limit);
                return Ok(true);
            }
            Ok(false)
        }

        fn run(&mut self, _request: &AppRequest, response: AppResponse) -> AppResult<AppResponse> {
            let (parts, _) = response.into_parts();
            Ok(AppResponse::from_parts(
                parts,
                Bytes::from(format!("listed {}", self.limit)),
            ))
        }
    }

    #[test]
    fn test_script_route_applies_data_and_runs() {
        let registry = ComponentRegistry::new();
        registry.register_script("users/list", Box::new(|| Box::new(ListUsersScript::new())));

        let config: ScriptRouteConfig =
            serde_yaml::from_str("ident: users/list\nscript_data:\n  limit: 3\n  extra: null\n")
                .unwrap();

        let request = http::Request::builder()
            .uri("/users/list")
            .body(Bytes::new())
            .unwrap();
        let response = ScriptRoute::new(config)
            .handle(&registry, &request, http::Response::new(Bytes::new()))
            .unwrap();
        assert_eq!(response.body(), "listed 3");
    }
}
