//! Action route handler
//!
//! Resolves a validated route config and an inbound request/response pair
//! into an invoked action and its produced response.

use log::debug;

use crate::core::{apply_action_data, AppRequest, AppResponse, AppResult, ComponentRegistry};

use super::ActionRouteConfig;

/// Dispatches one action route: controller resolution, request-scoped
/// initialization, route data application, invocation.
pub struct ActionRoute {
    config: ActionRouteConfig,
}

impl ActionRoute {
    pub fn new(config: ActionRouteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ActionRouteConfig {
        &self.config
    }

    /// Resolve and invoke the configured action controller.
    ///
    /// Single synchronous attempt: resolution failures propagate untouched,
    /// and no retry or timeout is applied. The host owns any outer policy.
    pub fn handle(
        &self,
        registry: &ComponentRegistry,
        request: &AppRequest,
        response: AppResponse,
    ) -> AppResult<AppResponse> {
        let controller = self.config.route.controller();
        debug!("Dispatching action route '{}' to controller '{}'", self.config.route.ident(), controller);

        let mut action = registry.create_action(controller)?;
        action.init(request);
        apply_action_data(action.as_mut(), &self.config.action_data)?;
        action.invoke(request, response)
    }
}
