//! Route registration and dispatch table
//!
//! Routes are compiled into a `matchit` table once at registration time and
//! swapped in atomically, so request matching never observes a partially
//! loaded table.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use matchit::{InsertError, Router as MatchRouter};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::{AppRequest, AppResponse, AppResult, ComponentRegistry};
use crate::route::{
    ActionRoute, ActionRouteConfig, RouteConfig, ScriptRoute, ScriptRouteConfig, TemplateRoute,
    TemplateRouteConfig,
};

/// Route registration boundary: every route entry the host declares, per
/// kind.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
pub struct RouterConfig {
    #[serde(default)]
    #[validate(nested)]
    pub actions: Vec<ActionRouteConfig>,

    #[serde(default)]
    #[validate(nested)]
    pub scripts: Vec<ScriptRouteConfig>,

    #[serde(default)]
    #[validate(nested)]
    pub templates: Vec<TemplateRouteConfig>,
}

impl RouterConfig {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.scripts.is_empty() && self.templates.is_empty()
    }
}

/// One compiled route of any kind.
pub enum RouteEntry {
    Action(ActionRoute),
    Script(ScriptRoute),
    Template(TemplateRoute),
}

impl RouteEntry {
    /// The base route configuration shared by all kinds.
    pub fn route(&self) -> &RouteConfig {
        match self {
            RouteEntry::Action(r) => &r.config().route,
            RouteEntry::Script(r) => &r.config().route,
            RouteEntry::Template(r) => &r.config().route,
        }
    }

    /// Dispatch the request through the kind-specific handler.
    pub fn dispatch(
        &self,
        registry: &ComponentRegistry,
        request: &AppRequest,
        response: AppResponse,
    ) -> AppResult<AppResponse> {
        match self {
            RouteEntry::Action(r) => r.handle(registry, request, response),
            RouteEntry::Script(r) => r.handle(registry, request, response),
            RouteEntry::Template(r) => r.handle(registry, request, response),
        }
    }
}

/// The route ident doubles as the path pattern, rooted at `/`.
fn route_path(ident: &str) -> String {
    format!("/{}", ident.trim_start_matches('/'))
}

/// Compiled request-matching table.
#[derive(Default)]
pub struct RouteTable {
    router: MatchRouter<Vec<Arc<RouteEntry>>>,
}

impl RouteTable {
    /// Compile a table from the registered routes.
    pub fn build(config: &RouterConfig) -> AppResult<Self> {
        let mut table = RouteTable::default();

        for action in &config.actions {
            log::info!("Configuring action route: {}", action.route.ident());
            table.insert(RouteEntry::Action(ActionRoute::new(action.clone())))?;
        }
        for script in &config.scripts {
            log::info!("Configuring script route: {}", script.route.ident());
            table.insert(RouteEntry::Script(ScriptRoute::new(script.clone())))?;
        }
        for template in &config.templates {
            log::info!("Configuring template route: {}", template.route.ident());
            table.insert(RouteEntry::Template(TemplateRoute::new(template.clone())))?;
        }

        Ok(table)
    }

    fn insert(&mut self, entry: RouteEntry) -> AppResult<()> {
        let ident = entry.route().ident().to_string();
        let path = route_path(&ident);
        let entry = Arc::new(entry);

        match self.router.at_mut(path.as_str()) {
            Ok(entries) => {
                entries.value.push(entry);
            }
            Err(_) => {
                self.router
                    .insert(path, vec![entry])
                    .map_err(|e: InsertError| {
                        crate::config_error!("Cannot register route '{ident}': {e}")
                    })?;
            }
        }
        Ok(())
    }

    /// Matches a request path and method to a route.
    ///
    /// Returns the captured path parameters and the entry, or `None` when
    /// no route matches (the host then invokes the not-found handler).
    pub fn match_request(
        &self,
        path: &str,
        method: &str,
    ) -> Option<(BTreeMap<String, String>, Arc<RouteEntry>)> {
        let matched = self.router.at(path).ok()?;
        let params: BTreeMap<String, String> = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        matched
            .value
            .iter()
            .find(|entry| entry.route().allows_method(method))
            .map(|entry| (params, entry.clone()))
    }
}

/// Global table, swapped atomically on reload.
static GLOBAL_ROUTE_TABLE: Lazy<ArcSwap<RouteTable>> =
    Lazy::new(|| ArcSwap::new(Arc::new(RouteTable::default())));

pub fn route_table() -> Arc<RouteTable> {
    GLOBAL_ROUTE_TABLE.load().clone()
}

/// Compile the registered routes and swap the global table.
pub fn reload_route_table(config: &RouterConfig) -> AppResult<()> {
    let table = RouteTable::build(config)?;
    GLOBAL_ROUTE_TABLE.store(Arc::new(table));
    Ok(())
}
