//! This crate contains the application glue layer between a host web server
//! and its controllers.
//!
//! It defines the main modules for route configuration and dispatch, error
//! and not-found rendering, CLI scripts with a cron advisory lock, module
//! setup, and configuration/logging bootstrap.

pub mod config;
pub mod core;
pub mod handler;
pub mod logging;
pub mod module;
pub mod route;
pub mod router;
pub mod script;
pub mod utils;

pub use crate::core::{
    Action, ActionMode, AppError, AppRequest, AppResponse, AppResult, ComponentRegistry, Module,
    Script, Template,
};
pub use crate::handler::{ErrorChain, ErrorHandler, ErrorRecord, NotFoundHandler};
pub use crate::router::{reload_route_table, route_table, RouteTable, RouterConfig};
pub use crate::script::CronGuard;
