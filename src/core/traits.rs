//! Core traits for application components
//!
//! This module defines the invocable contracts shared by HTTP dispatch and
//! CLI scripts, decoupling route resolution from concrete controllers.

use std::str::FromStr;

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::error::{AppError, AppResult};
use crate::script::ArgumentConfig;

/// Request type exchanged with the host: `http` request with a `Bytes` body.
pub type AppRequest = http::Request<bytes::Bytes>;

/// Response type handed back to the host.
pub type AppResponse = http::Response<bytes::Bytes>;

/// Response mode of an action.
///
/// Controllers consult this after invocation to decide how the host should
/// emit the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionMode {
    Json,
    #[default]
    Redirect,
    Boolean,
    Output,
}

impl ActionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionMode::Json => "json",
            ActionMode::Redirect => "redirect",
            ActionMode::Boolean => "boolean",
            ActionMode::Output => "output",
        }
    }
}

impl FromStr for ActionMode {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s {
            "json" => Ok(ActionMode::Json),
            "redirect" => Ok(ActionMode::Redirect),
            "boolean" => Ok(ActionMode::Boolean),
            "output" => Ok(ActionMode::Output),
            other => Err(crate::config_error!("Invalid action mode '{other}'")),
        }
    }
}

/// A request-scoped unit of work producing an HTTP response.
///
/// Actions are created fresh per request by the [`ComponentRegistry`],
/// configured from the route's `action_data`, invoked once, then discarded.
///
/// [`ComponentRegistry`]: crate::core::ComponentRegistry
pub trait Action: Send {
    /// Hook for request-scoped setup. The return value is not consulted.
    fn init(&mut self, request: &AppRequest) {
        let _ = request;
    }

    fn mode(&self) -> ActionMode;

    fn set_mode(&mut self, mode: ActionMode);

    fn success(&self) -> bool;

    fn set_success(&mut self, success: bool);

    /// Extension hook for route data keys beyond the core schema. Returns
    /// whether the key was applied; unapplied keys are skipped by
    /// [`apply_action_data`].
    fn set_field(&mut self, key: &str, value: &JsonValue) -> AppResult<bool> {
        let _ = (key, value);
        Ok(false)
    }

    /// Run the action, consuming the response under construction and
    /// producing the final one. Single synchronous attempt; errors propagate
    /// to the host's error handler.
    fn invoke(&mut self, request: &AppRequest, response: AppResponse) -> AppResult<AppResponse>;
}

/// A CLI-invoked analogue of an action, sharing the request/response
/// abstraction so scripts can run headlessly.
pub trait Script: Send {
    fn ident(&self) -> &str;

    fn description(&self) -> &str;

    /// Declared named arguments, in declaration order.
    fn arguments(&self) -> &[(String, ArgumentConfig)];

    /// Option schema for one declared argument.
    fn argument(&self, ident: &str) -> Option<&ArgumentConfig> {
        self.arguments()
            .iter()
            .find(|(name, _)| name == ident)
            .map(|(_, arg)| arg)
    }

    /// Extension hook mirroring [`Action::set_field`] for `script_data`.
    fn set_field(&mut self, key: &str, value: &JsonValue) -> AppResult<bool> {
        let _ = (key, value);
        Ok(false)
    }

    /// Run the script. Entry point mirroring the HTTP action contract.
    fn run(&mut self, request: &AppRequest, response: AppResponse) -> AppResult<AppResponse>;
}

/// A view controller rendering an HTML document for a template route.
pub trait Template: Send {
    /// Initialize the template with the inbound request.
    fn init(&mut self, request: &AppRequest) -> bool {
        let _ = request;
        true
    }

    /// Apply route-level template data.
    fn set_data(&mut self, data: &JsonMap<String, JsonValue>) -> AppResult<()>;

    fn render(&self) -> AppResult<String>;
}

/// A reusable building block composed into templates.
pub trait Widget: Send {
    fn active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    fn set_data(&mut self, data: &JsonMap<String, JsonValue>) -> AppResult<()>;
}

/// An application module set up once at bootstrap from its config section.
pub trait Module: Send {
    fn setup(&mut self, config: &JsonValue) -> AppResult<()>;
}

/// Applies route-level static data onto a freshly created action.
///
/// The recognized keys form an explicit schema: `mode` must be one of the
/// four mode tokens, `success` must be a boolean; both go through the typed
/// setters and fail with a configuration error on a type mismatch. Null
/// values are skipped and never overwrite existing state. Remaining keys are
/// offered to the action's `set_field` hook; unapplied keys are ignored.
pub fn apply_action_data(
    action: &mut dyn Action,
    data: &JsonMap<String, JsonValue>,
) -> AppResult<()> {
    for (key, value) in data {
        if value.is_null() {
            continue;
        }
        match key.as_str() {
            "mode" => {
                let mode = value
                    .as_str()
                    .ok_or_else(|| crate::config_error!("Action mode needs to be a string"))?;
                action.set_mode(mode.parse()?);
            }
            "success" => {
                let success = value
                    .as_bool()
                    .ok_or_else(|| crate::config_error!("Action success needs to be a boolean"))?;
                action.set_success(success);
            }
            _ => {
                if !action.set_field(key, value)? {
                    log::debug!("Ignoring unrecognized action data key '{key}'");
                }
            }
        }
    }
    Ok(())
}
