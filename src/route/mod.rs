//! Route configuration
//!
//! A route is a configured mapping from an identifier (and HTTP methods) to
//! a controller. Route configs are built once at registration time, owned
//! exclusively by the dispatch step that created them, and discarded after
//! the request completes.

pub mod action;
pub mod script;
pub mod template;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use validator::Validate;

use crate::core::{AppError, AppResult};

pub use action::ActionRoute;
pub use script::ScriptRoute;
pub use template::TemplateRoute;

/// HTTP methods a route may resolve to.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum HttpMethod {
    DELETE,
    GET,
    HEAD,
    POST,
    PUT,
    PATCH,
    OPTIONS,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let method = match self {
            HttpMethod::DELETE => "DELETE",
            HttpMethod::GET => "GET",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::OPTIONS => "OPTIONS",
        };
        write!(f, "{}", method)
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    /// Case-insensitive parse, normalized to the upper-case token.
    fn from_str(s: &str) -> AppResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DELETE" => Ok(HttpMethod::DELETE),
            "GET" => Ok(HttpMethod::GET),
            "HEAD" => Ok(HttpMethod::HEAD),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "PATCH" => Ok(HttpMethod::PATCH),
            "OPTIONS" => Ok(HttpMethod::OPTIONS),
            _ => Err(crate::config_error!(
                "Invalid method \"{s}\". Must be a valid HTTP method."
            )),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = AppError;

    fn try_from(s: String) -> AppResult<Self> {
        s.parse()
    }
}

/// Base route configuration: identifier, allowed methods, controller
/// identifier, language, grouping.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct RouteConfig {
    #[validate(length(min = 1))]
    ident: String,

    #[serde(default = "RouteConfig::default_methods")]
    methods: Vec<HttpMethod>,

    controller: Option<String>,
    lang: Option<String>,
    group: Option<String>,
}

impl RouteConfig {
    fn default_methods() -> Vec<HttpMethod> {
        vec![HttpMethod::GET]
    }

    pub fn new(ident: impl Into<String>) -> AppResult<Self> {
        let ident = ident.into();
        if ident.is_empty() {
            return Err(crate::config_error!("Route ident must not be empty"));
        }
        Ok(Self {
            ident,
            methods: Self::default_methods(),
            controller: None,
            lang: None,
            group: None,
        })
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Replace the allowed methods. Every token is validated before any
    /// state changes; on an invalid token the prior method list is left
    /// untouched. Order is preserved and duplicates are allowed.
    pub fn set_methods<I, S>(&mut self, methods: I) -> AppResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = methods
            .into_iter()
            .map(|m| m.as_ref().parse())
            .collect::<AppResult<Vec<HttpMethod>>>()?;
        self.methods = parsed;
        Ok(self)
    }

    /// Add support for one HTTP method.
    pub fn add_method(&mut self, method: &str) -> AppResult<&mut Self> {
        self.methods.push(method.parse()?);
        Ok(self)
    }

    pub fn methods(&self) -> &[HttpMethod] {
        &self.methods
    }

    pub fn allows_method(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.to_string() == method)
    }

    pub fn set_controller(&mut self, controller: impl Into<String>) -> AppResult<&mut Self> {
        let controller = controller.into();
        if controller.is_empty() {
            return Err(crate::config_error!("Route controller must not be empty"));
        }
        self.controller = Some(controller);
        Ok(self)
    }

    /// The controller identifier. If none was set explicitly, the route
    /// `ident` is used (lazy default, never an eager copy).
    pub fn controller(&self) -> &str {
        match &self.controller {
            Some(controller) => controller,
            None => self.ident(),
        }
    }

    pub fn set_lang(&mut self, lang: impl Into<String>) -> &mut Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn set_group(&mut self, group: impl Into<String>) -> &mut Self {
        self.group = Some(group.into());
        self
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

/// Configuration for an action route: base route plus the static data map
/// applied verbatim to the resolved action.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct ActionRouteConfig {
    #[serde(flatten)]
    #[validate(nested)]
    pub route: RouteConfig,

    /// Applied to the action's bulk configuration operation. A missing map
    /// deserializes to empty and dispatch proceeds without applying data.
    #[serde(default)]
    pub action_data: JsonMap<String, JsonValue>,
}

/// Configuration for a script route.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct ScriptRouteConfig {
    #[serde(flatten)]
    #[validate(nested)]
    pub route: RouteConfig,

    #[serde(default)]
    pub script_data: JsonMap<String, JsonValue>,
}

/// Configuration for a template route.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct TemplateRouteConfig {
    #[serde(flatten)]
    #[validate(nested)]
    pub route: RouteConfig,

    /// Explicit template identifier; falls back to the route controller.
    pub template: Option<String>,

    #[serde(default)]
    pub template_data: JsonMap<String, JsonValue>,
}

impl TemplateRouteConfig {
    pub fn template_ident(&self) -> &str {
        match &self.template {
            Some(template) => template,
            None => self.route.controller(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_methods_normalizes_and_preserves_order() {
        let mut config = RouteConfig::new("admin/login").unwrap();
        config.set_methods(["post", "Get", "DELETE"]).unwrap();
        let rendered: Vec<String> = config.methods().iter().map(|m| m.to_string()).collect();
        assert_eq!(rendered, ["POST", "GET", "DELETE"]);
    }

    #[test]
    fn test_set_methods_invalid_token_leaves_state_unchanged() {
        let mut config = RouteConfig::new("admin/login").unwrap();
        config.set_methods(["PUT"]).unwrap();

        let err = config.set_methods(["GET", "TELEPORT"]).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(config.methods(), &[HttpMethod::PUT]);
    }

    #[test]
    fn test_methods_default_to_get() {
        let config = RouteConfig::new("home").unwrap();
        assert_eq!(config.methods(), &[HttpMethod::GET]);
    }

    #[test]
    fn test_duplicate_methods_allowed() {
        let mut config = RouteConfig::new("home").unwrap();
        config.set_methods(["GET", "get"]).unwrap();
        assert_eq!(config.methods(), &[HttpMethod::GET, HttpMethod::GET]);
    }

    #[test]
    fn test_controller_falls_back_to_ident() {
        let mut config = RouteConfig::new("contact/form").unwrap();
        assert_eq!(config.controller(), "contact/form");

        config.set_controller("contact").unwrap();
        assert_eq!(config.controller(), "contact");
    }

    #[test]
    fn test_empty_ident_rejected() {
        assert!(RouteConfig::new("").is_err());
    }

    #[test]
    fn test_action_route_config_from_yaml() {
        let yaml = r#"
ident: contact/send
methods: [post]
action_data:
  mode: json
  notify: admin@example.com
"#;
        let config: ActionRouteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.route.ident(), "contact/send");
        assert_eq!(config.route.methods(), &[HttpMethod::POST]);
        assert_eq!(
            config.action_data.get("mode").and_then(|v| v.as_str()),
            Some("json")
        );
    }

    #[test]
    fn test_action_data_defaults_to_empty_map() {
        let config: ActionRouteConfig = serde_yaml::from_str("ident: ping").unwrap();
        assert!(config.action_data.is_empty());
    }

    #[test]
    fn test_invalid_method_token_rejected_at_deserialization() {
        let result: Result<ActionRouteConfig, _> =
            serde_yaml::from_str("ident: ping\nmethods: [FETCH]");
        assert!(result.is_err());
    }

    #[test]
    fn test_template_ident_fallback() {
        let config: TemplateRouteConfig = serde_yaml::from_str("ident: home").unwrap();
        assert_eq!(config.template_ident(), "home");

        let config: TemplateRouteConfig =
            serde_yaml::from_str("ident: home\ntemplate: layouts/front").unwrap();
        assert_eq!(config.template_ident(), "layouts/front");
    }
}
