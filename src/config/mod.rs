//! Application configuration
//!
//! Typed configuration structs loaded from YAML, plus the loosely-typed
//! lookup helpers consumed by components that read nested config values by
//! dot-notation key.

use std::fs;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::{Validate, ValidationError};

use crate::core::{AppError, AppResult};
use crate::router::RouterConfig;

/// Top-level application configuration.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Whether error responses carry full diagnostic details. Off in
    /// production: details then go to the error log only.
    #[serde(default)]
    pub display_error_details: bool,

    /// Public base URL, linked from the not-found page.
    #[validate(url)]
    pub base_url: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub logger: LoggerConfig,

    #[serde(default)]
    #[validate(nested)]
    pub routes: RouterConfig,

    /// Module ident to module configuration data.
    #[serde(default)]
    pub modules: serde_json::Map<String, JsonValue>,
}

// Config file load and validation
impl AppConfig {
    pub fn load_from_yaml<P>(path: P) -> AppResult<Self>
    where
        P: AsRef<std::path::Path> + std::fmt::Display,
    {
        let conf_str = fs::read_to_string(&path).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Unable to read conf file from {path}: {e}"),
            ))
        })?;
        debug!("Conf file read from {path}");
        Self::from_yaml(&conf_str)
    }

    pub fn from_yaml(conf_str: &str) -> AppResult<Self> {
        trace!("Read conf file: {conf_str}");
        let conf: AppConfig = serde_yaml::from_str(conf_str)
            .map_err(|e| crate::config_error!("Unable to parse yaml conf: {e}"))?;

        trace!("Loaded conf: {conf:?}");

        conf.validate()
            .map_err(|e| crate::config_error!("Conf validation failed: {e}"))?;

        Ok(conf)
    }
}

/// Logger configuration section.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct LoggerConfig {
    #[serde(default = "LoggerConfig::default_active")]
    pub active: bool,

    #[serde(default = "LoggerConfig::default_level")]
    #[validate(custom(function = "LoggerConfig::validate_level"))]
    pub level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            active: Self::default_active(),
            level: Self::default_level(),
        }
    }
}

impl LoggerConfig {
    fn default_active() -> bool {
        true
    }

    fn default_level() -> String {
        "info".to_string()
    }

    fn validate_level(level: &str) -> Result<(), ValidationError> {
        if level.parse::<log::LevelFilter>().is_err() {
            return Err(ValidationError::new("invalid_log_level"));
        }
        Ok(())
    }
}

/// Descend into a loosely-typed config value by dot-notation key.
///
/// Returns `None` when any segment is missing or the value along the path
/// is not an object.
pub fn lookup<'a>(value: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
    let mut current = value;
    for part in key.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Boolean coercion for "active"-style flags: booleans pass through,
/// numbers are truthy when non-zero, and the usual string spellings are
/// recognized. Missing keys, nulls, and unrecognized values yield the
/// declared default.
pub fn lookup_bool(value: &JsonValue, key: &str, default: bool) -> bool {
    match lookup(value, key) {
        None | Some(JsonValue::Null) => default,
        Some(JsonValue::Bool(b)) => *b,
        Some(JsonValue::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(default),
        Some(JsonValue::String(s)) => match s.as_str() {
            "true" | "1" => true,
            "false" | "0" | "" => false,
            _ => default,
        },
        Some(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_app_config_from_yaml() {
        let yaml = r#"
display_error_details: true
base_url: https://example.com/
logger:
  level: debug
routes:
  actions:
    - ident: contact/send
      methods: [POST]
modules:
  admin:
    active: true
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert!(config.display_error_details);
        assert_eq!(config.routes.actions.len(), 1);
        assert_eq!(config.logger.level, "debug");
        assert!(config.modules.contains_key("admin"));
    }

    #[test]
    fn test_defaults_apply_on_empty_config() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert!(!config.display_error_details);
        assert!(config.logger.active);
        assert_eq!(config.logger.level, "info");
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let result = AppConfig::from_yaml("logger:\n  level: loud\n");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = AppConfig::from_yaml("base_url: not a url\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_lookup_dot_notation() {
        let value = json!({
            "handlers": {
                "stream": {"active": 1, "level": null}
            }
        });

        assert_eq!(
            lookup(&value, "handlers.stream.level"),
            Some(&JsonValue::Null)
        );
        assert!(lookup(&value, "handlers.console").is_none());
        assert!(lookup(&value, "handlers.stream.active.deeper").is_none());
    }

    #[test]
    fn test_lookup_bool_coercion() {
        let value = json!({
            "a": true,
            "b": 0,
            "c": "false",
            "d": "yes-ish",
            "e": null
        });

        assert!(lookup_bool(&value, "a", false));
        assert!(!lookup_bool(&value, "b", true));
        assert!(!lookup_bool(&value, "c", true));
        assert!(lookup_bool(&value, "d", true));
        assert!(lookup_bool(&value, "e", true));
        assert!(!lookup_bool(&value, "missing", false));
    }
}
