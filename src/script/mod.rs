//! CLI script support
//!
//! Scripts are actions called from the CLI. They mirror the HTTP
//! request/response contract (see [`Script`]) and declare their named
//! arguments up front so a host binary can build its usage output.
//!
//! [`Script`]: crate::core::Script

pub mod cron;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::core::{AppRequest, AppResponse, AppResult, Script};

pub use cron::CronGuard;

/// Option schema for one declared script argument.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ArgumentConfig {
    /// Long option name; falls back to the argument ident.
    pub long_name: Option<String>,

    /// Short option prefix (single character).
    pub prefix: Option<String>,

    #[serde(default)]
    pub description: String,

    pub default_value: Option<JsonValue>,

    #[serde(default)]
    pub required: bool,

    /// Flag argument: present/absent, takes no value.
    #[serde(default)]
    pub no_value: bool,
}

/// Declared metadata for a script: identifier, description, named
/// arguments in declaration order, and the cron lock toggle.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
pub struct ScriptConfig {
    #[validate(length(min = 1))]
    ident: String,

    #[serde(default)]
    description: String,

    #[serde(
        default,
        deserialize_with = "arguments_in_order",
        serialize_with = "arguments_as_map"
    )]
    arguments: Vec<(String, ArgumentConfig)>,

    #[serde(default)]
    use_lock: bool,
}

impl ScriptConfig {
    pub fn new(ident: impl Into<String>) -> AppResult<Self> {
        let ident = ident.into();
        if ident.is_empty() {
            return Err(crate::config_error!("Script ident must not be empty"));
        }
        Ok(Self {
            ident,
            ..Self::default()
        })
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Add one named argument; a redeclared ident replaces the previous
    /// schema in place, keeping its position.
    pub fn add_argument(
        &mut self,
        ident: impl Into<String>,
        argument: ArgumentConfig,
    ) -> &mut Self {
        let ident = ident.into();
        if let Some(slot) = self.arguments.iter_mut().find(|(name, _)| *name == ident) {
            slot.1 = argument;
        } else {
            self.arguments.push((ident, argument));
        }
        self
    }

    /// Declared arguments, in declaration order.
    pub fn arguments(&self) -> &[(String, ArgumentConfig)] {
        &self.arguments
    }

    /// Option schema for one declared argument.
    pub fn argument(&self, ident: &str) -> Option<&ArgumentConfig> {
        self.arguments
            .iter()
            .find(|(name, _)| name == ident)
            .map(|(_, arg)| arg)
    }

    pub fn set_use_lock(&mut self, use_lock: bool) -> &mut Self {
        self.use_lock = use_lock;
        self
    }

    pub fn use_lock(&self) -> bool {
        self.use_lock
    }
}

/// Deserializes the `arguments` map preserving document order.
fn arguments_in_order<'de, D>(deserializer: D) -> Result<Vec<(String, ArgumentConfig)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedMapVisitor;

    impl<'de> serde::de::Visitor<'de> for OrderedMapVisitor {
        type Value = Vec<(String, ArgumentConfig)>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a map of argument ident to argument options")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>,
        {
            let mut arguments = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry()? {
                arguments.push(entry);
            }
            Ok(arguments)
        }
    }

    deserializer.deserialize_map(OrderedMapVisitor)
}

/// Run a script under its configured cron guard.
///
/// When the config enables locking, the advisory lock for the script ident
/// is held for the duration of the run and released afterwards, whether the
/// run succeeded or failed. With locking disabled the script always
/// proceeds.
pub fn run_guarded(
    config: &ScriptConfig,
    script: &mut dyn Script,
    request: &AppRequest,
    response: AppResponse,
) -> AppResult<AppResponse> {
    let mut guard = CronGuard::new(config.use_lock());
    guard.acquire(config.ident())?;
    let result = script.run(request, response);
    guard.release();
    result
}

/// Serializes the ordered argument list back out as a map.
fn arguments_as_map<S>(
    arguments: &[(String, ArgumentConfig)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_map(arguments.iter().map(|(k, v)| (k, v)))
}
