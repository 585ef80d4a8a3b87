//! Unified error handling for the application layer
//!
//! This module provides a centralized error type system so that route,
//! handler, and script modules do not need to depend on each other for
//! error handling.

use std::fmt;

/// Unified error types for the application glue layer
#[derive(Debug)]
pub enum AppError {
    /// Configuration-related errors: invalid HTTP method token, empty route
    /// ident, wrong value type handed to a typed setter, malformed config
    /// file. Fatal at configuration time, never recovered.
    Configuration(String),

    /// No registered constructor maps the identifier to a concrete
    /// component. Propagated to the host, never swallowed.
    UnresolvedComponent { kind: &'static str, ident: String },

    /// Errors raised during action, script, or template invocation. These
    /// flow untouched to the host's top-level error handler.
    Action(String),

    /// The cron advisory lock could not be obtained. Fatal to the current
    /// script run only.
    Lock(String),

    /// I/O errors (config read, lock file open)
    Io(std::io::Error),

    /// Resource not found errors (module config lookups etc.)
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            AppError::UnresolvedComponent { kind, ident } => {
                write!(f, "No {kind} registered for identifier '{ident}'")
            }
            AppError::Action(msg) => write!(f, "Action error: {msg}"),
            AppError::Lock(msg) => write!(f, "Lock unavailable: {msg}"),
            AppError::Io(err) => write!(f, "I/O error: {err}"),
            AppError::NotFound(msg) => write!(f, "Resource not found: {msg}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    fn with_context(self, context: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: fmt::Display,
{
    fn with_context(self, context: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Action(format!("{context}: {e}")))
    }
}

/// Convenience macro for configuration error creation
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::core::AppError::Configuration(format!($($arg)*))
    };
}
