//! Core abstractions for the application layer
//!
//! This module provides the error taxonomy, the invocable component
//! contracts, and the component registry that the dispatch layer builds on.

pub mod error;
pub mod registry;
pub mod traits;

// Re-export commonly used types
pub use error::{AppError, AppResult, ErrorContext};
pub use registry::{ComponentRegistry, RegistryStats};
pub use traits::{
    apply_action_data, Action, ActionMode, AppRequest, AppResponse, Module, Script, Template,
    Widget,
};
