//! Application state for the auto-enrolment engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers,
/// currently just the loaded scheme configuration.
#[derive(Clone)]
pub struct AppState {
    /// The loaded scheme configuration.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates application state carrying the built-in statutory parameters.
    pub fn statutory() -> Self {
        Self::new(ConfigLoader::statutory())
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}
