//! Registry of backend-specific configuration strategies

pub mod mongoid;

use std::collections::HashMap;
use std::sync::Arc;

use crate::generation::BackendStrategy;
use crate::infrastructure::shell::CommandExecutor;

pub use mongoid::MongoidStrategy;

/// Maps a backend identifier to the strategy configuring its dummy apps.
///
/// A backend without an entry needs no extra configuration.
#[derive(Default)]
pub struct BackendRegistry {
    strategies: HashMap<String, Arc<dyn BackendStrategy>>,
}

impl BackendRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in strategies
    pub fn with_defaults(rails_program: &str, executor: Arc<dyn CommandExecutor>) -> Self {
        let mut registry = Self::new();
        registry.register(
            "mongoid",
            Arc::new(MongoidStrategy::new(rails_program, executor)) as Arc<dyn BackendStrategy>,
        );
        registry
    }

    /// Register a strategy, replacing any previous one for the backend
    pub fn register(&mut self, backend: impl Into<String>, strategy: Arc<dyn BackendStrategy>) {
        self.strategies.insert(backend.into(), strategy);
    }

    pub fn get(&self, backend: &str) -> Option<Arc<dyn BackendStrategy>> {
        self.strategies.get(backend).cloned()
    }

    pub fn has_strategy(&self, backend: &str) -> bool {
        self.strategies.contains_key(backend)
    }

    /// Backends with a registered strategy, sorted
    pub fn backends(&self) -> Vec<String> {
        let mut backends: Vec<String> = self.strategies.keys().cloned().collect();
        backends.sort();
        backends
    }
}
