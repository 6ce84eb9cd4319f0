use std::sync::Arc;
use std::time::Duration;

use marquee_core::{
    Config, CounterStore, MovieCatalog, SanitizedConfig, ViewController, ViewOptions,
};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn MovieCatalog>,
    counter_store: Arc<dyn CounterStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn MovieCatalog>,
        counter_store: Arc<dyn CounterStore>,
    ) -> Self {
        Self {
            config,
            catalog,
            counter_store,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// A view controller backed by the shared catalog and counter store.
    ///
    /// Every request and WebSocket session gets its own view state.
    pub fn new_controller(&self) -> Arc<ViewController> {
        Arc::new(ViewController::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.counter_store),
            ViewOptions::from(&self.config),
        ))
    }

    /// Quiet period for search input.
    pub fn debounce(&self) -> Duration {
        self.config.search.debounce()
    }
}
