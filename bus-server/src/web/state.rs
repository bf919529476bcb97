//! Application state for the web layer.

use std::sync::Arc;

use crate::service::ArrivalService;

/// Shared application state.
pub struct AppState<F, N> {
    /// Runs aggregations and delivers reports
    pub service: Arc<ArrivalService<F, N>>,

    /// A chat message containing any of these starts a run
    pub trigger_words: Arc<Vec<String>>,
}

impl<F, N> AppState<F, N> {
    /// Create a new app state.
    pub fn new(service: ArrivalService<F, N>, trigger_words: Vec<String>) -> Self {
        Self {
            service: Arc::new(service),
            trigger_words: Arc::new(trigger_words),
        }
    }
}

impl<F, N> Clone for AppState<F, N> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            trigger_words: Arc::clone(&self.trigger_words),
        }
    }
}
