use std::sync::Arc;

use crate::config::Config;
use crate::middleware::RequestLimiter;
use crate::services::{CompletionBackend, SessionController};

/// Shared application state injected into route handlers via axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub controller: Arc<SessionController>,
    pub limiter: Arc<RequestLimiter>,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn CompletionBackend>) -> Self {
        let controller = SessionController::new(&config, backend);
        let limiter = RequestLimiter::new(config.max_concurrent_requests);
        Self {
            config: Arc::new(config),
            controller: Arc::new(controller),
            limiter: Arc::new(limiter),
        }
    }
}
