use crate::arc::registry::SessionRegistry;
use crate::arc::resize::ResizeHub;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Live arc sessions, keyed by session id.
    pub sessions: SessionRegistry,
    /// Sessions with fit-text on subscribe here for viewport resizes.
    pub resize: ResizeHub,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = SessionRegistry::new(config.max_sessions);
        Self {
            config,
            sessions,
            resize: ResizeHub::new(),
        }
    }
}
