use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::fortune::generator::FortuneGenerator;
use crate::store::{ClientState, StateStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable fortune generator. Default: LlmFortuneGenerator; tests swap
    /// in canned backends.
    pub generator: Arc<dyn FortuneGenerator>,
    /// Persistence seam for the client state.
    pub store: Arc<dyn StateStore>,
    /// Settings and most-recent document, loaded once at startup and written
    /// back through `store` on every change. The mutex also serializes
    /// fortune checks — at most one generator call is in flight at a time.
    pub client_state: Arc<Mutex<ClientState>>,
    /// Runtime configuration, kept alongside the state for future handlers.
    #[allow(dead_code)]
    pub config: Config,
}
