pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::fortune::handlers;
use crate::settings;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Fortune API
        .route("/api/v1/fortune", post(handlers::handle_check_fortune))
        .route("/api/v1/fortune/today", get(handlers::handle_today))
        .route(
            "/api/v1/fortune/today/:category",
            get(handlers::handle_today_section),
        )
        // Settings API
        .route("/api/v1/settings", get(settings::handle_get_settings))
        .route(
            "/api/v1/settings/intro",
            patch(settings::handle_dismiss_intro),
        )
        .with_state(state)
}
