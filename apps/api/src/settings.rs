//! Settings surface over the persisted client state.
//!
//! The intro popup flag used to be an ad hoc storage key; here it is an
//! explicit field changed through the persistence interface.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub intro_dismissed: bool,
}

/// GET /api/v1/settings
pub async fn handle_get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    let client_state = state.client_state.lock().await;
    Json(SettingsResponse {
        intro_dismissed: client_state.intro_dismissed,
    })
}

#[derive(Debug, Deserialize)]
pub struct IntroDismissRequest {
    pub dismissed: bool,
}

/// PATCH /api/v1/settings/intro
pub async fn handle_dismiss_intro(
    State(state): State<AppState>,
    Json(req): Json<IntroDismissRequest>,
) -> Result<Json<SettingsResponse>, AppError> {
    let mut client_state = state.client_state.lock().await;
    client_state.intro_dismissed = req.dismissed;
    state.store.save(&client_state).await?;

    Ok(Json(SettingsResponse {
        intro_dismissed: client_state.intro_dismissed,
    }))
}
