//! Persisted client state — the explicit settings/state object and its
//! persistence interface.
//!
//! The whole object is loaded once at startup and written back through
//! `StateStore` on every change; handlers never touch raw storage keys.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::fortune::interpreter::FortuneDocument;

/// Everything the service persists between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientState {
    /// The intake intro popup was dismissed with "다시 보지 않기".
    #[serde(default)]
    pub intro_dismissed: bool,
    /// When the most recent fortune was generated. Drives the daily gate.
    #[serde(default)]
    pub last_checked_at: Option<DateTime<Utc>>,
    /// The most recent interpreted fortune.
    #[serde(default)]
    pub last_document: Option<FortuneDocument>,
}

/// Persistence seam for `ClientState`.
/// Carried in `AppState` as `Arc<dyn StateStore>`.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self) -> Result<ClientState, AppError>;
    async fn save(&self, state: &ClientState) -> Result<(), AppError>;
}

/// JSON-file-backed store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    /// A missing file loads defaults; a corrupt file is a storage error.
    async fn load(&self) -> Result<ClientState, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| AppError::Storage(format!("state file is corrupt: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No state file at {}, starting fresh", self.path.display());
                Ok(ClientState::default())
            }
            Err(e) => Err(AppError::Storage(format!("failed to read state file: {e}"))),
        }
    }

    async fn save(&self, state: &ClientState) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(state)
            .map_err(|e| AppError::Storage(format!("failed to serialize state: {e}")))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| AppError::Storage(format!("failed to write state file: {e}")))
    }
}
