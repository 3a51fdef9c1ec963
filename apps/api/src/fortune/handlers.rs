//! Fortune check flow — validate, gate, generate, interpret, persist.
//!
//! Flow: validate profile → daily gate → generator call → interpret →
//!       persist state → return document + category sections.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::fortune::gate::checked_today;
use crate::fortune::interpreter::{
    category_sections, interpret, section, CategorySection, FortuneDocument,
};
use crate::fortune::profile::UserProfile;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FortuneResponse {
    pub document: FortuneDocument,
    pub sections: Vec<CategorySection>,
    pub checked_at: DateTime<Utc>,
    /// True when the daily gate answered from the cached document instead of
    /// calling the generator.
    pub cached: bool,
}

impl FortuneResponse {
    fn new(document: FortuneDocument, checked_at: DateTime<Utc>, cached: bool) -> Self {
        let sections = category_sections(&document.narrative);
        Self {
            document,
            sections,
            checked_at,
            cached,
        }
    }
}

/// POST /api/v1/fortune
///
/// Once per calendar day: a same-day repeat request is served from the cached
/// document without touching the generator.
pub async fn handle_check_fortune(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<FortuneResponse>, AppError> {
    profile.validate()?;

    // Lock held across the generator call — one check in flight at a time.
    let mut client_state = state.client_state.lock().await;
    let now = Utc::now();

    if checked_today(client_state.last_checked_at, now) {
        if let (Some(document), Some(checked_at)) = (
            client_state.last_document.clone(),
            client_state.last_checked_at,
        ) {
            info!("Daily gate hit, serving cached fortune");
            return Ok(Json(FortuneResponse::new(document, checked_at, true)));
        }
    }

    let raw = state.generator.generate(&profile).await?;
    let document = interpret(&raw);
    info!(
        "Interpreted fortune: {} scores, {} narrative bytes",
        document.scores.len(),
        document.narrative.len()
    );

    client_state.last_checked_at = Some(now);
    client_state.last_document = Some(document.clone());
    state.store.save(&client_state).await?;

    Ok(Json(FortuneResponse::new(document, now, false)))
}

/// GET /api/v1/fortune/today
///
/// The cached document, but only if it was generated on today's calendar day.
pub async fn handle_today(
    State(state): State<AppState>,
) -> Result<Json<FortuneResponse>, AppError> {
    let client_state = state.client_state.lock().await;

    match (&client_state.last_document, client_state.last_checked_at) {
        (Some(document), Some(checked_at)) if checked_today(Some(checked_at), Utc::now()) => Ok(
            Json(FortuneResponse::new(document.clone(), checked_at, true)),
        ),
        _ => Err(AppError::NotFound(
            "no fortune generated today".to_string(),
        )),
    }
}

#[derive(Debug, Serialize)]
pub struct SectionResponse {
    pub category: String,
    pub text: String,
}

/// GET /api/v1/fortune/today/:category
///
/// Section lookup over the cached narrative. A missing section resolves to
/// the loading placeholder, not an error.
pub async fn handle_today_section(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<SectionResponse>, AppError> {
    let client_state = state.client_state.lock().await;
    let narrative = client_state
        .last_document
        .as_ref()
        .map(|d| d.narrative.as_str())
        .unwrap_or_default();

    let text = section(narrative, &category).to_string();
    Ok(Json(SectionResponse { category, text }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fortune::generator::FortuneGenerator;
    use crate::fortune::interpreter::SECTION_PLACEHOLDER;
    use crate::fortune::profile::{CalendarSystem, Gender};
    use crate::store::{ClientState, JsonFileStore, StateStore};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const RAW: &str =
        "[SCORES]\n재물: 80\n애정: 55\n[/SCORES]\n\n총운: 좋은 하루입니다\n\n애정운: 설레는 만남이 있습니다";

    /// Returns a fixed text and counts how often it was asked.
    struct CannedGenerator {
        raw: String,
        calls: AtomicUsize,
    }

    impl CannedGenerator {
        fn new(raw: &str) -> Arc<Self> {
            Arc::new(Self {
                raw: raw.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl FortuneGenerator for CannedGenerator {
        async fn generate(&self, _profile: &UserProfile) -> Result<String, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.raw.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl FortuneGenerator for FailingGenerator {
        async fn generate(&self, _profile: &UserProfile) -> Result<String, AppError> {
            Err(AppError::Generator("upstream rejected the call".to_string()))
        }
    }

    fn test_state(
        generator: Arc<dyn FortuneGenerator>,
        dir: &tempfile::TempDir,
    ) -> AppState {
        AppState {
            generator,
            store: Arc::new(JsonFileStore::new(dir.path().join("state.json"))),
            client_state: Arc::new(Mutex::new(ClientState::default())),
            config: Config {
                anthropic_api_key: "test-key".to_string(),
                state_path: dir
                    .path()
                    .join("state.json")
                    .to_string_lossy()
                    .into_owned(),
                port: 0,
                rust_log: "info".to_string(),
            },
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            name: "김하늘".to_string(),
            gender: Gender::Female,
            calendar: CalendarSystem::Solar,
            birthdate: NaiveDate::from_ymd_opt(1995, 3, 14).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_first_check_generates_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let generator = CannedGenerator::new(RAW);
        let state = test_state(generator.clone(), &dir);

        let response = handle_check_fortune(State(state.clone()), Json(profile()))
            .await
            .unwrap()
            .0;

        assert!(!response.cached);
        assert_eq!(response.document.scores.get("재물"), Some(&80));
        assert_eq!(response.sections[0].text, "총운: 좋은 하루입니다");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

        // Written back through the persistence interface.
        let persisted = state.store.load().await.unwrap();
        assert!(persisted.last_checked_at.is_some());
        assert_eq!(persisted.last_document, Some(response.document));
    }

    #[tokio::test]
    async fn test_same_day_repeat_serves_cache_without_generator_call() {
        let dir = tempfile::tempdir().unwrap();
        let generator = CannedGenerator::new(RAW);
        let state = test_state(generator.clone(), &dir);

        let first = handle_check_fortune(State(state.clone()), Json(profile()))
            .await
            .unwrap()
            .0;
        let second = handle_check_fortune(State(state.clone()), Json(profile()))
            .await
            .unwrap()
            .0;

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(second.document, first.document);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_profile_is_rejected_before_generation() {
        let dir = tempfile::tempdir().unwrap();
        let generator = CannedGenerator::new(RAW);
        let state = test_state(generator.clone(), &dir);

        let mut bad = profile();
        bad.name = "  ".to_string();

        let result = handle_check_fortune(State(state), Json(bad)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generator_failure_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(Arc::new(FailingGenerator), &dir);

        let result = handle_check_fortune(State(state.clone()), Json(profile())).await;
        assert!(matches!(result, Err(AppError::Generator(_))));

        let client_state = state.client_state.lock().await;
        assert!(client_state.last_checked_at.is_none());
        assert!(client_state.last_document.is_none());
    }

    #[tokio::test]
    async fn test_today_is_not_found_before_any_check() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(CannedGenerator::new(RAW), &dir);

        let result = handle_today(State(state)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_today_returns_cached_document_after_check() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(CannedGenerator::new(RAW), &dir);

        handle_check_fortune(State(state.clone()), Json(profile()))
            .await
            .unwrap();

        let today = handle_today(State(state)).await.unwrap().0;
        assert!(today.cached);
        assert_eq!(today.document.scores.len(), 2);
    }

    #[tokio::test]
    async fn test_yesterdays_document_is_not_today() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(CannedGenerator::new(RAW), &dir);

        {
            let mut client_state = state.client_state.lock().await;
            client_state.last_checked_at = Some(Utc::now() - chrono::Duration::days(2));
            client_state.last_document = Some(interpret(RAW));
        }

        let result = handle_today(State(state)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stale_gate_regenerates() {
        let dir = tempfile::tempdir().unwrap();
        let generator = CannedGenerator::new(RAW);
        let state = test_state(generator.clone(), &dir);

        {
            let mut client_state = state.client_state.lock().await;
            client_state.last_checked_at = Some(Utc::now() - chrono::Duration::days(2));
            client_state.last_document = Some(interpret("어제의 운세"));
        }

        let response = handle_check_fortune(State(state), Json(profile()))
            .await
            .unwrap()
            .0;
        assert!(!response.cached);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_section_lookup_without_document_yields_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(CannedGenerator::new(RAW), &dir);

        let response = handle_today_section(State(state), Path("금전운".to_string()))
            .await
            .unwrap()
            .0;
        assert_eq!(response.category, "금전운");
        assert_eq!(response.text, SECTION_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_section_lookup_finds_cached_block() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(CannedGenerator::new(RAW), &dir);

        handle_check_fortune(State(state.clone()), Json(profile()))
            .await
            .unwrap();

        let response = handle_today_section(State(state), Path("애정운".to_string()))
            .await
            .unwrap()
            .0;
        assert_eq!(response.text, "애정운: 설레는 만남이 있습니다");
    }
}
