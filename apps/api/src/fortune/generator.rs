//! Fortune generation — pluggable, trait-based client for the external text
//! generator.
//!
//! Default: `LlmFortuneGenerator` (Claude via `llm_client`). Tests substitute
//! canned generators. The generator is a black box to the rest of the app:
//! it takes a profile and yields one opaque text blob, or fails.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::fortune::profile::UserProfile;
use crate::fortune::prompts::{FORTUNE_PROMPT_TEMPLATE, FORTUNE_SYSTEM};
use crate::llm_client::LlmClient;

/// The generator trait. Carried in `AppState` as `Arc<dyn FortuneGenerator>`
/// so the backend can be swapped without touching handler code.
#[async_trait]
pub trait FortuneGenerator: Send + Sync {
    /// Produces one raw fortune text for the given profile.
    async fn generate(&self, profile: &UserProfile) -> Result<String, AppError>;
}

/// Claude-backed generator. All LLM interaction goes through `LlmClient`.
pub struct LlmFortuneGenerator {
    llm: LlmClient,
}

impl LlmFortuneGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl FortuneGenerator for LlmFortuneGenerator {
    async fn generate(&self, profile: &UserProfile) -> Result<String, AppError> {
        let prompt = build_prompt(profile);
        self.llm
            .call_text(&prompt, FORTUNE_SYSTEM)
            .await
            .map_err(|e| AppError::Generator(format!("fortune generation failed: {e}")))
    }
}

/// Fills the user-message template from a profile.
fn build_prompt(profile: &UserProfile) -> String {
    FORTUNE_PROMPT_TEMPLATE
        .replace("{name}", &profile.name)
        .replace("{gender}", profile.gender.label())
        .replace(
            "{birthdate}",
            &profile.birthdate.format("%Y-%m-%d").to_string(),
        )
        .replace("{calendar}", profile.calendar.label())
}
