use std::sync::Arc;

use super::prompt::GenerationRequest;
use super::provider::GenerationProvider;
use super::selection::{select_model, DEFAULT_MODEL_PREFERENCES};
use super::GenerationError;

/// Sampling temperature for every note generation call.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Generation client: discovers models, selects one, and issues a single completion.
///
/// Model discovery runs on every call, so the effective model follows whatever
/// the provider currently offers.
#[derive(Clone)]
pub struct NoteGenerator {
    provider: Arc<dyn GenerationProvider>,
    preferences: Vec<String>,
    temperature: f32,
}

impl NoteGenerator {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self::with_preferences(
            provider,
            DEFAULT_MODEL_PREFERENCES.iter().map(|m| m.to_string()).collect(),
        )
    }

    pub fn with_preferences(provider: Arc<dyn GenerationProvider>, preferences: Vec<String>) -> Self {
        Self {
            provider,
            preferences,
            temperature: GENERATION_TEMPERATURE,
        }
    }

    pub fn preferences(&self) -> &[String] {
        &self.preferences
    }

    /// Names of models that support single-shot text generation.
    pub async fn list_available_models(&self) -> Result<Vec<String>, GenerationError> {
        let models = self.provider.list_models().await?;
        Ok(models
            .into_iter()
            .filter(|model| model.supports_generation())
            .map(|model| model.name)
            .collect())
    }

    pub async fn select_model(&self) -> Result<String, GenerationError> {
        let available = self.list_available_models().await?;
        select_model(&available, &self.preferences)
    }

    /// Run `prompt` against the currently selected model.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let model = self.select_model().await?;
        log::info!("Using model: {}", model);

        let text = self.provider.generate(prompt, &model, self.temperature).await?;
        log::debug!("Model {} returned {} characters", model, text.len());
        Ok(text)
    }

    pub async fn notes_for(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.generate(&request.prompt()).await
    }

    pub async fn notes_from_topic(&self, topic: &str, subject: &str) -> Result<String, GenerationError> {
        self.notes_for(&GenerationRequest::Topic {
            topic: topic.to_string(),
            subject: subject.to_string(),
        })
        .await
    }

    pub async fn notes_from_document(
        &self,
        extracted_text: &str,
        topic: Option<&str>,
    ) -> Result<String, GenerationError> {
        self.notes_for(&GenerationRequest::Document {
            extracted_text: extracted_text.to_string(),
            topic: topic.map(str::to_string),
        })
        .await
    }
}
