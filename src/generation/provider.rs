use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::GenerationError;

/// Capability a model must declare to be usable for single-shot generation.
pub const GENERATE_CONTENT_METHOD: &str = "generateContent";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|method| method == GENERATE_CONTENT_METHOD)
    }
}

/// Hosted text-generation service.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Every model the provider reports, with its declared capabilities.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError>;

    /// One blocking completion; the raw response text.
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, GenerationError>;
}
