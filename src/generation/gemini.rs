//! Google Gemini REST client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::provider::{GenerationProvider, ModelInfo};
use super::GenerationError;

const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";
const MODELS_PAGE_SIZE: u32 = 1000;

pub struct GeminiProvider {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn models_url(&self) -> String {
        format!("{}/{}/models", self.base_url, API_VERSION)
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/{}/{}:generateContent",
            self.base_url,
            API_VERSION,
            qualified_model_name(model)
        )
    }
}

/// Gemini addresses models as `models/{id}`.
pub fn qualified_model_name(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated.
    pub(crate) fn into_text(self) -> Result<String, GenerationError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            Err(GenerationError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

async fn provider_error(response: reqwest::Response) -> GenerationError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);
    GenerationError::Provider { status, message }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http_client
                .get(self.models_url())
                .header(API_KEY_HEADER, &self.api_key)
                .query(&[("pageSize", MODELS_PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(provider_error(response).await);
            }

            let page: ListModelsResponse = response.json().await?;
            models.extend(page.models);

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        log::debug!("Gemini reported {} models", models.len());
        Ok(models)
    }

    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        let response = self
            .http_client
            .post(self.generate_url(model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GeminiProvider {
        GeminiProvider::new(reqwest::Client::new(), "https://example.test/", "key")
    }

    #[test]
    fn test_urls() {
        let provider = provider();
        assert_eq!(provider.models_url(), "https://example.test/v1beta/models");
        assert_eq!(
            provider.generate_url("gemini-pro"),
            "https://example.test/v1beta/models/gemini-pro:generateContent"
        );
        assert_eq!(
            provider.generate_url("models/gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_list_models_response_parsing() {
        let json = r#"{
            "models": [
                {"name": "models/gemini-pro", "supportedGenerationMethods": ["generateContent", "countTokens"]},
                {"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]}
            ],
            "nextPageToken": "abc"
        }"#;

        let parsed: ListModelsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.models.len(), 2);
        assert!(parsed.models[0].supports_generation());
        assert!(!parsed.models[1].supports_generation());
        assert_eq!(parsed.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: "hello" }],
            }],
            generation_config: GenerationConfig { temperature: 0.7 },
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert!((value["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let json = r##"{"candidates": [{"content": {"parts": [{"text": "# Notes\n"}, {"text": "body"}]}}]}"##;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "# Notes\nbody");
    }

    #[test]
    fn test_response_without_text_is_empty_response() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(matches!(parsed.into_text(), Err(GenerationError::EmptyResponse)));

        let none: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(none.into_text(), Err(GenerationError::EmptyResponse)));
    }
}
