#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use note_maker_server::generation::{GenerationError, GenerationProvider, ModelInfo};
use note_maker_server::storage::LocalNoteStorage;
use note_maker_server::{AppConfig, AppState};
use tempfile::TempDir;

pub const TEST_API_KEY: &str = "AIzaTestKey0123456789";

/// In-memory provider that records every prompt it receives.
pub struct MockGenerationProvider {
    models: Vec<ModelInfo>,
    reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockGenerationProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            models: vec![ModelInfo {
                name: "models/gemini-pro".to_string(),
                supported_generation_methods: vec!["generateContent".to_string()],
            }],
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Reports no usable models.
    pub fn without_models() -> Self {
        Self {
            models: Vec::new(),
            ..Self::replying("unused")
        }
    }

    /// Lists models but every generate call fails upstream.
    pub fn failing() -> Self {
        Self {
            reply: None,
            ..Self::replying("unused")
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationProvider for MockGenerationProvider {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError> {
        Ok(self.models.clone())
    }

    async fn generate(&self, prompt: &str, _model: &str, _temperature: f32) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().ok_or(GenerationError::Provider {
            status: 500,
            message: "mock provider failure".to_string(),
        })
    }
}

pub fn test_config(dir: &TempDir) -> AppConfig {
    let uploads = dir.path().join("uploads").display().to_string();
    let notes = dir.path().join("notes").display().to_string();
    let config = AppConfig::from_lookup(move |name| match name {
        "GOOGLE_API_KEY" => Some(TEST_API_KEY.to_string()),
        "UPLOAD_FOLDER" => Some(uploads.clone()),
        "NOTES_FOLDER" => Some(notes.clone()),
        _ => None,
    })
    .expect("test configuration is valid");
    config.ensure_folders().expect("test folders can be created");
    config
}

pub fn test_state(dir: &TempDir, provider: Arc<MockGenerationProvider>) -> web::Data<AppState> {
    let config = test_config(dir);
    let storage = Arc::new(LocalNoteStorage::new(config.notes_folder.clone()));
    web::Data::new(AppState::new_with_parts(config, storage, provider))
}

/// A `multipart/form-data` body carrying a `file` field and an optional `topic`.
pub fn multipart_body(boundary: &str, filename: &str, data: &[u8], topic: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(topic) = topic {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"topic\"\r\n\r\n{}\r\n",
                boundary, topic
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            boundary, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
