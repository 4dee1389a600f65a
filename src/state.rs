//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::generation::{GeminiProvider, GenerationProvider, NoteGenerator};
use crate::session::{SessionController, SessionStore};
use crate::storage::{LocalNoteStorage, NoteStorage, UploadStaging};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn NoteStorage>,
    pub controller: SessionController,
    pub sessions: SessionStore,
}

impl AppState {
    /// Wire the Gemini provider and local folders described by `config`.
    pub fn new_with_config(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        config.ensure_folders()?;

        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(std::time::Duration::from_secs(900))
            .user_agent("note-maker-server/0.1")
            .build()?;

        let provider = Arc::new(GeminiProvider::new(
            http_client,
            config.gemini_base_url.clone(),
            config.google_api_key.clone(),
        ));
        let storage = Arc::new(LocalNoteStorage::new(config.notes_folder.clone()));

        Ok(Self::new_with_parts(config, storage, provider))
    }

    /// Build state around caller-supplied storage and provider.
    pub fn new_with_parts(
        config: AppConfig,
        storage: Arc<dyn NoteStorage>,
        provider: Arc<dyn GenerationProvider>,
    ) -> Self {
        let staging = UploadStaging::new(config.upload_folder.clone());
        let controller = SessionController::new(storage.clone(), staging, NoteGenerator::new(provider));

        Self {
            config: Arc::new(config),
            storage,
            controller,
            sessions: SessionStore::default(),
        }
    }
}
