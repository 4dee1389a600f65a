//! Note generation through a hosted language model.
//!
//! - `prompt` - fixed instruction templates for the topic and document paths
//! - `provider` - the narrow provider seam (`list_models`, `generate`)
//! - `gemini` - the Google Gemini REST implementation of that seam
//! - `selection` - preference-ordered model selection
//! - `client` - [`NoteGenerator`], which ties the pieces together per call

pub mod client;
pub mod gemini;
pub mod prompt;
pub mod provider;
pub mod selection;

pub use client::{NoteGenerator, GENERATION_TEMPERATURE};
pub use gemini::GeminiProvider;
pub use prompt::GenerationRequest;
pub use provider::{GenerationProvider, ModelInfo, GENERATE_CONTENT_METHOD};
pub use selection::{select_model, DEFAULT_MODEL_PREFERENCES};

use actix_web::HttpResponse;
use thiserror::Error;

use crate::ErrorResponse;

/// Errors that can occur while producing notes.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no suitable models found for generateContent with the configured credential")]
    NoModelAvailable,
    #[error("request to the generation provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generation provider returned status {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("generation provider returned no text")]
    EmptyResponse,
}

impl From<GenerationError> for HttpResponse {
    fn from(error: GenerationError) -> Self {
        log::error!("Generation failed: {}", error);
        match error {
            GenerationError::NoModelAvailable => HttpResponse::ServiceUnavailable()
                .json(ErrorResponse::service_unavailable(&error.to_string())),
            _ => HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(&error.to_string())),
        }
    }
}
