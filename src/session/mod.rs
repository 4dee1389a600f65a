//! Interactive note sessions.
//!
//! A session is the server-side counterpart of one browser tab: the note being
//! viewed or edited and the delete confirmations it has armed. Sessions live in
//! memory only.

pub mod controller;
pub mod handlers;
pub mod state;
pub mod store;

pub use controller::{SessionController, SessionSnapshot};
pub use state::{DeleteState, GenerationGuard, NoteSession, SessionPhase};
pub use store::{SessionStore, SharedSession};

use actix_web::HttpResponse;
use thiserror::Error;

use crate::generation::GenerationError;
use crate::render::RenderError;
use crate::storage::StorageError;
use crate::ErrorResponse;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    InvalidTransition(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<SessionError> for HttpResponse {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::InvalidInput(message) => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message))
            }
            SessionError::InvalidTransition(message) => {
                HttpResponse::Conflict().json(ErrorResponse::conflict(&message))
            }
            SessionError::Storage(e) => e.into(),
            SessionError::Generation(e) => e.into(),
            SessionError::Render(e) => {
                HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
            }
        }
    }
}
