use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::state::{GenerationGuard, NoteSession, SessionPhase};
use super::SessionError;
use crate::document::{self, PdfUpload};
use crate::generation::NoteGenerator;
use crate::note::export::ExportedNote;
use crate::note::models::Note;
use crate::note::naming::{pdf_note_filename, topic_note_filename};
use crate::storage::{validate_filename, NoteStorage, UploadStaging};

/// What a client sees of a session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionSnapshot {
    pub id: Uuid,
    #[serde(flatten)]
    pub phase: SessionPhase,
    pub current_filename: Option<String>,
    pub current_note: Option<String>,
    pub pending_deletes: Vec<String>,
}

/// Drives a [`NoteSession`] through its transitions. All side effects go
/// through the storage and generation seams; the controller keeps no state
/// of its own.
#[derive(Clone)]
pub struct SessionController {
    storage: Arc<dyn NoteStorage>,
    staging: UploadStaging,
    generator: NoteGenerator,
}

impl SessionController {
    pub fn new(storage: Arc<dyn NoteStorage>, staging: UploadStaging, generator: NoteGenerator) -> Self {
        Self {
            storage,
            staging,
            generator,
        }
    }

    pub fn storage(&self) -> &Arc<dyn NoteStorage> {
        &self.storage
    }

    pub fn generator(&self) -> &NoteGenerator {
        &self.generator
    }

    pub async fn generate_from_topic(
        &self,
        session: &mut NoteSession,
        topic: &str,
        subject: &str,
    ) -> Result<Note, SessionError> {
        let topic = topic.trim();
        let subject = subject.trim();
        if topic.is_empty() || subject.is_empty() {
            return Err(SessionError::InvalidInput(
                "Please enter both topic and subject".into(),
            ));
        }

        let filename = topic_note_filename(subject, topic, chrono::Local::now().naive_local());
        validate_filename(&filename)?;

        log::info!("Generating notes for topic '{}' in subject '{}'", topic, subject);
        let generation = session.start_generation()?;

        let result = async {
            let content = self.generator.notes_from_topic(topic, subject).await?;
            self.storage.save(&content, Some(&filename)).await?;
            Ok::<_, SessionError>(Note::new(filename, content))
        }
        .await;

        settle_generation(generation, result)
    }

    pub async fn generate_from_pdf(
        &self,
        session: &mut NoteSession,
        upload: PdfUpload,
    ) -> Result<Note, SessionError> {
        if upload.data.is_empty() {
            return Err(SessionError::InvalidInput("Please upload a PDF file".into()));
        }

        log::info!(
            "Generating notes from uploaded PDF '{}' ({} bytes)",
            upload.filename,
            upload.data.len()
        );
        let filename = pdf_note_filename(&upload.filename, chrono::Local::now().naive_local());
        validate_filename(&filename)?;
        let generation = session.start_generation()?;

        let result = async {
            let staged = self.staging.stage(&upload.data, &upload.filename).await?;
            log::debug!("Staged upload at {}", staged.display());

            let text = document::extract(&upload.data);
            let content = self
                .generator
                .notes_from_document(&text, upload.topic.as_deref())
                .await?;
            self.storage.save(&content, Some(&filename)).await?;
            Ok::<_, SessionError>(Note::new(filename, content))
        }
        .await;

        settle_generation(generation, result)
    }

    pub async fn list_notes(&self) -> Result<Vec<String>, SessionError> {
        Ok(self.storage.list().await?)
    }

    pub async fn view(&self, session: &mut NoteSession, filename: &str) -> Result<Note, SessionError> {
        if *session.phase() == SessionPhase::Generating {
            return Err(SessionError::InvalidTransition(
                "a generation request is in progress".into(),
            ));
        }
        let content = self.storage.read(filename).await?;
        session.show(filename.to_string(), content.clone());
        Ok(Note::new(filename, content))
    }

    pub fn begin_edit(&self, session: &mut NoteSession) -> Result<String, SessionError> {
        session.begin_edit()
    }

    pub async fn save_edit(&self, session: &mut NoteSession, content: String) -> Result<Note, SessionError> {
        let filename = session.editing_filename()?.to_string();
        self.storage.update(&filename, &content).await?;
        log::info!("Saved edits to {}", filename);
        session.commit_edit(content.clone())?;
        Ok(Note::new(filename, content))
    }

    pub fn cancel_edit(&self, session: &mut NoteSession) -> Result<(), SessionError> {
        session.cancel_edit()
    }

    pub fn request_delete(&self, session: &mut NoteSession, filename: &str) -> Result<(), SessionError> {
        validate_filename(filename)?;
        session.arm_delete(filename);
        log::info!("Delete of {} awaiting confirmation", filename);
        Ok(())
    }

    /// Second phase of a delete. The flag is cleared whatever the outcome.
    pub async fn confirm_delete(&self, session: &mut NoteSession, filename: &str) -> Result<bool, SessionError> {
        session.take_pending_delete(filename)?;
        let deleted = self.storage.delete(filename).await?;
        if deleted {
            log::info!("Deleted note {}", filename);
            session.forget(filename);
        } else {
            log::warn!("Note {} was already gone", filename);
        }
        Ok(deleted)
    }

    pub fn cancel_delete(&self, session: &mut NoteSession, filename: &str) {
        session.disarm_delete(filename);
    }

    pub fn export_markdown(&self, session: &NoteSession) -> Result<ExportedNote, SessionError> {
        let (filename, content) = loaded_note(session)?;
        Ok(ExportedNote::markdown(filename, content))
    }

    pub fn export_pdf(&self, session: &NoteSession) -> Result<ExportedNote, SessionError> {
        let (filename, content) = loaded_note(session)?;
        Ok(ExportedNote::pdf(filename, content)?)
    }

    pub fn snapshot(&self, id: Uuid, session: &NoteSession) -> SessionSnapshot {
        SessionSnapshot {
            id,
            phase: session.phase().clone(),
            current_filename: session.current_filename().map(str::to_string),
            current_note: session.current_note().map(str::to_string),
            pending_deletes: session.pending_deletes(),
        }
    }
}

fn settle_generation(
    generation: GenerationGuard<'_>,
    result: Result<Note, SessionError>,
) -> Result<Note, SessionError> {
    match result {
        Ok(note) => {
            log::info!("Notes saved as {}", note.filename);
            generation.finish(note.filename.clone(), note.content.clone());
            Ok(note)
        }
        Err(e) => {
            log::error!("Error generating notes: {}", e);
            Err(e)
        }
    }
}

fn loaded_note(session: &NoteSession) -> Result<(&str, &str), SessionError> {
    match (session.current_filename(), session.current_note()) {
        (Some(filename), Some(content)) => Ok((filename, content)),
        _ => Err(SessionError::InvalidTransition("no note is loaded".into())),
    }
}
