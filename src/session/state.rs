use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::SessionError;

/// Where a session is in the generate / view / edit cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Generating,
    Viewing,
    Editing { draft: String },
}

/// Two-phase delete confirmation for a single filename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeleteState {
    #[default]
    Idle,
    Pending,
}

/// Ephemeral state of one interactive session. Nothing here is persisted.
#[derive(Debug, Default)]
pub struct NoteSession {
    current_note: Option<String>,
    current_filename: Option<String>,
    phase: SessionPhase,
    deletes: HashMap<String, DeleteState>,
}

impl NoteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn current_note(&self) -> Option<&str> {
        self.current_note.as_deref()
    }

    pub fn current_filename(&self) -> Option<&str> {
        self.current_filename.as_deref()
    }

    pub fn delete_state(&self, filename: &str) -> DeleteState {
        self.deletes.get(filename).copied().unwrap_or_default()
    }

    /// Filenames with an armed delete, sorted.
    pub fn pending_deletes(&self) -> Vec<String> {
        let mut pending: Vec<String> = self
            .deletes
            .iter()
            .filter(|(_, state)| **state == DeleteState::Pending)
            .map(|(filename, _)| filename.clone())
            .collect();
        pending.sort();
        pending
    }

    /// Enter `Generating`. The returned guard restores the previous phase when
    /// dropped without [`GenerationGuard::finish`], including when the request
    /// future is cancelled mid-call.
    pub fn start_generation(&mut self) -> Result<GenerationGuard<'_>, SessionError> {
        match self.phase {
            SessionPhase::Idle | SessionPhase::Viewing => {
                let previous = std::mem::replace(&mut self.phase, SessionPhase::Generating);
                Ok(GenerationGuard {
                    session: self,
                    previous: Some(previous),
                })
            }
            SessionPhase::Generating => Err(SessionError::InvalidTransition(
                "a generation request is already in progress".into(),
            )),
            SessionPhase::Editing { .. } => Err(SessionError::InvalidTransition(
                "save or cancel the current edit before generating".into(),
            )),
        }
    }

    /// Load a note into the viewer, discarding any unsaved draft.
    pub fn show(&mut self, filename: String, content: String) {
        self.current_filename = Some(filename);
        self.current_note = Some(content);
        self.phase = SessionPhase::Viewing;
    }

    pub fn begin_edit(&mut self) -> Result<String, SessionError> {
        if self.phase != SessionPhase::Viewing {
            return Err(SessionError::InvalidTransition(
                "only a note that is being viewed can be edited".into(),
            ));
        }
        let draft = self.current_note.clone().ok_or_else(|| {
            SessionError::InvalidTransition("no note is loaded".into())
        })?;
        self.phase = SessionPhase::Editing {
            draft: draft.clone(),
        };
        Ok(draft)
    }

    /// The filename being edited; fails unless the session is editing.
    pub fn editing_filename(&self) -> Result<&str, SessionError> {
        match (&self.phase, self.current_filename.as_deref()) {
            (SessionPhase::Editing { .. }, Some(filename)) => Ok(filename),
            _ => Err(SessionError::InvalidTransition("the session is not editing".into())),
        }
    }

    pub fn commit_edit(&mut self, content: String) -> Result<(), SessionError> {
        self.editing_filename()?;
        self.current_note = Some(content);
        self.phase = SessionPhase::Viewing;
        Ok(())
    }

    pub fn cancel_edit(&mut self) -> Result<(), SessionError> {
        self.editing_filename()?;
        self.phase = SessionPhase::Viewing;
        Ok(())
    }

    pub fn arm_delete(&mut self, filename: &str) {
        self.deletes.insert(filename.to_string(), DeleteState::Pending);
    }

    /// Clear the flag for `filename`, failing if it was not armed.
    pub fn take_pending_delete(&mut self, filename: &str) -> Result<(), SessionError> {
        match self.deletes.remove(filename) {
            Some(DeleteState::Pending) => Ok(()),
            _ => Err(SessionError::InvalidTransition(format!(
                "delete of '{}' was not requested",
                filename
            ))),
        }
    }

    pub fn disarm_delete(&mut self, filename: &str) {
        self.deletes.remove(filename);
    }

    /// Drop the loaded note if it was `filename`.
    pub fn forget(&mut self, filename: &str) {
        if self.current_filename.as_deref() == Some(filename) {
            self.current_filename = None;
            self.current_note = None;
            self.phase = SessionPhase::Idle;
        }
    }
}

/// A session held in `Generating` for the duration of one provider call.
pub struct GenerationGuard<'a> {
    session: &'a mut NoteSession,
    previous: Option<SessionPhase>,
}

impl GenerationGuard<'_> {
    /// Show the generated note; the session moves to `Viewing`.
    pub fn finish(mut self, filename: String, content: String) {
        self.previous = None;
        self.session.show(filename, content);
    }
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            if self.session.phase == SessionPhase::Generating {
                self.session.phase = previous;
            }
        }
    }
}
