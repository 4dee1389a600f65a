use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct Note {
    #[schema(example = "Python_Functions_20250309_140507.md")]
    pub filename: String,
    #[schema(example = "# Python Functions\n\n## Introduction\n...")]
    pub content: String,
}

impl Note {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteListResponse {
    pub notes: Vec<String>,
    #[schema(example = "No notes found. Create some notes first!")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveNoteRequest {
    #[schema(example = "# My note\n\nSome text")]
    pub content: String,
    /// Generated as `note_{timestamp}.md` when omitted.
    #[schema(example = "my_note.md")]
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    #[schema(example = "# My note\n\nEdited text")]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteNoteResponse {
    pub filename: String,
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteDigest {
    pub filename: String,
    pub key_points: String,
    pub summary: String,
}
