//! Flat-folder note storage and upload staging.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use actix_web::HttpResponse;
use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

use crate::note::naming::default_note_filename;
use crate::ErrorResponse;

/// Extensions that `list` treats as notes.
const NOTE_EXTENSIONS: [&str; 2] = ["md", "txt"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid note filename '{0}'")]
    InvalidFilename(String),
    #[error("note '{0}' not found")]
    NotFound(String),
    #[error("note '{0}' is not valid UTF-8")]
    InvalidUtf8(String),
    #[error("storage I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<StorageError> for HttpResponse {
    fn from(error: StorageError) -> Self {
        match &error {
            StorageError::InvalidFilename(_) => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string()))
            }
            StorageError::NotFound(_) => {
                HttpResponse::NotFound().json(ErrorResponse::not_found(&error.to_string()))
            }
            StorageError::InvalidUtf8(_) | StorageError::Io { .. } => {
                log::error!("Storage failure: {}", error);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::internal_error(&error.to_string()))
            }
        }
    }
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Persistence seam for notes, keyed by filename.
#[async_trait]
pub trait NoteStorage: Send + Sync {
    /// Write `content` under `filename`, or under a timestamped name when none is given.
    async fn save(&self, content: &str, filename: Option<&str>) -> Result<PathBuf, StorageError>;
    /// All note filenames, most recent-looking first.
    async fn list(&self) -> Result<Vec<String>, StorageError>;
    async fn read(&self, filename: &str) -> Result<String, StorageError>;
    /// Overwrite a note; last write wins.
    async fn update(&self, filename: &str, content: &str) -> Result<PathBuf, StorageError>;
    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, filename: &str) -> Result<bool, StorageError>;
    async fn exists(&self, filename: &str) -> Result<bool, StorageError>;
}

/// Accept only plain file names that stay inside the notes folder.
pub fn validate_filename(filename: &str) -> Result<(), StorageError> {
    let trimmed = filename.trim();
    let valid = !trimmed.is_empty()
        && trimmed == filename
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\'])
        && sanitize_filename::is_sanitized(filename);

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidFilename(filename.to_string()))
    }
}

fn has_note_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| NOTE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Notes kept as UTF-8 files in one directory.
#[derive(Debug, Clone)]
pub struct LocalNoteStorage {
    root: PathBuf,
}

impl LocalNoteStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn note_path(&self, filename: &str) -> Result<PathBuf, StorageError> {
        validate_filename(filename)?;
        Ok(self.root.join(filename))
    }

    async fn write(&self, filename: &str, content: &str) -> Result<PathBuf, StorageError> {
        let path = self.note_path(filename)?;
        fs::write(&path, content.as_bytes())
            .await
            .map_err(|e| StorageError::io(&path, e))?;
        Ok(path)
    }
}

#[async_trait]
impl NoteStorage for LocalNoteStorage {
    async fn save(&self, content: &str, filename: Option<&str>) -> Result<PathBuf, StorageError> {
        let filename = match filename {
            Some(name) => name.to_string(),
            None => default_note_filename(chrono::Local::now().naive_local()),
        };
        let path = self.write(&filename, content).await?;
        log::info!("Saved note '{}' ({} bytes)", filename, content.len());
        Ok(path)
    }

    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| StorageError::io(&self.root, e))?;

        let mut notes = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&self.root, e))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                log::warn!("Skipping note entry with a non UTF-8 name");
                continue;
            };
            if has_note_extension(&name) {
                notes.push(name);
            }
        }

        notes.sort_unstable_by(|a, b| b.cmp(a));
        log::debug!("Listed {} notes in {}", notes.len(), self.root.display());
        Ok(notes)
    }

    async fn read(&self, filename: &str) -> Result<String, StorageError> {
        let path = self.note_path(filename)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(filename.to_string()))
            }
            Err(e) => return Err(StorageError::io(&path, e)),
        };
        String::from_utf8(bytes).map_err(|_| StorageError::InvalidUtf8(filename.to_string()))
    }

    async fn update(&self, filename: &str, content: &str) -> Result<PathBuf, StorageError> {
        let path = self.write(filename, content).await?;
        log::info!("Updated note '{}' ({} bytes)", filename, content.len());
        Ok(path)
    }

    async fn delete(&self, filename: &str) -> Result<bool, StorageError> {
        let path = self.note_path(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                log::info!("Deleted note '{}'", filename);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Delete requested for missing note '{}'", filename);
                Ok(false)
            }
            Err(e) => Err(StorageError::io(&path, e)),
        }
    }

    async fn exists(&self, filename: &str) -> Result<bool, StorageError> {
        let path = self.note_path(filename)?;
        fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::io(&path, e))
    }
}

/// Staging area for uploaded source documents.
#[derive(Debug, Clone)]
pub struct UploadStaging {
    root: PathBuf,
}

impl UploadStaging {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store an upload as `{uuid}.{original extension}` and return its path.
    pub async fn stage(&self, data: &[u8], original_name: &str) -> Result<PathBuf, StorageError> {
        let sanitized = sanitize_filename::sanitize(original_name);
        let staged_name = match Path::new(&sanitized)
            .extension()
            .and_then(std::ffi::OsStr::to_str)
        {
            Some(ext) if !ext.is_empty() => format!("{}.{}", Uuid::new_v4(), ext),
            _ => Uuid::new_v4().to_string(),
        };

        let path = self.root.join(staged_name);
        fs::write(&path, data)
            .await
            .map_err(|e| StorageError::io(&path, e))?;
        log::debug!(
            "Staged upload '{}' as {} ({} bytes)",
            original_name,
            path.display(),
            data.len()
        );
        Ok(path)
    }
}
