use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures::StreamExt;
use log::debug;
use sanitize_filename::sanitize;

use crate::ErrorResponse;

const PDF_MIME: &str = "application/pdf";

/// A PDF upload together with the optional focus topic sent beside it.
#[derive(Debug)]
pub struct PdfUpload {
    pub data: Vec<u8>,
    pub filename: String,
    pub topic: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MultipartParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid UTF-8 data: {0}")]
    Utf8Error(String),
    #[error("No file data found in multipart payload")]
    MissingFile,
    #[error("Unsupported upload '{0}': only PDF files are accepted")]
    NotPdf(String),
}

impl From<MultipartParseError> for HttpResponse {
    fn from(error: MultipartParseError) -> Self {
        match error {
            MultipartParseError::IoError(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&error.to_string())),
            _ => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string())),
        }
    }
}

/// True when the name ends in `.pdf` or the bytes start with the `%PDF` magic.
pub fn is_pdf_upload(filename: &str, data: &[u8]) -> bool {
    let by_name = mime_guess::from_path(filename).first_raw() == Some(PDF_MIME);
    by_name || data.starts_with(b"%PDF")
}

pub struct MultipartParser;

impl MultipartParser {
    /// Read a `file` field (required) and a `topic` field (optional).
    pub async fn parse_pdf_upload(mut multipart: Multipart) -> Result<PdfUpload, MultipartParseError> {
        let mut data = Vec::new();
        let mut filename = String::new();
        let mut topic: Option<String> = None;

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| MultipartParseError::FieldError(e.to_string()))?;
            let content_disposition = field
                .content_disposition()
                .ok_or_else(|| MultipartParseError::FieldError("Content disposition not found".to_string()))?;
            let field_name = content_disposition
                .get_name()
                .ok_or_else(|| MultipartParseError::FieldError("Field name not found".to_string()))?
                .to_string();

            match field_name.as_str() {
                "file" => {
                    let original = content_disposition
                        .get_filename()
                        .ok_or_else(|| MultipartParseError::FieldError("No filename in file field".to_string()))?;
                    filename = sanitize(original);

                    while let Some(chunk) = field.next().await {
                        let chunk = chunk.map_err(|e| MultipartParseError::IoError(e.to_string()))?;
                        data.extend_from_slice(&chunk);
                    }
                }
                "topic" => {
                    let mut bytes = Vec::new();
                    while let Some(chunk) = field.next().await {
                        let chunk = chunk.map_err(|e| MultipartParseError::IoError(e.to_string()))?;
                        bytes.extend_from_slice(&chunk);
                    }
                    let value = String::from_utf8(bytes)
                        .map_err(|e| MultipartParseError::Utf8Error(e.to_string()))?;
                    let value = value.trim();
                    if !value.is_empty() {
                        topic = Some(value.to_string());
                    }
                }
                other => {
                    debug!("Ignoring multipart field '{}'", other);
                    continue;
                }
            }
        }

        if data.is_empty() {
            return Err(MultipartParseError::MissingFile);
        }
        if !is_pdf_upload(&filename, &data) {
            return Err(MultipartParseError::NotPdf(filename));
        }

        Ok(PdfUpload { data, filename, topic })
    }
}
