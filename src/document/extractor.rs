//! PDF text extraction.
//!
//! Pages are read with [`lopdf`] in document order. `lopdf` can panic on
//! malformed input, so parsing runs inside [`std::panic::catch_unwind`] and
//! panics surface as [`ExtractionError::Malformed`].

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use thiserror::Error;

/// Upper bound on extracted characters handed to the prompt.
pub const MAX_EXTRACTED_CHARS: usize = 10_000;
pub const TRUNCATION_MARKER: &str = "... (truncated)";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not open PDF: {0}")]
    Open(String),
    #[error("PDF is encrypted")]
    Encrypted,
    #[error("malformed PDF document")]
    Malformed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub text: String,
    pub pages: usize,
    pub truncated: bool,
}

/// Extract and bound the text of a PDF, reporting failures as errors.
pub fn try_extract(data: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let pages = extract_pages(data)?;
    let page_count = pages.len();
    let joined = pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let (text, truncated) = truncate_text(&joined, MAX_EXTRACTED_CHARS);
    if truncated {
        log::debug!(
            "Extracted text truncated to {} characters ({} pages)",
            MAX_EXTRACTED_CHARS,
            page_count
        );
    }

    Ok(ExtractedText {
        text,
        pages: page_count,
        truncated,
    })
}

/// Extract the text of a PDF.
///
/// Failures come back as an inline `Error processing PDF: ...` message rather
/// than an error value, so an unreadable document and its text share one
/// channel. Callers that need to tell them apart use [`try_extract`].
pub fn extract(data: &[u8]) -> String {
    match try_extract(data) {
        Ok(extracted) => extracted.text,
        Err(e) => {
            log::warn!("PDF extraction failed: {}", e);
            format!("Error processing PDF: {}", e)
        }
    }
}

/// Keep the first `max_chars` characters, appending [`TRUNCATION_MARKER`] when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => (format!("{}{}", &text[..cut], TRUNCATION_MARKER), true),
        None => (text.to_string(), false),
    }
}

fn extract_pages(data: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let document = Document::load_mem(data).map_err(|e| ExtractionError::Open(e.to_string()))?;
        if document.is_encrypted() {
            return Err(ExtractionError::Encrypted);
        }

        let pages = document
            .get_pages()
            .keys()
            .map(|&number| match document.extract_text(&[number]) {
                Ok(text) => text,
                Err(e) => {
                    log::debug!("No text extracted from page {}: {}", number, e);
                    String::new()
                }
            })
            .collect();
        Ok(pages)
    }));

    match result {
        Ok(pages) => pages,
        Err(_) => Err(ExtractionError::Malformed),
    }
}
