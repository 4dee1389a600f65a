//! Markdown to PDF export.

pub mod markdown;
pub mod pdf;

pub use markdown::{clean_markdown_text, parse_blocks, Block};
pub use pdf::{PageLayout, PdfRenderer};

use thiserror::Error;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to encode page content: {0}")]
    Encode(String),
    #[error("Failed to write PDF document: {0}")]
    Write(String),
}

/// Render note markdown into PDF bytes titled `target_name`.
pub fn render(markdown: &str, target_name: &str) -> Result<Vec<u8>, RenderError> {
    let blocks = parse_blocks(markdown);
    log::debug!("Rendering {} blocks into {}", blocks.len(), target_name);
    PdfRenderer::default().render(&blocks, target_name)
}
