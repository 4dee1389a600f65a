//! Source documents: upload parsing and text extraction.

pub mod extractor;
pub mod multipart;

pub use extractor::{extract, try_extract, ExtractedText, ExtractionError};
pub use multipart::{MultipartParseError, MultipartParser, PdfUpload};
