use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::HttpResponse;

use crate::note::naming::pdf_filename_for;
use crate::render::{self, RenderError, PDF_CONTENT_TYPE};

pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

/// A downloadable rendition of a note.
#[derive(Debug, Clone)]
pub struct ExportedNote {
    pub filename: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

impl ExportedNote {
    pub fn markdown(filename: &str, content: &str) -> Self {
        Self {
            filename: filename.to_string(),
            content_type: MARKDOWN_CONTENT_TYPE,
            data: content.as_bytes().to_vec(),
        }
    }

    pub fn pdf(filename: &str, content: &str) -> Result<Self, RenderError> {
        let pdf_name = pdf_filename_for(filename);
        let data = render::render(content, &pdf_name)?;
        Ok(Self {
            filename: pdf_name,
            content_type: PDF_CONTENT_TYPE,
            data,
        })
    }

    pub fn into_response(self) -> HttpResponse {
        HttpResponse::Ok()
            .content_type(self.content_type)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(self.filename)],
            })
            .body(self.data)
    }
}
