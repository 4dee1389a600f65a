use actix_web::{web, HttpResponse, Responder};
use log::{debug, error, info, warn};

use crate::note::digest::{extract_key_points, generate_summary, DEFAULT_MAX_POINTS, DEFAULT_MAX_WORDS};
use crate::note::export::ExportedNote;
use crate::note::models::{
    DeleteNoteResponse, Note, NoteDigest, NoteListResponse, SaveNoteRequest, UpdateNoteRequest,
};
use crate::{AppState, ErrorResponse};

const EMPTY_LIST_MESSAGE: &str = "No notes found. Create some notes first!";

#[utoipa::path(
    context_path = "/api",
    tag = "Note Service",
    get,
    path = "/notes",
    responses(
        (status = 200, description = "Saved note filenames, newest first", body = NoteListResponse),
        (status = 500, description = "Notes folder unreadable", body = ErrorResponse)
    )
)]
pub async fn list_notes(data: web::Data<AppState>) -> impl Responder {
    info!("Executing list_notes handler");
    match data.controller.list_notes().await {
        Ok(notes) => {
            debug!("Found {} notes", notes.len());
            let message = notes.is_empty().then(|| EMPTY_LIST_MESSAGE.to_string());
            HttpResponse::Ok().json(NoteListResponse { notes, message })
        }
        Err(e) => {
            error!("Failed to list notes: {}", e);
            e.into()
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Note Service",
    post,
    path = "/notes",
    request_body = SaveNoteRequest,
    responses(
        (status = 201, description = "Note saved", body = Note),
        (status = 400, description = "Invalid filename", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn save_note(req: web::Json<SaveNoteRequest>, data: web::Data<AppState>) -> impl Responder {
    info!("Executing save_note handler");
    let SaveNoteRequest { content, filename } = req.into_inner();

    match data.storage.save(&content, filename.as_deref()).await {
        Ok(path) => {
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            HttpResponse::Created().json(Note::new(filename, content))
        }
        Err(e) => {
            error!("Failed to save note: {}", e);
            e.into()
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Note Service",
    get,
    path = "/notes/{filename}",
    responses(
        (status = 200, description = "Note content", body = Note),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    params(
        ("filename" = String, Path, description = "Note filename")
    )
)]
pub async fn get_note(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let filename = path.into_inner();
    info!("Executing get_note handler for {}", filename);
    match data.storage.read(&filename).await {
        Ok(content) => HttpResponse::Ok().json(Note::new(filename, content)),
        Err(e) => {
            warn!("Failed to read note {}: {}", filename, e);
            e.into()
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Note Service",
    put,
    path = "/notes/{filename}",
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note overwritten", body = Note),
        (status = 400, description = "Invalid filename", body = ErrorResponse)
    ),
    params(
        ("filename" = String, Path, description = "Note filename")
    )
)]
pub async fn update_note(
    path: web::Path<String>,
    req: web::Json<UpdateNoteRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let filename = path.into_inner();
    info!("Executing update_note handler for {}", filename);
    let content = req.into_inner().content;

    match data.storage.update(&filename, &content).await {
        Ok(_) => HttpResponse::Ok().json(Note::new(filename, content)),
        Err(e) => {
            error!("Failed to update note {}: {}", filename, e);
            e.into()
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Note Service",
    delete,
    path = "/notes/{filename}",
    responses(
        (status = 200, description = "Note deleted", body = DeleteNoteResponse),
        (status = 404, description = "Nothing to delete", body = DeleteNoteResponse)
    ),
    params(
        ("filename" = String, Path, description = "Note filename")
    )
)]
pub async fn delete_note(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let filename = path.into_inner();
    info!("Executing delete_note handler for {}", filename);

    match data.storage.delete(&filename).await {
        Ok(true) => HttpResponse::Ok().json(DeleteNoteResponse {
            filename,
            deleted: true,
        }),
        Ok(false) => HttpResponse::NotFound().json(DeleteNoteResponse {
            filename,
            deleted: false,
        }),
        Err(e) => {
            error!("Failed to delete note {}: {}", filename, e);
            e.into()
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Note Service",
    get,
    path = "/notes/{filename}/export/markdown",
    responses(
        (status = 200, description = "Note as a markdown download", body = String, content_type = "text/markdown"),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    params(
        ("filename" = String, Path, description = "Note filename")
    )
)]
pub async fn export_markdown(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let filename = path.into_inner();
    info!("Exporting {} as markdown", filename);
    match data.storage.read(&filename).await {
        Ok(content) => ExportedNote::markdown(&filename, &content).into_response(),
        Err(e) => e.into(),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Note Service",
    get,
    path = "/notes/{filename}/export/pdf",
    responses(
        (status = 200, description = "Note rendered as a PDF download", body = Vec<u8>, content_type = "application/pdf"),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    ),
    params(
        ("filename" = String, Path, description = "Note filename")
    )
)]
pub async fn export_pdf(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let filename = path.into_inner();
    info!("Exporting {} as PDF", filename);
    let content = match data.storage.read(&filename).await {
        Ok(content) => content,
        Err(e) => return e.into(),
    };

    match ExportedNote::pdf(&filename, &content) {
        Ok(export) => {
            debug!("Rendered {} ({} bytes)", export.filename, export.data.len());
            export.into_response()
        }
        Err(e) => {
            error!("Error creating PDF for {}: {}", filename, e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Note Service",
    get,
    path = "/notes/{filename}/digest",
    responses(
        (status = 200, description = "Key points and a capped summary", body = NoteDigest),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    params(
        ("filename" = String, Path, description = "Note filename")
    )
)]
pub async fn get_digest(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let filename = path.into_inner();
    match data.storage.read(&filename).await {
        Ok(content) => HttpResponse::Ok().json(NoteDigest {
            key_points: extract_key_points(&content, DEFAULT_MAX_POINTS),
            summary: generate_summary(&content, DEFAULT_MAX_WORDS),
            filename,
        }),
        Err(e) => e.into(),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/notes")
            .route(web::get().to(list_notes))
            .route(web::post().to(save_note)),
    )
    .service(
        web::resource("/notes/{filename}")
            .route(web::get().to(get_note))
            .route(web::put().to(update_note))
            .route(web::delete().to(delete_note)),
    )
    .service(web::resource("/notes/{filename}/export/markdown").route(web::get().to(export_markdown)))
    .service(web::resource("/notes/{filename}/export/pdf").route(web::get().to(export_pdf)))
    .service(web::resource("/notes/{filename}/digest").route(web::get().to(get_digest)));
}
