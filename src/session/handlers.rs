use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{SessionError, SessionSnapshot, SharedSession};
use crate::document::MultipartParser;
use crate::note::models::{DeleteNoteResponse, Note, UpdateNoteRequest};
use crate::{AppState, ErrorResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateTopicRequest {
    #[schema(example = "Functions")]
    pub topic: String,
    #[schema(example = "Python")]
    pub subject: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EditDraftResponse {
    pub filename: String,
    pub draft: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PdfUploadForm {
    #[allow(unused)]
    pub file: Vec<u8>,
    #[allow(unused)]
    #[schema(example = "Thermodynamics")]
    pub topic: Option<String>,
}

async fn find_session(data: &AppState, id: Uuid) -> Result<SharedSession, HttpResponse> {
    data.sessions.get(&id).await.ok_or_else(|| {
        log::warn!("Session {} not found", id);
        HttpResponse::NotFound().json(ErrorResponse::not_found(&format!("Session {} not found", id)))
    })
}

fn failure(context: &str, error: SessionError) -> HttpResponse {
    match &error {
        SessionError::InvalidInput(_) | SessionError::InvalidTransition(_) => {
            log::warn!("{}: {}", context, error)
        }
        _ => log::error!("{}: {}", context, error),
    }
    error.into()
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created", body = SessionSnapshot)
    )
)]
pub async fn create_session(data: web::Data<AppState>) -> impl Responder {
    let (id, session) = data.sessions.create().await;
    log::info!("Created session {}", id);
    let session = session.lock().await;
    HttpResponse::Created().json(data.controller.snapshot(id, &session))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    get,
    path = "/sessions/{id}",
    responses(
        (status = 200, description = "Current session state", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn get_session(path: web::Path<Uuid>, data: web::Data<AppState>) -> impl Responder {
    let id = path.into_inner();
    let session = match find_session(&data, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let session = session.lock().await;
    HttpResponse::Ok().json(data.controller.snapshot(id, &session))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    delete,
    path = "/sessions/{id}",
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn close_session(path: web::Path<Uuid>, data: web::Data<AppState>) -> impl Responder {
    let id = path.into_inner();
    if let Err(response) = find_session(&data, id).await {
        return response;
    }
    data.sessions.remove(&id).await;
    log::info!("Closed session {}", id);
    HttpResponse::NoContent().finish()
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    post,
    path = "/sessions/{id}/generate/topic",
    request_body = GenerateTopicRequest,
    responses(
        (status = 201, description = "Notes generated and saved", body = Note),
        (status = 400, description = "Topic or subject missing", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Session is busy or editing", body = ErrorResponse),
        (status = 502, description = "Generation provider failed", body = ErrorResponse),
        (status = 503, description = "No generation model available", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn generate_from_topic(
    path: web::Path<Uuid>,
    req: web::Json<GenerateTopicRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let id = path.into_inner();
    log::info!("POST /api/sessions/{}/generate/topic", id);
    let session = match find_session(&data, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut session = session.lock().await;

    match data
        .controller
        .generate_from_topic(&mut session, &req.topic, &req.subject)
        .await
    {
        Ok(note) => HttpResponse::Created().json(note),
        Err(e) => failure("Error generating notes", e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    post,
    path = "/sessions/{id}/generate/pdf",
    request_body(content = inline(PdfUploadForm), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Notes generated from the PDF and saved", body = Note),
        (status = 400, description = "Missing or non-PDF upload", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 502, description = "Generation provider failed", body = ErrorResponse),
        (status = 503, description = "No generation model available", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn generate_from_pdf(
    path: web::Path<Uuid>,
    payload: Multipart,
    data: web::Data<AppState>,
) -> impl Responder {
    let id = path.into_inner();
    log::info!("POST /api/sessions/{}/generate/pdf", id);
    let session = match find_session(&data, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let upload = match MultipartParser::parse_pdf_upload(payload).await {
        Ok(upload) => upload,
        Err(e) => {
            log::warn!("Rejected PDF upload: {}", e);
            return e.into();
        }
    };

    let mut session = session.lock().await;
    match data.controller.generate_from_pdf(&mut session, upload).await {
        Ok(note) => HttpResponse::Created().json(note),
        Err(e) => failure("Error generating notes from PDF", e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    post,
    path = "/sessions/{id}/notes/{filename}/view",
    responses(
        (status = 200, description = "Note loaded into the session", body = Note),
        (status = 404, description = "Session or note not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("filename" = String, Path, description = "Note filename")
    )
)]
pub async fn view_note(path: web::Path<(Uuid, String)>, data: web::Data<AppState>) -> impl Responder {
    let (id, filename) = path.into_inner();
    log::info!("POST /api/sessions/{}/notes/{}/view", id, filename);
    let session = match find_session(&data, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut session = session.lock().await;

    match data.controller.view(&mut session, &filename).await {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => failure("Error viewing note", e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    post,
    path = "/sessions/{id}/edit",
    responses(
        (status = 200, description = "Editing started with the loaded note as draft", body = EditDraftResponse),
        (status = 409, description = "No note is being viewed", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn begin_edit(path: web::Path<Uuid>, data: web::Data<AppState>) -> impl Responder {
    let id = path.into_inner();
    let session = match find_session(&data, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut session = session.lock().await;

    match data.controller.begin_edit(&mut session) {
        Ok(draft) => HttpResponse::Ok().json(EditDraftResponse {
            filename: session.current_filename().unwrap_or_default().to_string(),
            draft,
        }),
        Err(e) => failure("Cannot start editing", e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    put,
    path = "/sessions/{id}/edit",
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Edits saved", body = Note),
        (status = 409, description = "Session is not editing", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn save_edit(
    path: web::Path<Uuid>,
    req: web::Json<UpdateNoteRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let id = path.into_inner();
    let session = match find_session(&data, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut session = session.lock().await;

    match data
        .controller
        .save_edit(&mut session, req.into_inner().content)
        .await
    {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => failure("Error saving edits", e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    delete,
    path = "/sessions/{id}/edit",
    responses(
        (status = 200, description = "Draft discarded", body = SessionSnapshot),
        (status = 409, description = "Session is not editing", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn cancel_edit(path: web::Path<Uuid>, data: web::Data<AppState>) -> impl Responder {
    let id = path.into_inner();
    let session = match find_session(&data, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut session = session.lock().await;

    match data.controller.cancel_edit(&mut session) {
        Ok(()) => HttpResponse::Ok().json(data.controller.snapshot(id, &session)),
        Err(e) => failure("Cannot cancel editing", e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    post,
    path = "/sessions/{id}/notes/{filename}/delete",
    responses(
        (status = 200, description = "Delete armed, awaiting confirmation", body = SessionSnapshot),
        (status = 400, description = "Invalid filename", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("filename" = String, Path, description = "Note filename")
    )
)]
pub async fn request_delete(path: web::Path<(Uuid, String)>, data: web::Data<AppState>) -> impl Responder {
    let (id, filename) = path.into_inner();
    let session = match find_session(&data, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut session = session.lock().await;

    match data.controller.request_delete(&mut session, &filename) {
        Ok(()) => HttpResponse::Ok().json(data.controller.snapshot(id, &session)),
        Err(e) => failure("Cannot request delete", e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    post,
    path = "/sessions/{id}/notes/{filename}/delete/confirm",
    responses(
        (status = 200, description = "Delete performed; `deleted` is false if the note was already gone", body = DeleteNoteResponse),
        (status = 409, description = "Delete was not requested first", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("filename" = String, Path, description = "Note filename")
    )
)]
pub async fn confirm_delete(path: web::Path<(Uuid, String)>, data: web::Data<AppState>) -> impl Responder {
    let (id, filename) = path.into_inner();
    log::info!("POST /api/sessions/{}/notes/{}/delete/confirm", id, filename);
    let session = match find_session(&data, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut session = session.lock().await;

    match data.controller.confirm_delete(&mut session, &filename).await {
        Ok(deleted) => HttpResponse::Ok().json(DeleteNoteResponse { filename, deleted }),
        Err(e) => failure("Error deleting note", e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    post,
    path = "/sessions/{id}/notes/{filename}/delete/cancel",
    responses(
        (status = 200, description = "Delete confirmation cleared", body = SessionSnapshot)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("filename" = String, Path, description = "Note filename")
    )
)]
pub async fn cancel_delete(path: web::Path<(Uuid, String)>, data: web::Data<AppState>) -> impl Responder {
    let (id, filename) = path.into_inner();
    let session = match find_session(&data, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut session = session.lock().await;

    data.controller.cancel_delete(&mut session, &filename);
    HttpResponse::Ok().json(data.controller.snapshot(id, &session))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    get,
    path = "/sessions/{id}/export/markdown",
    responses(
        (status = 200, description = "Loaded note as a markdown download", body = String, content_type = "text/markdown"),
        (status = 409, description = "No note is loaded", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn export_markdown(path: web::Path<Uuid>, data: web::Data<AppState>) -> impl Responder {
    let id = path.into_inner();
    let session = match find_session(&data, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let session = session.lock().await;

    match data.controller.export_markdown(&session) {
        Ok(export) => export.into_response(),
        Err(e) => failure("Cannot export markdown", e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Session Service",
    get,
    path = "/sessions/{id}/export/pdf",
    responses(
        (status = 200, description = "Loaded note rendered as a PDF download", body = Vec<u8>, content_type = "application/pdf"),
        (status = 409, description = "No note is loaded", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn export_pdf(path: web::Path<Uuid>, data: web::Data<AppState>) -> impl Responder {
    let id = path.into_inner();
    let session = match find_session(&data, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let session = session.lock().await;

    match data.controller.export_pdf(&session) {
        Ok(export) => export.into_response(),
        Err(e) => failure("Cannot export PDF", e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/sessions").route(web::post().to(create_session)))
        .service(
            web::resource("/sessions/{id}")
                .route(web::get().to(get_session))
                .route(web::delete().to(close_session)),
        )
        .service(web::resource("/sessions/{id}/generate/topic").route(web::post().to(generate_from_topic)))
        .service(web::resource("/sessions/{id}/generate/pdf").route(web::post().to(generate_from_pdf)))
        .service(
            web::resource("/sessions/{id}/edit")
                .route(web::post().to(begin_edit))
                .route(web::put().to(save_edit))
                .route(web::delete().to(cancel_edit)),
        )
        .service(web::resource("/sessions/{id}/export/markdown").route(web::get().to(export_markdown)))
        .service(web::resource("/sessions/{id}/export/pdf").route(web::get().to(export_pdf)))
        .service(web::resource("/sessions/{id}/notes/{filename}/view").route(web::post().to(view_note)))
        .service(web::resource("/sessions/{id}/notes/{filename}/delete").route(web::post().to(request_delete)))
        .service(
            web::resource("/sessions/{id}/notes/{filename}/delete/confirm")
                .route(web::post().to(confirm_delete)),
        )
        .service(
            web::resource("/sessions/{id}/notes/{filename}/delete/cancel")
                .route(web::post().to(cancel_delete)),
        );
}
