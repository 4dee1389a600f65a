mod common;

#[cfg(test)]
mod note_api_tests {
    use std::sync::Arc;

    use actix_web::http::{header, StatusCode};
    use actix_web::{test, web, App};
    use note_maker_server::note::models::{DeleteNoteResponse, Note, NoteDigest, NoteListResponse};
    use note_maker_server::{configure_api, ErrorResponse};
    use serde_json::json;
    use tempfile::TempDir;

    use crate::common::{test_state, MockGenerationProvider};

    macro_rules! app {
        ($dir:expr) => {
            test::init_service(
                App::new()
                    .app_data(test_state(&$dir, Arc::new(MockGenerationProvider::replying("# Notes"))))
                    .service(web::scope("/api").configure(configure_api)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_empty_list_has_message() {
        let dir = TempDir::new().unwrap();
        let app = app!(dir);

        let req = test::TestRequest::get().uri("/api/notes").to_request();
        let resp: NoteListResponse = test::call_and_read_body_json(&app, req).await;

        assert!(resp.notes.is_empty());
        assert_eq!(resp.message.as_deref(), Some("No notes found. Create some notes first!"));
    }

    #[actix_web::test]
    async fn test_note_crud_cycle() {
        let dir = TempDir::new().unwrap();
        let app = app!(dir);

        let req = test::TestRequest::post()
            .uri("/api/notes")
            .set_json(json!({"content": "# Draft", "filename": "draft.md"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Note = test::read_body_json(resp).await;
        assert_eq!(created.filename, "draft.md");

        let req = test::TestRequest::put()
            .uri("/api/notes/draft.md")
            .set_json(json!({"content": "# Final"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/notes/draft.md").to_request();
        let note: Note = test::call_and_read_body_json(&app, req).await;
        assert_eq!(note.content, "# Final");

        let req = test::TestRequest::get().uri("/api/notes").to_request();
        let list: NoteListResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(list.notes, vec!["draft.md".to_string()]);
        assert!(list.message.is_none());

        let req = test::TestRequest::delete().uri("/api/notes/draft.md").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let deleted: DeleteNoteResponse = test::read_body_json(resp).await;
        assert!(deleted.deleted);

        let req = test::TestRequest::delete().uri("/api/notes/draft.md").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let deleted: DeleteNoteResponse = test::read_body_json(resp).await;
        assert!(!deleted.deleted);
    }

    #[actix_web::test]
    async fn test_save_without_name_uses_timestamp() {
        let dir = TempDir::new().unwrap();
        let app = app!(dir);

        let req = test::TestRequest::post()
            .uri("/api/notes")
            .set_json(json!({"content": "quick thought"}))
            .to_request();
        let note: Note = test::call_and_read_body_json(&app, req).await;

        assert!(note.filename.starts_with("note_"));
        assert!(note.filename.ends_with(".md"));
    }

    #[actix_web::test]
    async fn test_missing_note_is_404() {
        let dir = TempDir::new().unwrap();
        let app = app!(dir);

        let req = test::TestRequest::get().uri("/api/notes/nope.md").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(error.error, "NotFound");
    }

    #[actix_web::test]
    async fn test_unsafe_filename_rejected() {
        let dir = TempDir::new().unwrap();
        let app = app!(dir);

        let req = test::TestRequest::post()
            .uri("/api/notes")
            .set_json(json!({"content": "x", "filename": "../escape.md"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(!dir.path().join("escape.md").exists());
    }

    #[actix_web::test]
    async fn test_export_markdown_and_pdf() {
        let dir = TempDir::new().unwrap();
        let app = app!(dir);
        std::fs::write(
            dir.path().join("notes").join("Rust_Traits_20250101_090000.md"),
            "# Traits\n- shared behaviour\n",
        )
        .unwrap();

        let req = test::TestRequest::get()
            .uri("/api/notes/Rust_Traits_20250101_090000.md/export/markdown")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/markdown");
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"# Traits\n- shared behaviour\n");

        let req = test::TestRequest::get()
            .uri("/api/notes/Rust_Traits_20250101_090000.md/export/pdf")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "application/pdf");
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("Rust_Traits_20250101_090000.pdf"));

        let body = test::read_body(resp).await;
        let doc = lopdf::Document::load_mem(&body).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert!(doc.extract_text(&[1]).unwrap().contains("Traits"));
    }

    #[actix_web::test]
    async fn test_digest() {
        let dir = TempDir::new().unwrap();
        let app = app!(dir);
        std::fs::write(
            dir.path().join("notes").join("digest.md"),
            "# Title\nsome prose here\n- point one\n",
        )
        .unwrap();

        let req = test::TestRequest::get().uri("/api/notes/digest.md/digest").to_request();
        let digest: NoteDigest = test::call_and_read_body_json(&app, req).await;

        assert_eq!(digest.key_points, "# Title\n- point one");
        assert_eq!(digest.summary, "# Title\nsome prose here\n- point one\n");
    }

    #[actix_web::test]
    async fn test_settings_masks_key() {
        let dir = TempDir::new().unwrap();
        let app = app!(dir);

        let req = test::TestRequest::get().uri("/api/settings").to_request();
        let settings: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(settings["provider"], "Google Gemini");
        assert_eq!(settings["model"], "Automatically selected");
        assert_eq!(settings["api_key"], "AIzaTe...");
        assert_eq!(settings["model_preferences"][0], "models/gemini-2.5-flash");
    }
}
