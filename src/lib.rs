use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod document;
pub mod generation;
pub mod note;
pub mod render;
pub mod session;
pub mod settings;
pub mod state;
pub mod storage;


pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn bad_gateway(message: &str) -> Self {
        Self::new("BadGateway", message)
    }

    pub fn service_unavailable(message: &str) -> Self {
        Self::new("ServiceUnavailable", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::note::handlers::list_notes,
        crate::note::handlers::save_note,
        crate::note::handlers::get_note,
        crate::note::handlers::update_note,
        crate::note::handlers::delete_note,
        crate::note::handlers::export_markdown,
        crate::note::handlers::export_pdf,
        crate::note::handlers::get_digest,
        crate::session::handlers::create_session,
        crate::session::handlers::get_session,
        crate::session::handlers::close_session,
        crate::session::handlers::generate_from_topic,
        crate::session::handlers::generate_from_pdf,
        crate::session::handlers::view_note,
        crate::session::handlers::begin_edit,
        crate::session::handlers::save_edit,
        crate::session::handlers::cancel_edit,
        crate::session::handlers::request_delete,
        crate::session::handlers::confirm_delete,
        crate::session::handlers::cancel_delete,
        crate::session::handlers::export_markdown,
        crate::session::handlers::export_pdf,
        crate::settings::get_settings
    ),
    components(
        schemas(
            note::models::Note,
            note::models::NoteListResponse,
            note::models::SaveNoteRequest,
            note::models::UpdateNoteRequest,
            note::models::DeleteNoteResponse,
            note::models::NoteDigest,
            session::SessionSnapshot,
            session::SessionPhase,
            session::DeleteState,
            session::handlers::GenerateTopicRequest,
            session::handlers::EditDraftResponse,
            settings::SettingsResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Note Service", description = "Saved note CRUD, export and digest endpoints."),
        (name = "Session Service", description = "Interactive generate, view, edit and delete flow."),
        (name = "Settings", description = "Active provider configuration.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost server")
    )
)]
pub struct ApiDoc;

/// Register every `/api` route on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(note::handlers::config)
        .configure(session::handlers::config)
        .service(web::resource("/settings").route(web::get().to(settings::get_settings)));
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok(); // Load .env file

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Using {} as the generation provider", config.provider.display_name());
    log::debug!("Configuration: {:?}", config);

    let (host, port) = (config.host.clone(), config.port);
    let app_state = match AppState::new_with_config(config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to initialise application state: {}", e);
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("note_maker_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");

    log::info!("Starting server at http://{}:{}", host, port);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(web::scope("/api").configure(configure_api))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((host.as_str(), port))?
    .run()
    .await
}
