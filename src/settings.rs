use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppState;

const MODEL_POLICY: &str = "Automatically selected";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    #[schema(example = "Google Gemini")]
    pub provider: String,
    #[schema(example = "Automatically selected")]
    pub model: String,
    pub model_preferences: Vec<String>,
    #[schema(example = "AIzaSy...")]
    pub api_key: String,
    pub upload_folder: String,
    pub notes_folder: String,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Settings",
    get,
    path = "/settings",
    responses(
        (status = 200, description = "Active provider configuration", body = SettingsResponse)
    )
)]
pub async fn get_settings(data: web::Data<AppState>) -> impl Responder {
    let config = &data.config;
    HttpResponse::Ok().json(SettingsResponse {
        provider: config.provider.display_name().to_string(),
        model: MODEL_POLICY.to_string(),
        model_preferences: data.controller.generator().preferences().to_vec(),
        api_key: config.masked_api_key(),
        upload_folder: config.upload_folder.display().to_string(),
        notes_folder: config.notes_folder.display().to_string(),
    })
}
