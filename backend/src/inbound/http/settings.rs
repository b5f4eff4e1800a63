//! Journal settings handlers.
//!
//! ```text
//! GET /api/v1/settings
//! PUT /api/v1/settings {"gratitudePrompt":"...","showExplanation":true}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, FieldErrors, JournalSettings};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::gratitude_prompt;

/// Global journal settings.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    #[schema(example = "What are you grateful for?")]
    pub gratitude_prompt: String,
    pub show_explanation: bool,
}

impl From<JournalSettings> for SettingsResponse {
    fn from(settings: JournalSettings) -> Self {
        Self {
            gratitude_prompt: settings.gratitude_prompt.into(),
            show_explanation: settings.show_explanation,
        }
    }
}

/// Request body for `PUT /api/v1/settings`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    pub gratitude_prompt: Option<String>,
    pub show_explanation: Option<bool>,
}

fn parse_settings(payload: SettingsRequest) -> Result<JournalSettings, Error> {
    let mut errors = FieldErrors::default();
    let prompt = gratitude_prompt(&mut errors, payload.gratitude_prompt);
    if payload.show_explanation.is_none() {
        errors.push("showExplanation", "showExplanation is required.");
    }
    errors.into_result()?;
    match (prompt, payload.show_explanation) {
        (Some(gratitude_prompt), Some(show_explanation)) => Ok(JournalSettings {
            gratitude_prompt,
            show_explanation,
        }),
        _ => Err(Error::invalid_request("validation failed")),
    }
}

/// Current settings; readable without a session.
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Current settings", body = SettingsResponse)
    ),
    tags = ["settings"],
    operation_id = "getSettings",
    security([])
)]
#[get("/settings")]
pub async fn get_settings(state: web::Data<HttpState>) -> ApiResult<web::Json<SettingsResponse>> {
    let settings = state.settings.settings().await?;
    Ok(web::Json(SettingsResponse::from(settings)))
}

/// Replace the settings.
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    request_body = SettingsRequest,
    responses(
        (status = 200, description = "Saved settings", body = SettingsResponse),
        (status = 400, description = "Field errors", body = ErrorSchema),
        (status = 401, description = "No user selected", body = ErrorSchema),
        (status = 403, description = "Administrator access required", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["settings"],
    operation_id = "updateSettings"
)]
#[put("/settings")]
pub async fn update_settings(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SettingsRequest>,
) -> ApiResult<web::Json<SettingsResponse>> {
    session.require_admin()?;
    let settings = parse_settings(payload.into_inner())?;
    let saved = state.settings.update_settings(settings).await?;
    Ok(web::Json(SettingsResponse::from(saved)))
}
