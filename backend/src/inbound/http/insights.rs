//! AI-assisted insight handlers.
//!
//! These endpoints never fail because of the AI collaborator: the insight
//! service degrades to empty results or the fallback prompt.
//!
//! ```text
//! POST /api/v1/insights/inspiration {"moodScore":2}
//! GET  /api/v1/insights/adjectives?scale=sqrt
//! GET  /api/v1/insights/daily-prompt
//! ```

use std::str::FromStr;

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::InspirationEntry;
use crate::domain::{Error, FieldErrors, SizedWord, WordScale};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::mood_score;

/// Request body for `POST /api/v1/insights/inspiration`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InspirationRequest {
    /// Mood being recorded now.
    #[schema(value_type = i64, minimum = 1, maximum = 5, example = 4)]
    pub mood_score: Option<serde_json::Value>,
}

/// A past entry offered as inspiration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InspirationResponse {
    pub id: String,
    pub mood_score: u8,
    pub text: String,
}

impl From<InspirationEntry> for InspirationResponse {
    fn from(entry: InspirationEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            mood_score: entry.mood_score.value(),
            text: entry.text,
        }
    }
}

/// Query string for `GET /api/v1/insights/adjectives`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdjectivesQuery {
    /// `sqrt` (default) or `linear`.
    pub scale: Option<String>,
}

/// A word-cloud entry with rendering hints.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SizedWordResponse {
    #[schema(example = "grateful")]
    pub adjective: String,
    pub count: u32,
    /// Font size in rem, between 1.0 and 6.0.
    #[schema(example = 3.5)]
    pub font_size: f64,
    /// Font weight, between 300 and 900.
    #[schema(example = 600)]
    pub font_weight: u16,
}

impl From<SizedWord> for SizedWordResponse {
    fn from(word: SizedWord) -> Self {
        Self {
            adjective: word.adjective,
            count: word.count,
            font_size: word.font_size,
            font_weight: word.font_weight,
        }
    }
}

/// Generated writing prompt.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DailyPromptResponse {
    #[schema(example = "What is something that made you smile today?")]
    pub prompt: String,
}

fn parse_scale(raw: Option<String>) -> Result<WordScale, Error> {
    let Some(raw) = raw else {
        return Ok(WordScale::default());
    };
    let mut errors = FieldErrors::default();
    let scale = errors.capture("scale", WordScale::from_str(raw.trim()));
    errors.into_result()?;
    Ok(scale.unwrap_or_default())
}

/// Past entries with a mood close to the one being recorded.
#[utoipa::path(
    post,
    path = "/api/v1/insights/inspiration",
    request_body = InspirationRequest,
    responses(
        (status = 200, description = "Similar past entries, possibly empty", body = [InspirationResponse]),
        (status = 400, description = "Invalid mood score", body = ErrorSchema),
        (status = 401, description = "No user selected", body = ErrorSchema)
    ),
    tags = ["insights"],
    operation_id = "inspiration"
)]
#[post("/insights/inspiration")]
pub async fn inspiration(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<InspirationRequest>,
) -> ApiResult<web::Json<Vec<InspirationResponse>>> {
    let user_id = session.require_user_id()?;
    let mut errors = FieldErrors::default();
    let mood = mood_score(&mut errors, payload.into_inner().mood_score);
    errors.into_result()?;
    let Some(mood) = mood else {
        return Err(Error::invalid_request("validation failed"));
    };

    let entries = state.insights.inspiration(&user_id, mood).await;
    Ok(web::Json(
        entries.into_iter().map(InspirationResponse::from).collect(),
    ))
}

/// Most frequent adjectives in the selected user's entries.
#[utoipa::path(
    get,
    path = "/api/v1/insights/adjectives",
    params(AdjectivesQuery),
    responses(
        (status = 200, description = "Up to 15 sized words, most frequent first", body = [SizedWordResponse]),
        (status = 400, description = "Unknown scale", body = ErrorSchema),
        (status = 401, description = "No user selected", body = ErrorSchema)
    ),
    tags = ["insights"],
    operation_id = "adjectiveCloud"
)]
#[get("/insights/adjectives")]
pub async fn adjective_cloud(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AdjectivesQuery>,
) -> ApiResult<web::Json<Vec<SizedWordResponse>>> {
    let user_id = session.require_user_id()?;
    let scale = parse_scale(query.into_inner().scale)?;
    let words = state.insights.adjective_cloud(&user_id, scale).await;
    Ok(web::Json(
        words.into_iter().map(SizedWordResponse::from).collect(),
    ))
}

/// A fresh writing prompt.
#[utoipa::path(
    get,
    path = "/api/v1/insights/daily-prompt",
    responses(
        (status = 200, description = "Generated or fallback prompt", body = DailyPromptResponse),
        (status = 401, description = "No user selected", body = ErrorSchema)
    ),
    tags = ["insights"],
    operation_id = "dailyPrompt"
)]
#[get("/insights/daily-prompt")]
pub async fn daily_prompt(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DailyPromptResponse>> {
    session.require_user_id()?;
    let prompt = state.insights.daily_prompt().await;
    Ok(web::Json(DailyPromptResponse { prompt }))
}
