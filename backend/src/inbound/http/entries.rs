//! Journal entry handlers for the selected user.
//!
//! ```text
//! GET  /api/v1/entries
//! POST /api/v1/entries      {"moodScore":4,"text":"...","prompt":"..."}
//! PUT  /api/v1/entries/{id} {"moodScore":5,"text":"..."}
//! GET  /api/v1/entries/this-week
//! GET  /api/v1/entries/weekly
//! GET  /api/v1/entries/overview
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::{ReviseEntryRequest, SubmitEntryRequest};
use crate::domain::{
    CurrentWeek, EntryText, Error, FieldErrors, JournalEntry, MoodCount, MoodScore, WeekBucket,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, entry_text, mood_score, parse_entry_id};

/// A journal entry.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// RFC 3339 timestamp.
    #[schema(example = "2024-06-10T08:30:00+00:00")]
    pub date: String,
    #[schema(minimum = 1, maximum = 5, example = 4)]
    pub mood_score: u8,
    /// Label of the mood score, e.g. `Great`.
    pub mood: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub user_id: String,
}

impl From<JournalEntry> for EntryResponse {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            date: entry.date().to_rfc3339(),
            mood_score: entry.mood_score().value(),
            mood: entry.mood_score().label().to_owned(),
            text: entry.text().as_ref().to_owned(),
            prompt: entry.prompt().map(str::to_owned),
            user_id: entry.user_id().to_string(),
        }
    }
}

/// Entries sharing a Monday-based week.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekResponse {
    /// Monday of the week, `YYYY-MM-DD`.
    #[schema(example = "2024-06-10")]
    pub week_start: String,
    #[schema(example = "Week of June 10, 2024")]
    pub label: String,
    pub entries: Vec<EntryResponse>,
}

impl From<WeekBucket> for WeekResponse {
    fn from(bucket: WeekBucket) -> Self {
        Self {
            week_start: bucket.week_start,
            label: bucket.label,
            entries: bucket.entries.into_iter().map(EntryResponse::from).collect(),
        }
    }
}

/// The home view: this week's entries and today's posting state.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeekResponse {
    /// Sunday opening the week, `YYYY-MM-DD`.
    #[schema(example = "2024-06-16")]
    pub week_start: String,
    /// When true the entry form is closed until tomorrow.
    pub has_posted_today: bool,
    pub entries: Vec<EntryResponse>,
}

impl From<CurrentWeek> for CurrentWeekResponse {
    fn from(week: CurrentWeek) -> Self {
        Self {
            week_start: week.week_start.format("%Y-%m-%d").to_string(),
            has_posted_today: week.has_posted_today,
            entries: week.entries.into_iter().map(EntryResponse::from).collect(),
        }
    }
}

/// Number of entries recorded with one mood.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MoodCountResponse {
    #[schema(example = "Awesome")]
    pub name: String,
    pub count: usize,
}

impl From<MoodCount> for MoodCountResponse {
    fn from(value: MoodCount) -> Self {
        Self {
            name: value.name.to_owned(),
            count: value.count,
        }
    }
}

/// Request body for `POST /api/v1/entries`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEntryRequest {
    /// Whole number between 1 and 5.
    #[schema(value_type = i64, minimum = 1, maximum = 5, example = 4)]
    pub mood_score: Option<Value>,
    pub text: Option<String>,
    /// Prompt the entry answers.
    pub prompt: Option<String>,
}

/// Request body for `PUT /api/v1/entries/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditEntryRequest {
    #[schema(value_type = i64, minimum = 1, maximum = 5, example = 5)]
    pub mood_score: Option<Value>,
    pub text: Option<String>,
}

fn parse_mood_and_text(
    raw_mood: Option<Value>,
    raw_text: Option<String>,
) -> Result<(MoodScore, EntryText), Error> {
    let mut errors = FieldErrors::default();
    let mood = mood_score(&mut errors, raw_mood);
    let text = entry_text(&mut errors, raw_text);
    errors.into_result()?;
    mood.zip(text)
        .ok_or_else(|| Error::invalid_request("validation failed"))
}

/// List the selected user's entries, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/entries",
    responses(
        (status = 200, description = "Entries, newest first", body = [EntryResponse]),
        (status = 401, description = "No user selected", body = ErrorSchema)
    ),
    tags = ["entries"],
    operation_id = "listEntries"
)]
#[get("/entries")]
pub async fn list_entries(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<EntryResponse>>> {
    let user_id = session.require_user_id()?;
    let entries = state.journal.list_entries(&user_id).await?;
    Ok(web::Json(
        entries.into_iter().map(EntryResponse::from).collect(),
    ))
}

/// Record today's entry for the selected user.
#[utoipa::path(
    post,
    path = "/api/v1/entries",
    request_body = NewEntryRequest,
    responses(
        (status = 201, description = "Entry recorded", body = EntryResponse),
        (status = 400, description = "Field errors", body = ErrorSchema),
        (status = 401, description = "No user selected", body = ErrorSchema),
        (status = 409, description = "Already posted today", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["entries"],
    operation_id = "createEntry"
)]
#[post("/entries")]
pub async fn create_entry(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NewEntryRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let NewEntryRequest {
        mood_score,
        text,
        prompt,
    } = payload.into_inner();
    let (mood_score, text) = parse_mood_and_text(mood_score, text)?;
    let prompt = prompt
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty());

    let entry = state
        .journal
        .submit_entry(SubmitEntryRequest {
            user_id,
            mood_score,
            text,
            prompt,
        })
        .await?;
    Ok(HttpResponse::Created().json(EntryResponse::from(entry)))
}

/// Edit the mood and text of an owned entry.
#[utoipa::path(
    put,
    path = "/api/v1/entries/{id}",
    request_body = EditEntryRequest,
    params(("id" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry updated", body = EntryResponse),
        (status = 400, description = "Field errors", body = ErrorSchema),
        (status = 401, description = "No user selected", body = ErrorSchema),
        (status = 403, description = "Not the owner or editing disabled", body = ErrorSchema),
        (status = 404, description = "Unknown entry", body = ErrorSchema)
    ),
    tags = ["entries"],
    operation_id = "updateEntry"
)]
#[put("/entries/{id}")]
pub async fn update_entry(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<EditEntryRequest>,
) -> ApiResult<web::Json<EntryResponse>> {
    let user_id = session.require_user_id()?;
    let entry_id = parse_entry_id(&path.into_inner(), FieldName::new("id"))?;
    let EditEntryRequest { mood_score, text } = payload.into_inner();
    let (mood_score, text) = parse_mood_and_text(mood_score, text)?;

    let entry = state
        .journal
        .revise_entry(ReviseEntryRequest {
            user_id,
            entry_id,
            mood_score,
            text,
        })
        .await?;
    Ok(web::Json(EntryResponse::from(entry)))
}

/// The selected user's entries from this Sunday to Saturday.
#[utoipa::path(
    get,
    path = "/api/v1/entries/this-week",
    responses(
        (status = 200, description = "This week's entries", body = CurrentWeekResponse),
        (status = 401, description = "No user selected", body = ErrorSchema)
    ),
    tags = ["entries"],
    operation_id = "currentWeek"
)]
#[get("/entries/this-week")]
pub async fn current_week(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CurrentWeekResponse>> {
    let user_id = session.require_user_id()?;
    let week = state.journal.current_week(&user_id).await?;
    Ok(web::Json(CurrentWeekResponse::from(week)))
}

/// The selected user's entries grouped by week, newest week first.
#[utoipa::path(
    get,
    path = "/api/v1/entries/weekly",
    responses(
        (status = 200, description = "Weekly archive", body = [WeekResponse]),
        (status = 401, description = "No user selected", body = ErrorSchema)
    ),
    tags = ["entries"],
    operation_id = "weeklyArchive"
)]
#[get("/entries/weekly")]
pub async fn weekly_archive(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<WeekResponse>>> {
    let user_id = session.require_user_id()?;
    let weeks = state.journal.weekly_archive(&user_id).await?;
    Ok(web::Json(weeks.into_iter().map(WeekResponse::from).collect()))
}

/// Mood tally of the selected user's entries this year.
#[utoipa::path(
    get,
    path = "/api/v1/entries/overview",
    responses(
        (status = 200, description = "Five rows, highest mood first", body = [MoodCountResponse]),
        (status = 401, description = "No user selected", body = ErrorSchema)
    ),
    tags = ["entries"],
    operation_id = "yearlyOverview"
)]
#[get("/entries/overview")]
pub async fn yearly_overview(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MoodCountResponse>>> {
    let user_id = session.require_user_id()?;
    let counts = state.journal.yearly_moods(&user_id).await?;
    Ok(web::Json(
        counts.into_iter().map(MoodCountResponse::from).collect(),
    ))
}

#[cfg(test)]
#[path = "entries_tests.rs"]
mod tests;
