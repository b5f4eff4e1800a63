//! Administrator handlers for user management and the community overview.
//!
//! Every handler requires a session with administrator mode unlocked.
//!
//! ```text
//! GET    /api/v1/admin/users
//! POST   /api/v1/admin/users      {"name":"Ada","email":null,"canEdit":true}
//! PUT    /api/v1/admin/users/{id} {"name":"Ada","email":"ada@example.com","canEdit":false}
//! DELETE /api/v1/admin/users/{id}
//! GET    /api/v1/admin/overview
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CommunityOverview, UserProfile};
use crate::domain::{Error, FieldErrors, UserMoodRow};
use crate::inbound::http::ApiResult;
use crate::inbound::http::entries::MoodCountResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{UserResponse, describe_users};
use crate::inbound::http::validation::{FieldName, display_name, optional_email, parse_user_id};

/// Request body for creating or editing a user.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserFormRequest {
    pub name: Option<String>,
    /// Blank or absent for profile-only users.
    pub email: Option<String>,
    /// Defaults to `false`.
    pub can_edit: Option<bool>,
}

fn parse_profile(payload: UserFormRequest) -> Result<UserProfile, Error> {
    let mut errors = FieldErrors::default();
    let name = display_name(&mut errors, payload.name);
    let email = optional_email(&mut errors, payload.email);
    errors.into_result()?;
    let display_name = name.ok_or_else(|| Error::invalid_request("validation failed"))?;
    Ok(UserProfile {
        display_name,
        email,
        can_edit: payload.can_edit.unwrap_or(false),
    })
}

/// Result of deleting a user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedUserResponse {
    pub id: String,
    /// Entries removed along with the user.
    pub removed_entries: usize,
}

/// Counts for one mood, keyed by user display name.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MoodRowResponse {
    #[schema(example = "Great")]
    pub name: String,
    pub counts: BTreeMap<String, usize>,
}

impl From<UserMoodRow> for MoodRowResponse {
    fn from(row: UserMoodRow) -> Self {
        Self {
            name: row.name.to_owned(),
            counts: row.counts,
        }
    }
}

/// Yearly moods of every non-administrator user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommunityOverviewResponse {
    /// Combined counts, highest mood first.
    pub totals: Vec<MoodCountResponse>,
    /// Per-user counts, highest mood first.
    pub rows: Vec<MoodRowResponse>,
    /// Legend order of the users in `rows`.
    pub users: Vec<String>,
}

impl From<CommunityOverview> for CommunityOverviewResponse {
    fn from(overview: CommunityOverview) -> Self {
        Self {
            totals: overview
                .totals
                .into_iter()
                .map(MoodCountResponse::from)
                .collect(),
            rows: overview
                .breakdown
                .rows
                .into_iter()
                .map(MoodRowResponse::from)
                .collect(),
            users: overview.breakdown.users,
        }
    }
}

/// Every user, including the administrator.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "No user selected", body = ErrorSchema),
        (status = 403, description = "Administrator access required", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/admin/users")]
pub async fn admin_list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    session.require_admin()?;
    let users = state.users.list_users().await?;
    Ok(web::Json(describe_users(&state, users).await?))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    request_body = UserFormRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Field errors", body = ErrorSchema),
        (status = 403, description = "Administrator access required", body = ErrorSchema),
        (status = 409, description = "Name or email already in use", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminCreateUser"
)]
#[post("/admin/users")]
pub async fn admin_create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UserFormRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let profile = parse_profile(payload.into_inner())?;
    let user = state.users.create_user(profile).await?;
    Ok(HttpResponse::Created().json(UserResponse::new(&user, false)))
}

/// Replace a user's profile.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}",
    request_body = UserFormRequest,
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Field errors", body = ErrorSchema),
        (status = 403, description = "Administrator access required", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 409, description = "Name or email already in use", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateUser"
)]
#[put("/admin/users/{id}")]
pub async fn admin_update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UserFormRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    session.require_admin()?;
    let user_id = parse_user_id(&path.into_inner(), FieldName::new("id"))?;
    let profile = parse_profile(payload.into_inner())?;
    let user = state.users.update_user(&user_id, profile).await?;
    let is_admin = state.users.is_administrator(user.id()).await?;
    Ok(web::Json(UserResponse::new(&user, is_admin)))
}

/// Delete a user and their entries.
///
/// The administrator can never be deleted.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = DeletedUserResponse),
        (status = 403, description = "Administrator access required, or target is the administrator", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteUser"
)]
#[delete("/admin/users/{id}")]
pub async fn admin_delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedUserResponse>> {
    session.require_admin()?;
    let user_id = parse_user_id(&path.into_inner(), FieldName::new("id"))?;
    let removed_entries = state.users.delete_user(&user_id).await?;
    Ok(web::Json(DeletedUserResponse {
        id: user_id.to_string(),
        removed_entries,
    }))
}

/// Yearly mood breakdown across non-administrator users.
#[utoipa::path(
    get,
    path = "/api/v1/admin/overview",
    responses(
        (status = 200, description = "Community overview", body = CommunityOverviewResponse),
        (status = 403, description = "Administrator access required", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminOverview"
)]
#[get("/admin/overview")]
pub async fn admin_overview(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CommunityOverviewResponse>> {
    session.require_admin()?;
    let overview = state.journal.community_overview().await?;
    Ok(web::Json(CommunityOverviewResponse::from(overview)))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
