//! User selection, sign-up, and session handlers.
//!
//! ```text
//! GET    /api/v1/users
//! POST   /api/v1/users/signup  {"name":"Ada"}
//! POST   /api/v1/session/user  {"userId":"3fa85f64-5717-4562-b3fc-2c963f66afa6"}
//! POST   /api/v1/session/admin {"passcode":"admin123"}
//! GET    /api/v1/session
//! DELETE /api/v1/session
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, FieldErrors, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, display_name, parse_user_id};

/// User as shown on the selection screen and in the admin table.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Ada")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub can_edit: bool,
    pub is_admin: bool,
}

impl UserResponse {
    pub(crate) fn new(user: &User, is_admin: bool) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.display_name().to_string(),
            email: user.email().map(ToString::to_string),
            can_edit: user.can_edit(),
            is_admin,
        }
    }
}

/// Pair every user with its administrator flag.
pub(crate) async fn describe_users(
    state: &HttpState,
    users: Vec<User>,
) -> ApiResult<Vec<UserResponse>> {
    let mut described = Vec::with_capacity(users.len());
    for user in users {
        let is_admin = state.users.is_administrator(user.id()).await?;
        described.push(UserResponse::new(&user, is_admin));
    }
    Ok(described)
}

/// Current session: the selected user and whether admin mode is unlocked.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserResponse,
    pub admin_mode: bool,
}

/// Request body for `POST /api/v1/session/user`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectUserRequest {
    pub user_id: String,
}

/// Request body for `POST /api/v1/session/admin`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUnlockRequest {
    pub passcode: String,
}

/// Request body for `POST /api/v1/users/signup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: Option<String>,
}

/// List users available on the selection screen.
///
/// The administrator is reached through the passcode flow instead.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use gratitude::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Selectable users", body = [UserResponse]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list_users().await?;
    let described = describe_users(&state, users).await?;
    Ok(web::Json(
        described.into_iter().filter(|user| !user.is_admin).collect(),
    ))
}

/// Create a profile-only user and select it.
#[utoipa::path(
    post,
    path = "/api/v1/users/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "User created and selected", body = SessionResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "signUp",
    security([])
)]
#[post("/users/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let mut errors = FieldErrors::default();
    let name = display_name(&mut errors, payload.into_inner().name);
    errors.into_result()?;
    let Some(name) = name else {
        return Err(Error::invalid_request("validation failed"));
    };

    let user = state.users.sign_up(name).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Created().json(SessionResponse {
        user: UserResponse::new(&user, false),
        admin_mode: false,
    }))
}

/// Select the current user.
#[utoipa::path(
    post,
    path = "/api/v1/session/user",
    request_body = SelectUserRequest,
    responses(
        (status = 200, description = "User selected", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid user id", body = ErrorSchema),
        (status = 403, description = "Administrator requires the passcode", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "selectUser",
    security([])
)]
#[post("/session/user")]
pub async fn select_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SelectUserRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let user_id = parse_user_id(&payload.user_id, FieldName::new("userId"))?;
    let user = state.users.find_user(&user_id).await?;
    if state.users.is_administrator(&user_id).await? {
        return Err(Error::forbidden("Enter the admin passcode to continue."));
    }
    session.persist_user(&user_id)?;
    info!(user_id = %user_id, "user selected");
    Ok(web::Json(SessionResponse {
        user: UserResponse::new(&user, false),
        admin_mode: false,
    }))
}

/// Unlock administrator mode with the passcode.
#[utoipa::path(
    post,
    path = "/api/v1/session/admin",
    request_body = AdminUnlockRequest,
    responses(
        (status = 200, description = "Administrator selected", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Incorrect passcode", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "unlockAdmin",
    security([])
)]
#[post("/session/admin")]
pub async fn unlock_admin(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AdminUnlockRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let admin = state.users.unlock_admin(&payload.passcode).await?;
    session.persist_admin(admin.id())?;
    Ok(web::Json(SessionResponse {
        user: UserResponse::new(&admin, true),
        admin_mode: true,
    }))
}

/// Return the selected user.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "No user selected", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionResponse>> {
    let user_id = session.require_user_id()?;
    let user = match state.users.find_user(&user_id).await {
        Ok(user) => user,
        Err(err) if err.code() == ErrorCode::NotFound => {
            // The user was deleted while selected.
            session.clear();
            return Err(Error::unauthorized("Select a user first."));
        }
        Err(err) => return Err(err),
    };
    let is_admin = state.users.is_administrator(&user_id).await?;
    let admin_mode = is_admin && session.is_admin()?;
    Ok(web::Json(SessionResponse {
        user: UserResponse::new(&user, is_admin),
        admin_mode,
    }))
}

/// Forget the selected user.
#[utoipa::path(
    delete,
    path = "/api/v1/session",
    responses((status = 204, description = "Session cleared")),
    tags = ["session"],
    operation_id = "clearSession",
    security([])
)]
#[delete("/session")]
pub async fn clear_session(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
