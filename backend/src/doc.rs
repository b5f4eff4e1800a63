//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the journal API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer
//! - **Schemas**: request and response DTOs plus the error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`])
//! - **Security**: the session cookie that carries the selected user
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::admin::{
    CommunityOverviewResponse, DeletedUserResponse, MoodRowResponse, UserFormRequest,
};
use crate::inbound::http::entries::{
    CurrentWeekResponse, EditEntryRequest, EntryResponse, MoodCountResponse, NewEntryRequest,
    WeekResponse,
};
use crate::inbound::http::insights::{
    DailyPromptResponse, InspirationRequest, InspirationResponse, SizedWordResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::settings::{SettingsRequest, SettingsResponse};
use crate::inbound::http::users::{
    AdminUnlockRequest, SelectUserRequest, SessionResponse, SignUpRequest, UserResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/session/user or /api/v1/session/admin.",
            ))),
        );
    }
}

/// OpenAPI document for the journal API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Gratitude journal API",
        description = "Mood and gratitude journaling with weekly archives, yearly overviews and AI-assisted reflection.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::sign_up,
        crate::inbound::http::users::select_user,
        crate::inbound::http::users::unlock_admin,
        crate::inbound::http::users::current_session,
        crate::inbound::http::users::clear_session,
        crate::inbound::http::entries::list_entries,
        crate::inbound::http::entries::create_entry,
        crate::inbound::http::entries::update_entry,
        crate::inbound::http::entries::current_week,
        crate::inbound::http::entries::weekly_archive,
        crate::inbound::http::entries::yearly_overview,
        crate::inbound::http::insights::inspiration,
        crate::inbound::http::insights::adjective_cloud,
        crate::inbound::http::insights::daily_prompt,
        crate::inbound::http::settings::get_settings,
        crate::inbound::http::settings::update_settings,
        crate::inbound::http::admin::admin_list_users,
        crate::inbound::http::admin::admin_create_user,
        crate::inbound::http::admin::admin_update_user,
        crate::inbound::http::admin::admin_delete_user,
        crate::inbound::http::admin::admin_overview,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserResponse,
        SessionResponse,
        SelectUserRequest,
        AdminUnlockRequest,
        SignUpRequest,
        EntryResponse,
        WeekResponse,
        CurrentWeekResponse,
        MoodCountResponse,
        NewEntryRequest,
        EditEntryRequest,
        InspirationRequest,
        InspirationResponse,
        SizedWordResponse,
        DailyPromptResponse,
        SettingsRequest,
        SettingsResponse,
        UserFormRequest,
        DeletedUserResponse,
        MoodRowResponse,
        CommunityOverviewResponse,
    )),
    tags(
        (name = "users", description = "User selection, sign-up and the session"),
        (name = "entries", description = "Journal entries and their aggregations"),
        (name = "insights", description = "AI-assisted inspiration, word clouds and prompts"),
        (name = "settings", description = "Global journal settings"),
        (name = "admin", description = "Administrator user management and overview"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
