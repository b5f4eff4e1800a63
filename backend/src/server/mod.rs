//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{build_analyst, build_http_state, build_store};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use gratitude::Trace;
#[cfg(debug_assertions)]
use gratitude::doc::ApiDoc;
use gratitude::inbound::http::admin::{
    admin_create_user, admin_delete_user, admin_list_users, admin_overview, admin_update_user,
};
use gratitude::inbound::http::entries::{
    create_entry, current_week, list_entries, update_entry, weekly_archive, yearly_overview,
};
use gratitude::inbound::http::health::{HealthState, live, ready};
use gratitude::inbound::http::insights::{adjective_cloud, daily_prompt, inspiration};
use gratitude::inbound::http::json_error_handler;
use gratitude::inbound::http::settings::{get_settings, update_settings};
use gratitude::inbound::http::state::HttpState;
use gratitude::inbound::http::users::{
    clear_session, current_session, list_users, select_user, sign_up, unlock_admin,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Shared state and session settings captured by each worker's app.
#[derive(Clone)]
pub(crate) struct AppDependencies {
    pub(crate) health_state: web::Data<HealthState>,
    pub(crate) http_state: web::Data<HttpState>,
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
}

pub(crate) fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::days(7)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(list_users)
        .service(sign_up)
        .service(select_user)
        .service(unlock_admin)
        .service(current_session)
        .service(clear_session)
        // Fixed `/entries/*` paths precede `/entries/{id}`.
        .service(current_week)
        .service(weekly_archive)
        .service(yearly_overview)
        .service(list_entries)
        .service(create_entry)
        .service(update_entry)
        .service(inspiration)
        .service(adjective_cloud)
        .service(daily_prompt)
        .service(get_settings)
        .service(update_settings)
        .service(admin_list_users)
        .service(admin_create_user)
        .service(admin_update_user)
        .service(admin_delete_user)
        .service(admin_overview);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state, handler
/// state and configuration.
///
/// The returned [`Server`] must be awaited to drive the listener. Readiness
/// is signalled once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(http_state);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
