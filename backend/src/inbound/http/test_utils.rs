//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{
    MockInsightService, MockJournalService, MockSettingsService, MockUserAdminService,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const TEST_LOGIN_PATH: &str = "/test-login";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mocked driving ports, converted into [`HttpState`] once expectations are set.
#[derive(Default)]
pub struct MockPorts {
    pub journal: MockJournalService,
    pub users: MockUserAdminService,
    pub settings: MockSettingsService,
    pub insights: MockInsightService,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.journal),
            Arc::new(self.users),
            Arc::new(self.settings),
            Arc::new(self.insights),
        )
    }
}

#[derive(Serialize, Deserialize)]
struct TestLogin {
    user_id: String,
    admin: bool,
}

async fn test_login(
    session: SessionContext,
    payload: web::Json<TestLogin>,
) -> Result<HttpResponse, Error> {
    let TestLogin { user_id, admin } = payload.into_inner();
    let user_id = UserId::new(user_id).map_err(|err| Error::invalid_request(err.to_string()))?;
    if admin {
        session.persist_admin(&user_id)?;
    } else {
        session.persist_user(&user_id)?;
    }
    Ok(HttpResponse::Ok().finish())
}

/// App with the given handlers mounted under `/api/v1` and a shortcut route
/// that selects a user without going through the user service.
pub fn test_app(
    state: HttpState,
    services: impl FnOnce(&mut web::ServiceConfig),
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(test_session_middleware())
        .route(TEST_LOGIN_PATH, web::post().to(test_login))
        .service(web::scope("/api/v1").configure(services))
}

/// Session cookie for `user_id`, optionally with administrator mode.
pub async fn session_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    user_id: &UserId,
    admin: bool,
) -> Cookie<'static> {
    let req = test::TestRequest::post()
        .uri(TEST_LOGIN_PATH)
        .set_json(TestLogin {
            user_id: user_id.to_string(),
            admin,
        })
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_success(), "test login failed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
