//! End-to-end journal flows through the full actix app.
//!
//! Each test builds the production app over its own document store, seeds
//! the administrator, and drives requests with real session cookies.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use chrono::{TimeZone, Utc};
use gratitude::config::JournalConfig;
use gratitude::domain::{
    AdminCredentials, DisplayName, Email, EntryId, EntryText, FALLBACK_DAILY_PROMPT, Identity,
    JournalEntry, MoodScore, User, UserId,
};
use gratitude::inbound::http::health::HealthState;
use gratitude::outbound::store::{DocumentStore, StoreDocument};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};

#[expect(
    dead_code,
    reason = "create_server binds a socket; tests drive build_app directly"
)]
#[path = "../src/server/mod.rs"]
mod server;

use server::{AppDependencies, build_analyst, build_app, build_http_state, build_store};

const PASSCODE: &str = "admin123";

async fn dependencies(store: &Arc<DocumentStore>) -> AppDependencies {
    let admin = AdminCredentials::new(
        Email::new("admin@example.com").expect("admin email"),
        PASSCODE,
    );
    let analyst = build_analyst(&JournalConfig::default()).expect("analyst config");
    let state = build_http_state(store, admin, Arc::new(DefaultClock), analyst);
    state
        .users
        .ensure_administrator()
        .await
        .expect("administrator seeded");
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    AppDependencies {
        health_state,
        http_state: web::Data::new(state),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

struct Reply {
    status: StatusCode,
    body: Value,
    cookie: Option<Cookie<'static>>,
}

async fn send<S, B>(app: &S, req: Request) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = actix_test::call_service(app, req).await;
    let status = res.status();
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let bytes = actix_test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Reply {
        status,
        body,
        cookie,
    }
}

async fn sign_up<S, B>(app: &S, name: &str) -> (String, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/signup")
            .set_json(json!({ "name": name }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    let id = reply.body["user"]["id"]
        .as_str()
        .expect("user id")
        .to_owned();
    (id, reply.cookie.expect("session cookie"))
}

async fn unlock_admin<S, B>(app: &S) -> (String, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/session/admin")
            .set_json(json!({ "passcode": PASSCODE }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["adminMode"], true);
    let id = reply.body["user"]["id"]
        .as_str()
        .expect("admin id")
        .to_owned();
    (id, reply.cookie.expect("session cookie"))
}

async fn post_entry<S, B>(app: &S, cookie: &Cookie<'static>, mood: i64, text: &str) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/entries")
            .cookie(cookie.clone())
            .set_json(json!({ "moodScore": mood, "text": text }))
            .to_request(),
    )
    .await
}

#[rstest]
#[case::nine_characters("123456789", StatusCode::BAD_REQUEST, 0)]
#[case::ten_characters("1234567890", StatusCode::CREATED, 1)]
#[actix_web::test]
async fn entry_text_length_boundary(
    #[case] text: &str,
    #[case] expected: StatusCode,
    #[case] stored: usize,
) {
    let store = Arc::new(DocumentStore::in_memory());
    let app = actix_test::init_service(build_app(dependencies(&store).await)).await;
    let (_, cookie) = sign_up(&app, "Ada").await;

    let reply = post_entry(&app, &cookie, 3, text).await;
    assert_eq!(reply.status, expected);
    if expected == StatusCode::BAD_REQUEST {
        assert_eq!(
            reply.body["details"]["fields"]["text"][0],
            "Your entry must be at least 10 characters long."
        );
    }

    let listed = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/entries")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(listed.body.as_array().map(Vec::len), Some(stored));
}

#[rstest]
#[actix_web::test]
async fn administrator_cannot_be_deleted() {
    let store = Arc::new(DocumentStore::in_memory());
    let app = actix_test::init_service(build_app(dependencies(&store).await)).await;
    sign_up(&app, "Ada").await;
    let before = store.read().await;
    let (admin_id, cookie) = unlock_admin(&app).await;

    let reply = send(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/users/{admin_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["code"], "forbidden");
    assert_eq!(reply.body["message"], "Cannot delete the Admin user.");
    assert_eq!(store.read().await, before);
}

fn seeded_user(name: &str) -> User {
    User::new(
        UserId::random(),
        DisplayName::new(name).expect("name"),
        Identity::ProfileOnly,
        true,
    )
}

fn seeded_entry(owner: &UserId, day: u32, mood: i64) -> JournalEntry {
    JournalEntry::new(
        EntryId::random(),
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0)
            .single()
            .expect("valid date"),
        MoodScore::new(mood).expect("mood"),
        EntryText::new(format!("grateful for day {day} of June")).expect("text"),
        None,
        owner.clone(),
    )
}

async fn select<S, B>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/session/user")
            .set_json(json!({ "userId": user_id.to_string() }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    reply.cookie.expect("session cookie")
}

#[rstest]
#[case::fractional(json!(4.5))]
#[case::quoted(json!("4"))]
#[actix_web::test]
async fn mistyped_mood_is_reported_per_field(#[case] mood: Value) {
    let store = Arc::new(DocumentStore::in_memory());
    let app = actix_test::init_service(build_app(dependencies(&store).await)).await;
    let (_, cookie) = sign_up(&app, "Ada").await;

    let reply = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/entries")
            .cookie(cookie)
            .set_json(json!({ "moodScore": mood, "text": "short" }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "invalid_request");
    let fields = &reply.body["details"]["fields"];
    assert_eq!(
        fields["moodScore"][0],
        "mood score must be a whole number between 1 and 5"
    );
    assert_eq!(
        fields["text"][0],
        "Your entry must be at least 10 characters long."
    );
    assert!(store.read().await.entries.is_empty());
}

#[rstest]
#[actix_web::test]
async fn one_entry_per_day_and_this_week_reports_it() {
    let store = Arc::new(DocumentStore::in_memory());
    let app = actix_test::init_service(build_app(dependencies(&store).await)).await;
    let (_, cookie) = sign_up(&app, "Ada").await;

    let this_week = |cookie: Cookie<'static>| {
        actix_test::TestRequest::get()
            .uri("/api/v1/entries/this-week")
            .cookie(cookie)
            .to_request()
    };
    let before = send(&app, this_week(cookie.clone())).await;
    assert_eq!(before.status, StatusCode::OK);
    assert_eq!(before.body["hasPostedToday"], false);
    assert_eq!(before.body["entries"], json!([]));

    let first = post_entry(&app, &cookie, 4, "a long walk by the sea").await;
    assert_eq!(first.status, StatusCode::CREATED);
    let second = post_entry(&app, &cookie, 5, "and a second thought").await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["code"], "conflict");

    let after = send(&app, this_week(cookie)).await;
    assert_eq!(after.body["hasPostedToday"], true);
    assert_eq!(after.body["entries"].as_array().map(Vec::len), Some(1));
    assert_eq!(store.read().await.entries.len(), 1);
}

#[rstest]
#[actix_web::test]
async fn display_names_are_unique_ignoring_case() {
    let store = Arc::new(DocumentStore::in_memory());
    let app = actix_test::init_service(build_app(dependencies(&store).await)).await;
    sign_up(&app, "Sam").await;

    let reply = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/signup")
            .set_json(json!({ "name": "sam" }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(
        reply.body["details"]["fields"]["name"][0],
        "That name is already taken."
    );
}

#[rstest]
#[actix_web::test]
async fn deleting_a_user_removes_their_entries() {
    let grace = seeded_user("Grace");
    let grace_id = grace.id().clone();
    let store = Arc::new(DocumentStore::with_document(StoreDocument {
        users: vec![grace],
        entries: vec![seeded_entry(&grace_id, 10, 3)],
        ..StoreDocument::default()
    }));
    let app = actix_test::init_service(build_app(dependencies(&store).await)).await;
    let grace_cookie = select(&app, &grace_id).await;
    let (_, ada) = sign_up(&app, "Ada").await;
    assert_eq!(
        post_entry(&app, &grace_cookie, 4, "a quiet walk at dawn")
            .await
            .status,
        StatusCode::CREATED
    );
    assert_eq!(
        post_entry(&app, &ada, 2, "rain on the window").await.status,
        StatusCode::CREATED
    );
    let (_, admin) = unlock_admin(&app).await;

    let reply = send(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/users/{grace_id}"))
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["removedEntries"], 2);

    let document = store.read().await;
    assert!(document.users.iter().all(|user| user.id() != &grace_id));
    assert_eq!(document.entries.len(), 1);
    assert!(
        document
            .entries
            .iter()
            .all(|entry| entry.user_id() != &grace_id)
    );
}

#[rstest]
#[actix_web::test]
async fn weekly_archive_groups_seeded_entries() {
    let user = seeded_user("Ada");
    let user_id = user.id().clone();
    let entries = [(10, 3), (11, 3), (20, 5)]
        .into_iter()
        .map(|(day, mood)| seeded_entry(&user_id, day, mood))
        .collect();
    let store = Arc::new(DocumentStore::with_document(StoreDocument {
        users: vec![user],
        entries,
        ..StoreDocument::default()
    }));
    let app = actix_test::init_service(build_app(dependencies(&store).await)).await;
    let cookie = select(&app, &user_id).await;

    let reply = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/entries/weekly")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let weeks: Vec<(String, usize)> = reply
        .body
        .as_array()
        .expect("weeks")
        .iter()
        .map(|week| {
            (
                week["weekStart"].as_str().expect("week start").to_owned(),
                week["entries"].as_array().map_or(0, Vec::len),
            )
        })
        .collect();
    assert_eq!(
        weeks,
        vec![("2024-06-17".to_owned(), 1), ("2024-06-10".to_owned(), 2)]
    );
}

#[rstest]
#[actix_web::test]
async fn settings_are_edited_by_the_administrator_only() {
    let store = Arc::new(DocumentStore::in_memory());
    let app = actix_test::init_service(build_app(dependencies(&store).await)).await;
    let update = json!({ "gratitudePrompt": "Who helped you today?", "showExplanation": false });

    let defaults = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/settings")
            .to_request(),
    )
    .await;
    assert_eq!(
        defaults.body,
        json!({ "gratitudePrompt": "What are you grateful for?", "showExplanation": true })
    );

    let (_, user) = sign_up(&app, "Ada").await;
    let denied = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/settings")
            .cookie(user)
            .set_json(&update)
            .to_request(),
    )
    .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let (_, admin) = unlock_admin(&app).await;
    let saved = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/settings")
            .cookie(admin)
            .set_json(&update)
            .to_request(),
    )
    .await;
    assert_eq!(saved.status, StatusCode::OK);

    let current = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/settings")
            .to_request(),
    )
    .await;
    assert_eq!(current.body, update);
}

#[rstest]
#[actix_web::test]
async fn selection_screen_hides_the_administrator() {
    let store = Arc::new(DocumentStore::in_memory());
    let app = actix_test::init_service(build_app(dependencies(&store).await)).await;
    sign_up(&app, "Ada").await;

    let reply = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users").to_request(),
    )
    .await;
    let names: Vec<&str> = reply
        .body
        .as_array()
        .expect("users")
        .iter()
        .filter_map(|user| user["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Ada"]);

    let wrong = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/session/admin")
            .set_json(json!({ "passcode": "letmein" }))
            .to_request(),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["message"], "Incorrect passcode.");
}

#[rstest]
#[actix_web::test]
async fn insights_degrade_without_an_ai_endpoint() {
    let store = Arc::new(DocumentStore::in_memory());
    let app = actix_test::init_service(build_app(dependencies(&store).await)).await;
    let (_, cookie) = sign_up(&app, "Ada").await;
    post_entry(&app, &cookie, 4, "sunshine and a good book").await;

    let prompt = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/insights/daily-prompt")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(prompt.status, StatusCode::OK);
    assert_eq!(prompt.body["prompt"], FALLBACK_DAILY_PROMPT);

    let inspiration = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/insights/inspiration")
            .cookie(cookie.clone())
            .set_json(json!({ "moodScore": 4 }))
            .to_request(),
    )
    .await;
    assert_eq!(inspiration.status, StatusCode::OK);
    assert_eq!(inspiration.body, json!([]));

    let words = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/insights/adjectives")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(words.body, json!([]));
}

#[rstest]
#[actix_web::test]
async fn json_file_store_survives_reopening() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("journal").join("data.json");
    let config = JournalConfig {
        data_file: Some(path.clone()),
        ..JournalConfig::default()
    };
    let store = build_store(&config).expect("store opens");
    let app = actix_test::init_service(build_app(dependencies(&store).await)).await;
    let (_, cookie) = sign_up(&app, "Ada").await;
    post_entry(&app, &cookie, 5, "a letter from an old friend").await;

    let reopened = DocumentStore::json_file(&path).expect("reopen");
    let document = reopened.read().await;
    let mut names: Vec<String> = document
        .users
        .iter()
        .map(|user| user.display_name().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Ada".to_owned(), "Admin".to_owned()]);
    assert_eq!(document.entries.len(), 1);
}
