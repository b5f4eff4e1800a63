//! Tests for journal entry handlers.

use super::*;
use crate::domain::{ALREADY_POSTED_TODAY, EntryId, ErrorCode, UserId, group_by_week};
use crate::inbound::http::test_utils::{MockPorts, session_cookie, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn author() -> UserId {
    UserId::new("6fa85f64-5717-4562-b3fc-2c963f66afa6").expect("user id")
}

fn entry(owner: &UserId, day: u32, mood: i64, text: &str) -> JournalEntry {
    JournalEntry::new(
        EntryId::random(),
        Utc.with_ymd_and_hms(2024, 6, day, 9, 0, 0)
            .single()
            .expect("valid date"),
        MoodScore::new(mood).expect("mood"),
        EntryText::new(text).expect("text"),
        None,
        owner.clone(),
    )
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_entries)
        .service(create_entry)
        .service(update_entry)
        .service(current_week)
        .service(weekly_archive)
        .service(yearly_overview);
}

#[rstest]
#[case::too_short("123456789", StatusCode::BAD_REQUEST)]
#[case::minimum("1234567890", StatusCode::CREATED)]
#[actix_web::test]
async fn create_enforces_text_length(
    author: UserId,
    #[case] text: &'static str,
    #[case] expected: StatusCode,
) {
    let mut ports = MockPorts::default();
    let owner = author.clone();
    ports
        .journal
        .expect_submit_entry()
        .returning(move |request| {
            Ok(JournalEntry::new(
                EntryId::random(),
                Utc::now(),
                request.mood_score,
                request.text,
                request.prompt,
                owner.clone(),
            ))
        });
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = session_cookie(&app, &author, false).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/entries")
            .cookie(cookie)
            .set_json(json!({"moodScore": 4, "text": text}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), expected);
}

#[rstest]
#[actix_web::test]
async fn create_reports_every_field_error(author: UserId) {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), routes)).await;
    let cookie = session_cookie(&app, &author, false).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/entries")
            .cookie(cookie)
            .set_json(json!({"moodScore": 0, "text": "short"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    let fields = &body["details"]["fields"];
    assert!(fields["moodScore"].is_array());
    assert_eq!(
        fields["text"][0],
        "Your entry must be at least 10 characters long."
    );
}

#[rstest]
#[case::fractional(json!(4.5))]
#[case::string(json!("4"))]
#[case::object(json!({"score": 4}))]
#[actix_web::test]
async fn create_reports_mistyped_mood_as_a_field_error(author: UserId, #[case] mood: Value) {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), routes)).await;
    let cookie = session_cookie(&app, &author, false).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/entries")
            .cookie(cookie)
            .set_json(json!({"moodScore": mood, "text": "short"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    let fields = &body["details"]["fields"];
    assert_eq!(
        fields["moodScore"][0],
        "mood score must be a whole number between 1 and 5"
    );
    assert_eq!(
        fields["text"][0],
        "Your entry must be at least 10 characters long."
    );
}

#[rstest]
#[actix_web::test]
async fn create_twice_in_a_day_is_a_conflict(author: UserId) {
    let mut ports = MockPorts::default();
    ports
        .journal
        .expect_submit_entry()
        .returning(|_| Err(Error::conflict(ALREADY_POSTED_TODAY)));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = session_cookie(&app, &author, false).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/entries")
            .cookie(cookie)
            .set_json(json!({"moodScore": 4, "text": "another lovely day"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Error = actix_test::read_body_json(res).await;
    assert_eq!(body.message(), ALREADY_POSTED_TODAY);
}

#[rstest]
#[actix_web::test]
async fn this_week_reports_todays_entry(author: UserId) {
    let mut ports = MockPorts::default();
    let week = crate::domain::current_week(
        vec![
            entry(&author, 16, 4, "pancakes on sunday"),
            entry(&author, 19, 5, "a letter from home"),
        ],
        chrono::NaiveDate::from_ymd_opt(2024, 6, 19).expect("valid date"),
    );
    ports
        .journal
        .expect_current_week()
        .returning(move |_| Ok(week.clone()));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = session_cookie(&app, &author, false).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/entries/this-week")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: CurrentWeekResponse = actix_test::read_body_json(res).await;
    assert_eq!(body.week_start, "2024-06-16");
    assert!(body.has_posted_today);
    assert_eq!(body.entries.len(), 2);
}

#[rstest]
#[actix_web::test]
async fn create_passes_trimmed_prompt(author: UserId) {
    let mut ports = MockPorts::default();
    let owner = author.clone();
    ports
        .journal
        .expect_submit_entry()
        .withf(|request| {
            request.prompt.as_deref() == Some("What are you grateful for?")
                && request.text.as_ref() == "a long walk by the river"
        })
        .times(1)
        .returning(move |request| {
            Ok(JournalEntry::new(
                EntryId::random(),
                Utc::now(),
                request.mood_score,
                request.text,
                request.prompt,
                owner.clone(),
            ))
        });
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = session_cookie(&app, &author, false).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/entries")
            .cookie(cookie)
            .set_json(json!({
                "moodScore": 5,
                "text": "  a long walk by the river ",
                "prompt": " What are you grateful for? "
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: EntryResponse = actix_test::read_body_json(res).await;
    assert_eq!(body.mood, "Awesome");
    assert_eq!(body.user_id, author.to_string());
}

#[rstest]
#[actix_web::test]
async fn entries_require_a_selected_user() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), routes)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/entries").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn update_surfaces_permission_errors(author: UserId) {
    let mut ports = MockPorts::default();
    ports
        .journal
        .expect_revise_entry()
        .returning(|_| Err(Error::forbidden("You do not have permission to edit entries.")));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = session_cookie(&app, &author, false).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/entries/{}", EntryId::random()))
            .cookie(cookie)
            .set_json(json!({"moodScore": 2, "text": "changed my mind today"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Error = actix_test::read_body_json(res).await;
    assert_eq!(body.code(), ErrorCode::Forbidden);
}

#[rstest]
#[actix_web::test]
async fn update_rejects_malformed_entry_id(author: UserId) {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), routes)).await;
    let cookie = session_cookie(&app, &author, false).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/entries/42")
            .cookie(cookie)
            .set_json(json!({"moodScore": 2, "text": "changed my mind today"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn weekly_archive_groups_by_monday(author: UserId) {
    let mut ports = MockPorts::default();
    let weeks = group_by_week(vec![
        entry(&author, 10, 3, "sunny morning coffee"),
        entry(&author, 11, 3, "call with an old friend"),
        entry(&author, 20, 5, "finished the long project"),
    ]);
    ports
        .journal
        .expect_weekly_archive()
        .returning(move |_| Ok(weeks.clone()));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = session_cookie(&app, &author, false).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/entries/weekly")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Vec<WeekResponse> = actix_test::read_body_json(res).await;
    let shape: Vec<(&str, usize)> = body
        .iter()
        .map(|week| (week.week_start.as_str(), week.entries.len()))
        .collect();
    assert_eq!(shape, vec![("2024-06-17", 1), ("2024-06-10", 2)]);
    assert_eq!(body[1].label, "Week of June 10, 2024");
}

#[rstest]
#[actix_web::test]
async fn overview_returns_five_rows(author: UserId) {
    let mut ports = MockPorts::default();
    ports.journal.expect_yearly_moods().returning(|_| {
        Ok(MoodScore::ALL
            .iter()
            .rev()
            .map(|mood| MoodCount {
                name: mood.label(),
                count: usize::from(mood.value()),
            })
            .collect())
    });
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = session_cookie(&app, &author, false).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/entries/overview")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Vec<MoodCountResponse> = actix_test::read_body_json(res).await;
    assert_eq!(body.len(), 5);
    assert_eq!(body[0].name, "Awesome");
    assert_eq!(body[4].name, "Awful");
}
