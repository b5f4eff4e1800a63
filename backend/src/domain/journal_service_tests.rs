//! Tests for the journal service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockEntryRepository, MockUserRepository};
use crate::domain::{DisplayName, EntryText, ErrorCode, Identity, MoodScore};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

#[fixture]
fn admin_email() -> Email {
    Email::new("admin@example.com").expect("valid email")
}

fn make_user(name: &str, can_edit: bool) -> User {
    User::new(
        UserId::random(),
        DisplayName::new(name).expect("valid name"),
        Identity::ProfileOnly,
        can_edit,
    )
}

fn make_entry(owner: &UserId, mood: i64, date: DateTime<Utc>) -> JournalEntry {
    JournalEntry::new(
        EntryId::random(),
        date,
        MoodScore::new(mood).expect("valid mood"),
        EntryText::new("grateful for small things").expect("valid text"),
        None,
        owner.clone(),
    )
}

fn make_service(
    entries: MockEntryRepository,
    users: MockUserRepository,
    admin_email: Email,
) -> JournalServiceImpl<MockEntryRepository, MockUserRepository> {
    JournalServiceImpl::new(
        Arc::new(entries),
        Arc::new(users),
        Arc::new(FixtureClock {
            utc_now: fixture_now(),
        }),
        admin_email,
    )
}

#[rstest]
#[tokio::test]
async fn submit_stamps_entry_with_clock(admin_email: Email) {
    let author = make_user("Ada", true);
    let author_id = author.id().clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Some(author));
    let mut entries = MockEntryRepository::new();
    entries.expect_list_for_user().return_once(|_| Vec::new());
    entries.expect_insert().times(1).return_once(|_| Ok(()));

    let service = make_service(entries, users, admin_email);
    let entry = service
        .submit_entry(SubmitEntryRequest {
            user_id: author_id.clone(),
            mood_score: MoodScore::new(4).expect("mood"),
            text: EntryText::new("a warm cup of tea").expect("text"),
            prompt: Some("   ".to_owned()),
        })
        .await
        .expect("entry recorded");

    assert_eq!(entry.date(), fixture_now());
    assert_eq!(entry.user_id(), &author_id);
    assert_eq!(entry.prompt(), None);
}

#[rstest]
#[tokio::test]
async fn submit_for_unknown_user_is_not_found(admin_email: Email) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().times(1).return_once(|_| None);
    let mut entries = MockEntryRepository::new();
    entries.expect_insert().never();

    let service = make_service(entries, users, admin_email);
    let error = service
        .submit_entry(SubmitEntryRequest {
            user_id: UserId::random(),
            mood_score: MoodScore::new(3).expect("mood"),
            text: EntryText::new("ten chars!").expect("text"),
            prompt: None,
        })
        .await
        .expect_err("missing owner");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn storage_failure_surfaces_as_service_unavailable(admin_email: Email) {
    let author = make_user("Ada", true);
    let author_id = author.id().clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Some(author));
    let mut entries = MockEntryRepository::new();
    entries.expect_list_for_user().return_once(|_| Vec::new());
    entries
        .expect_insert()
        .return_once(|_| Err(EntryRepositoryError::unavailable("read-only filesystem")));

    let service = make_service(entries, users, admin_email);
    let error = service
        .submit_entry(SubmitEntryRequest {
            user_id: author_id,
            mood_score: MoodScore::new(3).expect("mood"),
            text: EntryText::new("ten chars!").expect("text"),
            prompt: None,
        })
        .await
        .expect_err("write failure");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid date")
}

#[rstest]
#[case::earlier_today(utc(2024, 6, 21, 0, 5), true)]
#[case::late_yesterday(utc(2024, 6, 20, 23, 55), false)]
#[case::last_week(utc(2024, 6, 14, 12, 0), false)]
#[tokio::test]
async fn one_entry_per_utc_day(
    admin_email: Email,
    #[case] previous: DateTime<Utc>,
    #[case] rejected: bool,
) {
    let author = make_user("Ada", true);
    let author_id = author.id().clone();
    let earlier = make_entry(&author_id, 3, previous);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Some(author));
    let mut entries = MockEntryRepository::new();
    entries
        .expect_list_for_user()
        .return_once(move |_| vec![earlier]);
    entries
        .expect_insert()
        .times(usize::from(!rejected))
        .return_once(|_| Ok(()));

    let service = make_service(entries, users, admin_email);
    let result = service
        .submit_entry(SubmitEntryRequest {
            user_id: author_id,
            mood_score: MoodScore::new(4).expect("mood"),
            text: EntryText::new("another good day here").expect("text"),
            prompt: None,
        })
        .await;

    if rejected {
        let error = result.expect_err("second entry today");
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.message(), ALREADY_POSTED_TODAY);
    } else {
        assert!(result.is_ok());
    }
}

#[rstest]
#[tokio::test]
async fn concurrent_same_day_insert_is_a_conflict(admin_email: Email) {
    let author = make_user("Ada", true);
    let author_id = author.id().clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Some(author));
    let mut entries = MockEntryRepository::new();
    entries.expect_list_for_user().return_once(|_| Vec::new());
    entries.expect_insert().return_once(|entry| {
        Err(EntryRepositoryError::already_recorded(
            entry.user_id().to_string(),
            "2024-06-21",
        ))
    });

    let service = make_service(entries, users, admin_email);
    let error = service
        .submit_entry(SubmitEntryRequest {
            user_id: author_id,
            mood_score: MoodScore::new(4).expect("mood"),
            text: EntryText::new("another good day here").expect("text"),
            prompt: None,
        })
        .await
        .expect_err("store refused the second entry");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn current_week_uses_clock_date(admin_email: Email) {
    let owner = UserId::random();
    let history = vec![
        make_entry(&owner, 5, fixture_now()),
        make_entry(&owner, 3, utc(2024, 6, 16, 8, 0)),
        make_entry(&owner, 2, utc(2024, 6, 15, 8, 0)),
    ];
    let mut entries = MockEntryRepository::new();
    entries
        .expect_list_for_user()
        .return_once(move |_| history);

    let service = make_service(entries, MockUserRepository::new(), admin_email);
    let week = service.current_week(&owner).await.expect("week");
    assert_eq!(week.week_start.to_string(), "2024-06-16");
    assert!(week.has_posted_today);
    assert_eq!(week.entries.len(), 2);
}

#[rstest]
#[case::not_owner(true, false, ErrorCode::Forbidden)]
#[case::no_edit_permission(false, true, ErrorCode::Forbidden)]
#[tokio::test]
async fn revise_enforces_ownership_and_permission(
    admin_email: Email,
    #[case] can_edit: bool,
    #[case] owns_entry: bool,
    #[case] expected: ErrorCode,
) {
    let editor = make_user("Bo", can_edit);
    let editor_id = editor.id().clone();
    let owner = if owns_entry {
        editor_id.clone()
    } else {
        UserId::random()
    };
    let existing = make_entry(&owner, 2, fixture_now());
    let entry_id = existing.id().clone();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Some(editor));
    let mut entries = MockEntryRepository::new();
    entries
        .expect_find()
        .return_once(move |_| Some(existing));
    entries.expect_update().never();

    let service = make_service(entries, users, admin_email);
    let error = service
        .revise_entry(ReviseEntryRequest {
            user_id: editor_id,
            entry_id,
            mood_score: MoodScore::new(5).expect("mood"),
            text: EntryText::new("changed my mind today").expect("text"),
        })
        .await
        .expect_err("revision rejected");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn revise_updates_mood_and_text(admin_email: Email) {
    let editor = make_user("Bo", true);
    let editor_id = editor.id().clone();
    let existing = make_entry(&editor_id, 2, fixture_now());
    let entry_id = existing.id().clone();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Some(editor));
    let mut entries = MockEntryRepository::new();
    entries
        .expect_find()
        .return_once(move |_| Some(existing));
    entries
        .expect_update()
        .withf(|entry| entry.mood_score().value() == 5)
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(entries, users, admin_email);
    let revised = service
        .revise_entry(ReviseEntryRequest {
            user_id: editor_id,
            entry_id: entry_id.clone(),
            mood_score: MoodScore::new(5).expect("mood"),
            text: EntryText::new("changed my mind today").expect("text"),
        })
        .await
        .expect("revision accepted");
    assert_eq!(revised.id(), &entry_id);
    assert_eq!(revised.text().as_ref(), "changed my mind today");
}

#[rstest]
#[tokio::test]
async fn revise_missing_entry_is_not_found(admin_email: Email) {
    let editor = make_user("Bo", true);
    let editor_id = editor.id().clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Some(editor));
    let mut entries = MockEntryRepository::new();
    entries.expect_find().return_once(|_| None);

    let service = make_service(entries, users, admin_email);
    let error = service
        .revise_entry(ReviseEntryRequest {
            user_id: editor_id,
            entry_id: EntryId::random(),
            mood_score: MoodScore::new(5).expect("mood"),
            text: EntryText::new("changed my mind today").expect("text"),
        })
        .await
        .expect_err("missing entry");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn yearly_moods_use_clock_year(admin_email: Email) {
    let owner = UserId::random();
    let this_year = make_entry(&owner, 5, fixture_now());
    let last_year = make_entry(
        &owner,
        5,
        Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0)
            .single()
            .expect("valid date"),
    );
    let mut entries = MockEntryRepository::new();
    entries
        .expect_list_for_user()
        .return_once(move |_| vec![this_year, last_year]);

    let service = make_service(entries, MockUserRepository::new(), admin_email);
    let counts = service.yearly_moods(&owner).await.expect("counts");
    assert_eq!(counts[0].name, "Awesome");
    assert_eq!(counts[0].count, 1);
}

#[rstest]
#[tokio::test]
async fn community_overview_excludes_administrator(admin_email: Email) {
    let admin = User::new(
        UserId::random(),
        DisplayName::new("Admin").expect("name"),
        Identity::from_email(Some(admin_email.clone())),
        true,
    );
    let ada = make_user("Ada", false);
    let all_entries = vec![
        make_entry(admin.id(), 1, fixture_now()),
        make_entry(ada.id(), 4, fixture_now()),
    ];
    let user_list = vec![admin, ada];

    let mut users = MockUserRepository::new();
    users.expect_list().return_once(move || user_list);
    let mut entries = MockEntryRepository::new();
    entries.expect_list_all().return_once(move || all_entries);

    let service = make_service(entries, users, admin_email);
    let overview = service.community_overview().await.expect("overview");
    let total: usize = overview.totals.iter().map(|row| row.count).sum();
    assert_eq!(total, 1);
    assert_eq!(overview.breakdown.users, ["Ada"]);
}
