//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed journal entities and the services that
//! apply the journal rules. Types validate on construction, so anything
//! holding a [`JournalEntry`] or [`User`] can rely on its invariants.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, JournalEntry, JournalSettings: persisted aggregates.
//! - `*ServiceImpl`: domain services behind the driving ports.

pub mod aggregation;
pub mod entry;
pub mod error;
pub mod insight_service;
pub mod journal_service;
pub mod mood;
pub mod ports;
pub mod settings;
pub mod settings_service;
pub mod trace_id;
pub mod user;
pub mod user_admin_service;
pub mod validation;
pub mod word_cloud;

pub use self::aggregation::{
    CurrentWeek, MoodCount, UserMoodBreakdown, UserMoodRow, WeekBucket, current_week,
    group_by_week, posted_on, week_start, yearly_mood_breakdown, yearly_mood_counts,
};
pub use self::entry::{
    ENTRY_TEXT_MAX, ENTRY_TEXT_MIN, EntryId, EntryText, EntryValidationError, JournalEntry,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::insight_service::{FALLBACK_DAILY_PROMPT, InsightServiceImpl, MAX_ADJECTIVES};
pub use self::journal_service::{ALREADY_POSTED_TODAY, JournalServiceImpl};
pub use self::mood::{MOOD_MAX, MOOD_MIN, MoodScore, MoodScoreError};
pub use self::settings::{
    DEFAULT_GRATITUDE_PROMPT, GRATITUDE_PROMPT_MIN, GratitudePrompt, GratitudePromptError,
    JournalSettings,
};
pub use self::settings_service::SettingsServiceImpl;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DISPLAY_NAME_MAX, DISPLAY_NAME_MIN, DisplayName, Email, Identity, RESERVED_ADMIN_NAME, User,
    UserId, UserValidationError,
};
pub use self::user_admin_service::{AdminCredentials, UserAdminServiceImpl};
pub use self::validation::FieldErrors;
pub use self::word_cloud::{
    SizedWord, WordFrequency, WordScale, WordScaleParseError, size_words,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use gratitude::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
