//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies deserialise into loosely typed DTOs so that every field can
//! be checked before anything is rejected. The helpers here turn those raw
//! values into domain types, recording failures in a [`FieldErrors`] map.

use serde_json::{Value, json};

use crate::domain::{
    DisplayName, Email, EntryId, EntryText, Error, FieldErrors, GratitudePrompt, MoodScore, UserId,
};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const MOOD_SCORE: FieldName = FieldName::new("moodScore");
pub(crate) const TEXT: FieldName = FieldName::new("text");
pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const GRATITUDE_PROMPT: FieldName = FieldName::new("gratitudePrompt");

fn missing(errors: &mut FieldErrors, field: FieldName) {
    errors.push(field.as_str(), format!("{} is required.", field.as_str()));
}

/// Parse a required mood score from raw JSON.
///
/// Anything other than a whole number, such as `4.5` or `"4"`, is recorded as
/// a field error rather than failing the whole body.
pub(crate) fn mood_score(errors: &mut FieldErrors, raw: Option<Value>) -> Option<MoodScore> {
    let Some(raw) = raw else {
        missing(errors, MOOD_SCORE);
        return None;
    };
    let Some(value) = raw.as_i64() else {
        errors.push(
            MOOD_SCORE.as_str(),
            "mood score must be a whole number between 1 and 5",
        );
        return None;
    };
    errors.capture(MOOD_SCORE.as_str(), MoodScore::new(value))
}

/// Parse a required entry body.
pub(crate) fn entry_text(errors: &mut FieldErrors, raw: Option<String>) -> Option<EntryText> {
    let Some(raw) = raw else {
        missing(errors, TEXT);
        return None;
    };
    errors.capture(TEXT.as_str(), EntryText::new(raw))
}

/// Parse a required display name.
pub(crate) fn display_name(errors: &mut FieldErrors, raw: Option<String>) -> Option<DisplayName> {
    let Some(raw) = raw else {
        missing(errors, NAME);
        return None;
    };
    errors.capture(NAME.as_str(), DisplayName::new(raw))
}

/// Parse an optional e-mail address; blank input counts as absent.
pub(crate) fn optional_email(errors: &mut FieldErrors, raw: Option<String>) -> Option<Email> {
    let raw = raw.filter(|value| !value.trim().is_empty())?;
    errors.capture(EMAIL.as_str(), Email::new(raw))
}

/// Parse a required gratitude prompt.
pub(crate) fn gratitude_prompt(
    errors: &mut FieldErrors,
    raw: Option<String>,
) -> Option<GratitudePrompt> {
    let Some(raw) = raw else {
        missing(errors, GRATITUDE_PROMPT);
        return None;
    };
    errors.capture(GRATITUDE_PROMPT.as_str(), GratitudePrompt::new(raw))
}

fn invalid_id_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_uuid",
    }))
}

/// Parse a user id from a path segment or request body.
pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_id_error(field, value))
}

/// Parse an entry id from a path segment.
pub(crate) fn parse_entry_id(value: &str, field: FieldName) -> Result<EntryId, Error> {
    EntryId::new(value).map_err(|_| invalid_id_error(field, value))
}
