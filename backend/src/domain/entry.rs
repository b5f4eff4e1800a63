//! Journal entry aggregate.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MoodScore, UserId};

/// Minimum entry length in characters after trimming.
pub const ENTRY_TEXT_MIN: usize = 10;
/// Maximum entry length in characters after trimming.
pub const ENTRY_TEXT_MAX: usize = 1000;

/// Validation errors for entry fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryValidationError {
    /// Identifier was not a UUID.
    #[error("entry id must be a valid UUID")]
    InvalidId,
    /// Text shorter than [`ENTRY_TEXT_MIN`].
    #[error("Your entry must be at least {min} characters long.")]
    TextTooShort {
        /// Minimum length.
        min: usize,
    },
    /// Text longer than [`ENTRY_TEXT_MAX`].
    #[error("Your entry must be at most {max} characters long.")]
    TextTooLong {
        /// Maximum length.
        max: usize,
    },
}

/// Stable entry identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(Uuid);

impl EntryId {
    /// Parse an identifier.
    ///
    /// # Errors
    /// Returns [`EntryValidationError::InvalidId`] for non-UUID input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, EntryValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| EntryValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EntryId> for String {
    fn from(value: EntryId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for EntryId {
    type Error = EntryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Trimmed reflection text between 10 and 1000 characters.
///
/// Length counts Unicode scalar values so multi-byte characters count once.
///
/// # Examples
/// ```
/// use gratitude::domain::EntryText;
///
/// assert!(EntryText::new("123456789").is_err());
/// assert!(EntryText::new("  1234567890  ").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryText(String);

impl EntryText {
    /// Validate and trim entry text.
    ///
    /// # Errors
    /// Returns [`EntryValidationError`] when the trimmed text is out of range.
    pub fn new(text: impl AsRef<str>) -> Result<Self, EntryValidationError> {
        let trimmed = text.as_ref().trim();
        let length = trimmed.chars().count();
        if length < ENTRY_TEXT_MIN {
            return Err(EntryValidationError::TextTooShort {
                min: ENTRY_TEXT_MIN,
            });
        }
        if length > ENTRY_TEXT_MAX {
            return Err(EntryValidationError::TextTooLong {
                max: ENTRY_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EntryText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EntryText> for String {
    fn from(value: EntryText) -> Self {
        value.0
    }
}

impl TryFrom<String> for EntryText {
    type Error = EntryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A single journal submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    id: EntryId,
    date: DateTime<Utc>,
    mood_score: MoodScore,
    text: EntryText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
    user_id: UserId,
}

impl JournalEntry {
    /// Build an entry from validated parts.
    #[must_use]
    pub fn new(
        id: EntryId,
        date: DateTime<Utc>,
        mood_score: MoodScore,
        text: EntryText,
        prompt: Option<String>,
        user_id: UserId,
    ) -> Self {
        Self {
            id,
            date,
            mood_score,
            text,
            prompt,
            user_id,
        }
    }

    /// Entry identifier.
    #[must_use]
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    /// Submission timestamp.
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Recorded mood.
    #[must_use]
    pub fn mood_score(&self) -> MoodScore {
        self.mood_score
    }

    /// Reflection text.
    #[must_use]
    pub fn text(&self) -> &EntryText {
        &self.text
    }

    /// Prompt the entry answered, if any.
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Owning user.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Replace the editable fields. Date, prompt, and owner are preserved.
    #[must_use]
    pub fn revised(self, mood_score: MoodScore, text: EntryText) -> Self {
        Self {
            mood_score,
            text,
            ..self
        }
    }
}
