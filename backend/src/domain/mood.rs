//! Mood score recorded with every journal entry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest accepted mood score.
pub const MOOD_MIN: u8 = 1;
/// Highest accepted mood score.
pub const MOOD_MAX: u8 = 5;

/// Validation error for [`MoodScore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("mood score must be between 1 and 5, got {value}")]
pub struct MoodScoreError {
    /// Rejected raw value.
    pub value: i64,
}

/// Integer mood score in `1..=5`.
///
/// # Examples
/// ```
/// use gratitude::domain::MoodScore;
///
/// let mood = MoodScore::new(5).expect("valid mood");
/// assert_eq!(mood.label(), "Awesome");
/// assert!(MoodScore::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MoodScore(u8);

impl MoodScore {
    /// Every mood level, lowest first.
    pub const ALL: [Self; 5] = [Self(1), Self(2), Self(3), Self(4), Self(5)];

    /// Validate a raw score.
    ///
    /// # Errors
    /// Returns [`MoodScoreError`] when `value` is outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, MoodScoreError> {
        u8::try_from(value)
            .ok()
            .filter(|score| (MOOD_MIN..=MOOD_MAX).contains(score))
            .map(Self)
            .ok_or(MoodScoreError { value })
    }

    /// Raw score value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Display label used by charts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "Awful",
            2 => "Okay",
            3 => "Good",
            4 => "Great",
            _ => "Awesome",
        }
    }
}

impl fmt::Display for MoodScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for MoodScore {
    type Error = MoodScoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MoodScore> for u8 {
    fn from(value: MoodScore) -> Self {
        value.0
    }
}
