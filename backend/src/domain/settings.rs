//! Global journal settings singleton.

use serde::{Deserialize, Serialize};

/// Default daily prompt shown above the entry form.
pub const DEFAULT_GRATITUDE_PROMPT: &str = "What are you grateful for?";
/// Minimum prompt length after trimming.
pub const GRATITUDE_PROMPT_MIN: usize = 5;

/// Validation error for [`GratitudePrompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Prompt must be at least {min} characters long.")]
pub struct GratitudePromptError {
    /// Minimum length.
    pub min: usize,
}

/// Trimmed prompt text of at least five characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GratitudePrompt(String);

impl GratitudePrompt {
    /// Validate a prompt.
    ///
    /// # Errors
    /// Returns [`GratitudePromptError`] when the trimmed prompt is too short.
    pub fn new(prompt: impl AsRef<str>) -> Result<Self, GratitudePromptError> {
        let trimmed = prompt.as_ref().trim();
        if trimmed.chars().count() < GRATITUDE_PROMPT_MIN {
            return Err(GratitudePromptError {
                min: GRATITUDE_PROMPT_MIN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl Default for GratitudePrompt {
    fn default() -> Self {
        Self(DEFAULT_GRATITUDE_PROMPT.to_owned())
    }
}

impl AsRef<str> for GratitudePrompt {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<GratitudePrompt> for String {
    fn from(value: GratitudePrompt) -> Self {
        value.0
    }
}

impl TryFrom<String> for GratitudePrompt {
    type Error = GratitudePromptError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application-wide settings.
///
/// # Examples
/// ```
/// use gratitude::domain::JournalSettings;
///
/// let settings = JournalSettings::default();
/// assert_eq!(settings.gratitude_prompt.as_ref(), "What are you grateful for?");
/// assert!(settings.show_explanation);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalSettings {
    /// Prompt shown above the entry form.
    #[serde(default)]
    pub gratitude_prompt: GratitudePrompt,
    /// Whether the explanation panel is visible.
    #[serde(default = "show_explanation_default")]
    pub show_explanation: bool,
}

fn show_explanation_default() -> bool {
    true
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            gratitude_prompt: GratitudePrompt::default(),
            show_explanation: true,
        }
    }
}
