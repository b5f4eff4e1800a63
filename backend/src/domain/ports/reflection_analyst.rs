//! Port for the external text-analysis collaborator.
//!
//! The collaborator is advisory: callers must treat every error as "no
//! result" and never surface it to users.

use async_trait::async_trait;

use crate::domain::{EntryId, MoodScore, WordFrequency};

use super::define_port_error;

define_port_error! {
    /// Errors raised by analyst adapters.
    pub enum ReflectionAnalystError {
        /// The remote call failed or timed out.
        Transport { message: String } => "analyst request failed: {message}",
        /// The remote answer could not be interpreted.
        Response { message: String } => "analyst response invalid: {message}",
        /// No collaborator is configured.
        Disabled => "analyst disabled",
    }
}

/// Past entry handed to the analyst for mood matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastEntry {
    /// Entry identifier echoed back by the analyst.
    pub id: EntryId,
    /// Recorded mood.
    pub mood_score: MoodScore,
    /// Reflection text.
    pub text: String,
}

/// Text analysis used by the insight features.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReflectionAnalyst: Send + Sync {
    /// Identifiers of past entries whose mood is closest to `current`.
    async fn similar_entries(
        &self,
        current: MoodScore,
        past: &[PastEntry],
    ) -> Result<Vec<EntryId>, ReflectionAnalystError>;

    /// Most frequent adjectives in `text`, most frequent first.
    async fn adjective_frequencies(
        &self,
        text: &str,
    ) -> Result<Vec<WordFrequency>, ReflectionAnalystError>;

    /// A fresh gratitude prompt.
    async fn daily_prompt(&self) -> Result<String, ReflectionAnalystError>;
}

/// Analyst used when no collaborator is configured.
///
/// Every call returns [`ReflectionAnalystError::Disabled`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpReflectionAnalyst;

#[async_trait]
impl ReflectionAnalyst for NoOpReflectionAnalyst {
    async fn similar_entries(
        &self,
        _current: MoodScore,
        _past: &[PastEntry],
    ) -> Result<Vec<EntryId>, ReflectionAnalystError> {
        Err(ReflectionAnalystError::disabled())
    }

    async fn adjective_frequencies(
        &self,
        _text: &str,
    ) -> Result<Vec<WordFrequency>, ReflectionAnalystError> {
        Err(ReflectionAnalystError::disabled())
    }

    async fn daily_prompt(&self) -> Result<String, ReflectionAnalystError> {
        Err(ReflectionAnalystError::disabled())
    }
}
