//! Driving port for AI-assisted insights.
//!
//! Every operation is infallible: collaborator failures degrade to empty
//! results or a fixed fallback.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{EntryId, MoodScore, SizedWord, UserId, WordScale};

/// Past entry offered as inspiration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspirationEntry {
    /// Entry identifier.
    pub id: EntryId,
    /// Mood recorded with the entry.
    pub mood_score: MoodScore,
    /// Reflection text.
    pub text: String,
}

/// Insight use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InsightService: Send + Sync {
    /// Past entries of `user_id` with a mood close to `mood`.
    async fn inspiration(&self, user_id: &UserId, mood: MoodScore) -> Vec<InspirationEntry>;

    /// Sized adjective cloud for `user_id`.
    async fn adjective_cloud(&self, user_id: &UserId, scale: WordScale) -> Vec<SizedWord>;

    /// Generated daily prompt, or the fallback prompt.
    async fn daily_prompt(&self) -> String;
}
