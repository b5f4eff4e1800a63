//! Driving port for journal entry use-cases.
//!
//! HTTP handlers call this port with already-validated values; the
//! implementation owns authorisation rules such as the edit permission.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    CurrentWeek, EntryId, EntryText, Error, JournalEntry, MoodCount, MoodScore, UserId,
    UserMoodBreakdown, WeekBucket,
};

/// A new entry for the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitEntryRequest {
    /// Author.
    pub user_id: UserId,
    /// Recorded mood.
    pub mood_score: MoodScore,
    /// Reflection text.
    pub text: EntryText,
    /// Prompt shown when the entry was written.
    pub prompt: Option<String>,
}

/// An owner's edit of an existing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviseEntryRequest {
    /// User performing the edit.
    pub user_id: UserId,
    /// Entry to edit.
    pub entry_id: EntryId,
    /// Replacement mood.
    pub mood_score: MoodScore,
    /// Replacement text.
    pub text: EntryText,
}

/// Yearly moods across every non-administrator user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunityOverview {
    /// Combined counts, highest mood first.
    pub totals: Vec<MoodCount>,
    /// Counts split by user for stacked charts.
    pub breakdown: UserMoodBreakdown,
}

/// Journal use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JournalService: Send + Sync {
    /// Record a new entry dated now; one per user per UTC day.
    async fn submit_entry(&self, request: SubmitEntryRequest) -> Result<JournalEntry, Error>;

    /// Change the mood and text of an owned entry.
    async fn revise_entry(&self, request: ReviseEntryRequest) -> Result<JournalEntry, Error>;

    /// The user's entries, newest first.
    async fn list_entries(&self, user_id: &UserId) -> Result<Vec<JournalEntry>, Error>;

    /// This week's entries (Sunday to Saturday) and whether today has one.
    async fn current_week(&self, user_id: &UserId) -> Result<CurrentWeek, Error>;

    /// The user's entries grouped by week, newest week first.
    async fn weekly_archive(&self, user_id: &UserId) -> Result<Vec<WeekBucket>, Error>;

    /// Mood tally of the user's entries in the current year.
    async fn yearly_moods(&self, user_id: &UserId) -> Result<Vec<MoodCount>, Error>;

    /// Mood tally of every non-administrator user in the current year.
    async fn community_overview(&self) -> Result<CommunityOverview, Error>;
}
