//! Journal entry domain service.
//!
//! Implements [`JournalService`] over the entry and user repositories. The
//! clock is injected so dates and the "current year" are deterministic in
//! tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CommunityOverview, EntryRepository, EntryRepositoryError, JournalService, ReviseEntryRequest,
    SubmitEntryRequest, UserRepository,
};
use crate::domain::{
    CurrentWeek, Email, EntryId, Error, JournalEntry, MoodCount, User, UserId, WeekBucket,
    current_week, group_by_week, posted_on, yearly_mood_breakdown, yearly_mood_counts,
};

/// Message returned when a second entry is submitted on one UTC day.
pub const ALREADY_POSTED_TODAY: &str =
    "You've already recorded your gratitude for today. Come back tomorrow to write a new entry.";

/// Journal service implementing the driving port.
#[derive(Clone)]
pub struct JournalServiceImpl<E, U> {
    entries: Arc<E>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
    admin_email: Email,
}

impl<E, U> JournalServiceImpl<E, U> {
    /// Create the service.
    pub fn new(entries: Arc<E>, users: Arc<U>, clock: Arc<dyn Clock>, admin_email: Email) -> Self {
        Self {
            entries,
            users,
            clock,
            admin_email,
        }
    }
}

impl<E, U> JournalServiceImpl<E, U>
where
    E: EntryRepository,
    U: UserRepository,
{
    fn map_entry_error(error: EntryRepositoryError) -> Error {
        match error {
            EntryRepositoryError::Unavailable { message } => {
                Error::service_unavailable(format!("journal storage unavailable: {message}"))
            }
            EntryRepositoryError::MissingOwner { .. } => Error::not_found("User not found."),
            EntryRepositoryError::NotFound { .. } => Error::not_found("Entry not found."),
            EntryRepositoryError::AlreadyRecorded { .. } => Self::already_posted_today(),
        }
    }

    fn already_posted_today() -> Error {
        Error::conflict(ALREADY_POSTED_TODAY)
    }

    fn current_year(&self) -> i32 {
        self.clock.utc().year()
    }

    async fn require_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .ok_or_else(|| Error::not_found("User not found."))
    }
}

#[async_trait]
impl<E, U> JournalService for JournalServiceImpl<E, U>
where
    E: EntryRepository,
    U: UserRepository,
{
    async fn submit_entry(&self, request: SubmitEntryRequest) -> Result<JournalEntry, Error> {
        let SubmitEntryRequest {
            user_id,
            mood_score,
            text,
            prompt,
        } = request;
        self.require_user(&user_id).await?;

        let now = self.clock.utc();
        let history = self.entries.list_for_user(&user_id).await;
        if posted_on(&history, now.date_naive()) {
            return Err(Self::already_posted_today());
        }

        let entry = JournalEntry::new(
            EntryId::random(),
            now,
            mood_score,
            text,
            prompt.filter(|prompt| !prompt.trim().is_empty()),
            user_id,
        );
        self.entries
            .insert(&entry)
            .await
            .map_err(Self::map_entry_error)?;
        info!(entry_id = %entry.id(), user_id = %entry.user_id(), "journal entry recorded");
        Ok(entry)
    }

    async fn revise_entry(&self, request: ReviseEntryRequest) -> Result<JournalEntry, Error> {
        let ReviseEntryRequest {
            user_id,
            entry_id,
            mood_score,
            text,
        } = request;
        let user = self.require_user(&user_id).await?;
        let entry = self
            .entries
            .find(&entry_id)
            .await
            .ok_or_else(|| Error::not_found("Entry not found."))?;

        if entry.user_id() != &user_id {
            return Err(Error::forbidden("You can only edit your own entries."));
        }
        if !user.can_edit() {
            return Err(Error::forbidden("You do not have permission to edit entries."));
        }

        let revised = entry.revised(mood_score, text);
        self.entries
            .update(&revised)
            .await
            .map_err(Self::map_entry_error)?;
        info!(entry_id = %revised.id(), "journal entry revised");
        Ok(revised)
    }

    async fn list_entries(&self, user_id: &UserId) -> Result<Vec<JournalEntry>, Error> {
        Ok(self.entries.list_for_user(user_id).await)
    }

    async fn current_week(&self, user_id: &UserId) -> Result<CurrentWeek, Error> {
        let entries = self.entries.list_for_user(user_id).await;
        Ok(current_week(entries, self.clock.utc().date_naive()))
    }

    async fn weekly_archive(&self, user_id: &UserId) -> Result<Vec<WeekBucket>, Error> {
        Ok(group_by_week(self.entries.list_for_user(user_id).await))
    }

    async fn yearly_moods(&self, user_id: &UserId) -> Result<Vec<MoodCount>, Error> {
        let entries = self.entries.list_for_user(user_id).await;
        Ok(yearly_mood_counts(&entries, self.current_year()))
    }

    async fn community_overview(&self) -> Result<CommunityOverview, Error> {
        let users: Vec<User> = self
            .users
            .list()
            .await
            .into_iter()
            .filter(|user| !user.is_administrator(&self.admin_email))
            .collect();
        let entries: Vec<JournalEntry> = self
            .entries
            .list_all()
            .await
            .into_iter()
            .filter(|entry| users.iter().any(|user| user.id() == entry.user_id()))
            .collect();

        let year = self.current_year();
        Ok(CommunityOverview {
            totals: yearly_mood_counts(&entries, year),
            breakdown: yearly_mood_breakdown(&entries, &users, year),
        })
    }
}

#[cfg(test)]
#[path = "journal_service_tests.rs"]
mod tests;
