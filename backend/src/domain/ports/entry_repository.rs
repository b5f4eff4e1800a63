//! Port for journal entry persistence.

use async_trait::async_trait;

use crate::domain::{EntryId, JournalEntry, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by entry repository adapters.
    pub enum EntryRepositoryError {
        /// The backing document could not be written.
        Unavailable { message: String } => "entry repository unavailable: {message}",
        /// The entry owner does not exist at write time.
        MissingOwner { user_id: String } => "entry owner {user_id} does not exist",
        /// No entry carries the requested identifier.
        NotFound { entry_id: String } => "entry {entry_id} not found",
        /// The owner already has an entry on that UTC day.
        AlreadyRecorded { user_id: String, day: String } =>
            "user {user_id} already has an entry on {day}",
    }
}

/// Storage for journal entries.
///
/// Reads never fail: an unreadable store is reported as empty by adapters.
/// Writes enforce that the owner resolves to an existing user, and inserts
/// allow one entry per owner per UTC day.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Entries owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Vec<JournalEntry>;

    /// Every stored entry, newest first.
    async fn list_all(&self) -> Vec<JournalEntry>;

    /// Fetch one entry.
    async fn find(&self, entry_id: &EntryId) -> Option<JournalEntry>;

    /// Persist a new entry.
    async fn insert(&self, entry: &JournalEntry) -> Result<(), EntryRepositoryError>;

    /// Replace an existing entry with the same identifier.
    async fn update(&self, entry: &JournalEntry) -> Result<(), EntryRepositoryError>;
}
