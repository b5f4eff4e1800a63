//! Repository port adapters over a shared [`DocumentStore`].

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;

use super::{DocumentStore, StoreError};
use crate::domain::ports::{
    EntryRepository, EntryRepositoryError, SettingsRepository, SettingsRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{EntryId, JournalEntry, JournalSettings, User, UserId, posted_on};

impl From<StoreError> for EntryRepositoryError {
    fn from(error: StoreError) -> Self {
        Self::unavailable(error.to_string())
    }
}

impl From<StoreError> for UserRepositoryError {
    fn from(error: StoreError) -> Self {
        Self::unavailable(error.to_string())
    }
}

impl From<StoreError> for SettingsRepositoryError {
    fn from(error: StoreError) -> Self {
        Self::unavailable(error.to_string())
    }
}

fn newest_first(mut entries: Vec<JournalEntry>) -> Vec<JournalEntry> {
    entries.sort_by_key(|entry| Reverse(entry.date()));
    entries
}

/// Entry repository backed by the document store.
#[derive(Clone)]
pub struct StoreEntryRepository {
    store: Arc<DocumentStore>,
}

impl StoreEntryRepository {
    /// Wrap a shared store.
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EntryRepository for StoreEntryRepository {
    async fn list_for_user(&self, user_id: &UserId) -> Vec<JournalEntry> {
        let document = self.store.read().await;
        newest_first(
            document
                .entries
                .into_iter()
                .filter(|entry| entry.user_id() == user_id)
                .collect(),
        )
    }

    async fn list_all(&self) -> Vec<JournalEntry> {
        newest_first(self.store.read().await.entries)
    }

    async fn find(&self, entry_id: &EntryId) -> Option<JournalEntry> {
        self.store
            .read()
            .await
            .entries
            .into_iter()
            .find(|entry| entry.id() == entry_id)
    }

    async fn insert(&self, entry: &JournalEntry) -> Result<(), EntryRepositoryError> {
        let entry = entry.clone();
        self.store
            .write(move |document| {
                if !document.users.iter().any(|user| user.id() == entry.user_id()) {
                    return Err(EntryRepositoryError::missing_owner(entry.user_id().to_string()));
                }
                let day = entry.date().date_naive();
                let owned = document
                    .entries
                    .iter()
                    .filter(|stored| stored.user_id() == entry.user_id());
                if posted_on(owned, day) {
                    return Err(EntryRepositoryError::already_recorded(
                        entry.user_id().to_string(),
                        day.to_string(),
                    ));
                }
                document.entries.push(entry);
                Ok(())
            })
            .await
    }

    async fn update(&self, entry: &JournalEntry) -> Result<(), EntryRepositoryError> {
        let entry = entry.clone();
        self.store
            .write(move |document| {
                if !document.users.iter().any(|user| user.id() == entry.user_id()) {
                    return Err(EntryRepositoryError::missing_owner(entry.user_id().to_string()));
                }
                let slot = document
                    .entries
                    .iter_mut()
                    .find(|stored| stored.id() == entry.id())
                    .ok_or_else(|| EntryRepositoryError::not_found(entry.id().to_string()))?;
                *slot = entry;
                Ok(())
            })
            .await
    }
}

/// User repository backed by the document store.
#[derive(Clone)]
pub struct StoreUserRepository {
    store: Arc<DocumentStore>,
}

impl StoreUserRepository {
    /// Wrap a shared store.
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for StoreUserRepository {
    async fn list(&self) -> Vec<User> {
        self.store.read().await.users
    }

    async fn find_by_id(&self, id: &UserId) -> Option<User> {
        self.store
            .read()
            .await
            .users
            .into_iter()
            .find(|user| user.id() == id)
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let user = user.clone();
        self.store
            .write(move |document| {
                document.users.push(user);
                Ok(())
            })
            .await
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        let user = user.clone();
        self.store
            .write(move |document| {
                let slot = document
                    .users
                    .iter_mut()
                    .find(|stored| stored.id() == user.id())
                    .ok_or_else(|| UserRepositoryError::not_found(user.id().to_string()))?;
                *slot = user;
                Ok(())
            })
            .await
    }

    async fn delete_with_entries(&self, id: &UserId) -> Result<usize, UserRepositoryError> {
        let id = id.clone();
        self.store
            .write(move |document| {
                let before = document.users.len();
                document.users.retain(|user| user.id() != &id);
                if document.users.len() == before {
                    return Err(UserRepositoryError::not_found(id.to_string()));
                }
                let entries_before = document.entries.len();
                document.entries.retain(|entry| entry.user_id() != &id);
                Ok(entries_before - document.entries.len())
            })
            .await
    }
}

/// Settings repository backed by the document store.
#[derive(Clone)]
pub struct StoreSettingsRepository {
    store: Arc<DocumentStore>,
}

impl StoreSettingsRepository {
    /// Wrap a shared store.
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SettingsRepository for StoreSettingsRepository {
    async fn load(&self) -> JournalSettings {
        self.store.read().await.settings
    }

    async fn save(&self, settings: &JournalSettings) -> Result<(), SettingsRepositoryError> {
        let settings = settings.clone();
        self.store
            .write(move |document| {
                document.settings = settings;
                Ok(())
            })
            .await
    }
}
