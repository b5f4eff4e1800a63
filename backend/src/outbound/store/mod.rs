//! Document store backing every repository port.
//!
//! The whole application state is one [`StoreDocument`]. Reads take a
//! snapshot; writes run a closure against the document under an async mutex
//! and persist the result only when the closure succeeds. Two backends exist:
//! process memory and a JSON file replaced atomically on each write.

mod json_file;
mod repositories;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::{JournalEntry, JournalSettings, User};

pub use self::json_file::JsonFileBackend;
pub use self::repositories::{StoreEntryRepository, StoreSettingsRepository, StoreUserRepository};

/// Persisted application state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Registered users in insertion order.
    #[serde(default)]
    pub users: Vec<User>,
    /// Journal entries of every user.
    #[serde(default)]
    pub entries: Vec<JournalEntry>,
    /// Settings singleton.
    #[serde(default)]
    pub settings: JournalSettings,
}

/// Failures raised while loading or persisting the document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The configured path cannot name a document file.
    #[error("invalid store path {path}")]
    InvalidPath {
        /// Offending path.
        path: PathBuf,
    },
    /// Filesystem access failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The document exists but is not valid JSON for [`StoreDocument`].
    #[error("store document {path} is corrupt: {source}")]
    Corrupt {
        /// Document path.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The document could not be encoded.
    #[error("failed to encode store document: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

enum Backend {
    Memory(StoreDocument),
    JsonFile(JsonFileBackend),
}

impl Backend {
    fn load(&self) -> Result<StoreDocument, StoreError> {
        match self {
            Self::Memory(document) => Ok(document.clone()),
            Self::JsonFile(file) => file.load(),
        }
    }

    fn persist(&mut self, document: StoreDocument) -> Result<(), StoreError> {
        match self {
            Self::Memory(current) => {
                *current = document;
                Ok(())
            }
            Self::JsonFile(file) => file.persist(&document),
        }
    }
}

/// Shared store handed to every repository adapter.
pub struct DocumentStore {
    backend: Mutex<Backend>,
}

impl DocumentStore {
    /// Empty store held in process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_document(StoreDocument::default())
    }

    /// In-memory store seeded with `document`.
    #[must_use]
    pub fn with_document(document: StoreDocument) -> Self {
        Self {
            backend: Mutex::new(Backend::Memory(document)),
        }
    }

    /// Store persisted as a JSON document at `path`.
    ///
    /// The parent directory is created when missing. The document itself is
    /// created on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the path has no file name or the parent
    /// directory cannot be opened.
    pub fn json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let backend = JsonFileBackend::open(path.as_ref())?;
        Ok(Self {
            backend: Mutex::new(Backend::JsonFile(backend)),
        })
    }

    /// Snapshot of the current document.
    ///
    /// Unreadable or corrupt documents are logged and reported as empty.
    pub async fn read(&self) -> StoreDocument {
        let backend = self.backend.lock().await;
        backend.load().unwrap_or_else(|error| {
            warn!(error = %error, "store read failed; serving empty document");
            StoreDocument::default()
        })
    }

    /// Apply `change` to the document and persist it when it succeeds.
    ///
    /// The mutex is held for the whole load, change and persist sequence.
    /// A corrupt document is not overwritten: the write fails instead.
    ///
    /// # Errors
    ///
    /// Returns the closure's error unchanged, or a [`StoreError`] converted
    /// into `E` when loading or persisting fails.
    pub async fn write<T, E>(
        &self,
        change: impl FnOnce(&mut StoreDocument) -> Result<T, E> + Send,
    ) -> Result<T, E>
    where
        T: Send,
        E: From<StoreError> + Send,
    {
        let mut backend = self.backend.lock().await;
        let mut document = backend.load()?;
        let outcome = change(&mut document)?;
        backend.persist(document)?;
        Ok(outcome)
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
