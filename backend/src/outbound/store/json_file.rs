//! JSON file backend.
//!
//! The document is read fully on every load and rewritten fully on every
//! persist. Writes go to a uniquely named sibling file which is then renamed
//! over the document, so readers never observe a half-written file.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use super::{StoreDocument, StoreError};

/// JSON document on disk.
pub struct JsonFileBackend {
    dir: Dir,
    file_name: PathBuf,
    path: PathBuf,
}

impl std::fmt::Debug for JsonFileBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileBackend")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl JsonFileBackend {
    /// Open the directory holding `path`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] when `path` has no file name and
    /// [`StoreError::Io`] when the directory cannot be created or opened.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let file_name = path
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| StoreError::InvalidPath {
                path: path.to_path_buf(),
            })?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Dir::create_ambient_dir_all(&parent, ambient_authority())
            .map_err(|error| StoreError::io(&parent, error))?;
        let dir = Dir::open_ambient_dir(&parent, ambient_authority())
            .map_err(|error| StoreError::io(&parent, error))?;
        Ok(Self {
            dir,
            file_name,
            path: path.to_path_buf(),
        })
    }

    /// Document location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(super) fn load(&self) -> Result<StoreDocument, StoreError> {
        let raw = match self.dir.read_to_string(&self.file_name) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store document absent; starting empty");
                return Ok(StoreDocument::default());
            }
            Err(error) => return Err(StoreError::io(&self.path, error)),
        };
        if raw.trim().is_empty() {
            return Ok(StoreDocument::default());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    pub(super) fn persist(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec_pretty(document).map_err(StoreError::Encode)?;
        let staged = PathBuf::from(format!(
            ".{}.{}.tmp",
            self.file_name.display(),
            Uuid::new_v4().simple()
        ));

        if let Err(error) = self.dir.write(&staged, &encoded) {
            let _cleanup_result = self.dir.remove_file(&staged);
            return Err(StoreError::io(&self.path, error));
        }
        self.dir
            .rename(&staged, &self.dir, &self.file_name)
            .map_err(|error| {
                let _cleanup_result = self.dir.remove_file(&staged);
                StoreError::io(&self.path, error)
            })
    }
}
