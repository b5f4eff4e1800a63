//! Port for the settings singleton.

use async_trait::async_trait;

use crate::domain::JournalSettings;

use super::define_port_error;

define_port_error! {
    /// Errors raised when persisting settings.
    pub enum SettingsRepositoryError {
        /// The backing document could not be written.
        Unavailable { message: String } => "settings repository unavailable: {message}",
    }
}

/// Storage for [`JournalSettings`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Current settings, or the defaults when none were saved.
    async fn load(&self) -> JournalSettings;

    /// Replace the stored settings.
    async fn save(&self, settings: &JournalSettings) -> Result<(), SettingsRepositoryError>;
}
