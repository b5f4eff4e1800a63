//! Driving port for the settings singleton.

use async_trait::async_trait;

use crate::domain::{Error, JournalSettings};

/// Settings use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Current settings.
    async fn settings(&self) -> Result<JournalSettings, Error>;

    /// Replace the settings.
    async fn update_settings(&self, settings: JournalSettings) -> Result<JournalSettings, Error>;
}
