//! Settings domain service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{SettingsRepository, SettingsRepositoryError, SettingsService};
use crate::domain::{Error, JournalSettings};

/// Settings service implementing the driving port.
#[derive(Clone)]
pub struct SettingsServiceImpl<S> {
    repo: Arc<S>,
}

impl<S> SettingsServiceImpl<S> {
    /// Create the service.
    pub fn new(repo: Arc<S>) -> Self {
        Self { repo }
    }
}

fn map_settings_error(error: SettingsRepositoryError) -> Error {
    match error {
        SettingsRepositoryError::Unavailable { message } => {
            Error::service_unavailable(format!("settings storage unavailable: {message}"))
        }
    }
}

#[async_trait]
impl<S> SettingsService for SettingsServiceImpl<S>
where
    S: SettingsRepository,
{
    async fn settings(&self) -> Result<JournalSettings, Error> {
        Ok(self.repo.load().await)
    }

    async fn update_settings(&self, settings: JournalSettings) -> Result<JournalSettings, Error> {
        self.repo.save(&settings).await.map_err(map_settings_error)?;
        info!(
            show_explanation = settings.show_explanation,
            "settings updated"
        );
        Ok(settings)
    }
}
