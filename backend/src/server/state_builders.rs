//! Builders wiring the document store, domain services and HTTP state.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use gratitude::config::{ConfigError, JournalConfig};
use gratitude::domain::ports::{InsightService, NoOpReflectionAnalyst};
use gratitude::domain::{
    AdminCredentials, InsightServiceImpl, JournalServiceImpl, SettingsServiceImpl,
    UserAdminServiceImpl,
};
use gratitude::inbound::http::state::HttpState;
use gratitude::outbound::ai::{HttpReflectionAnalyst, HttpReflectionAnalystConfig};
use gratitude::outbound::store::{
    DocumentStore, StoreEntryRepository, StoreError, StoreSettingsRepository, StoreUserRepository,
};

/// Failures raised while assembling the application.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    /// A configured value is malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The document store could not be opened.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The AI HTTP client could not be constructed.
    #[error("failed to build AI client: {0}")]
    AiClient(#[source] reqwest::Error),
}

/// Open the store named by `data_file`, or an in-memory store when unset.
pub fn build_store(config: &JournalConfig) -> Result<Arc<DocumentStore>, StateBuildError> {
    let store = match &config.data_file {
        Some(path) => {
            info!(path = %path.display(), "using JSON document store");
            DocumentStore::json_file(path)?
        }
        None => {
            info!("using in-memory store; data is lost on restart");
            DocumentStore::in_memory()
        }
    };
    Ok(Arc::new(store))
}

/// Build the analyst adapter when an AI endpoint is configured.
pub fn build_analyst(config: &JournalConfig) -> Result<Option<HttpReflectionAnalyst>, StateBuildError> {
    let Some(endpoint) = config.ai_endpoint()? else {
        info!("AI endpoint not configured; insights disabled");
        return Ok(None);
    };
    let mut settings = HttpReflectionAnalystConfig::new(endpoint);
    settings.api_key = config.ai_api_key();
    config.ai_model().clone_into(&mut settings.model);
    settings.timeout = config.ai_timeout();
    HttpReflectionAnalyst::new(settings)
        .map(Some)
        .map_err(StateBuildError::AiClient)
}

/// Construct every driving port over the shared store.
pub fn build_http_state(
    store: &Arc<DocumentStore>,
    admin: AdminCredentials,
    clock: Arc<dyn Clock>,
    analyst: Option<HttpReflectionAnalyst>,
) -> HttpState {
    let entries = Arc::new(StoreEntryRepository::new(Arc::clone(store)));
    let users = Arc::new(StoreUserRepository::new(Arc::clone(store)));
    let settings = Arc::new(StoreSettingsRepository::new(Arc::clone(store)));

    let journal = JournalServiceImpl::new(
        Arc::clone(&entries),
        Arc::clone(&users),
        clock,
        admin.email().clone(),
    );
    let insights: Arc<dyn InsightService> = match analyst {
        Some(analyst) => Arc::new(InsightServiceImpl::new(
            Arc::clone(&entries),
            Arc::new(analyst),
        )),
        None => Arc::new(InsightServiceImpl::new(
            Arc::clone(&entries),
            Arc::new(NoOpReflectionAnalyst),
        )),
    };

    HttpState::new(
        Arc::new(journal),
        Arc::new(UserAdminServiceImpl::new(users, admin)),
        Arc::new(SettingsServiceImpl::new(settings)),
        insights,
    )
}
