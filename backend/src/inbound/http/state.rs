//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{InsightService, JournalService, SettingsService, UserAdminService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub journal: Arc<dyn JournalService>,
    pub users: Arc<dyn UserAdminService>,
    pub settings: Arc<dyn SettingsService>,
    pub insights: Arc<dyn InsightService>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        journal: Arc<dyn JournalService>,
        users: Arc<dyn UserAdminService>,
        settings: Arc<dyn SettingsService>,
        insights: Arc<dyn InsightService>,
    ) -> Self {
        Self {
            journal,
            users,
            settings,
            insights,
        }
    }
}
