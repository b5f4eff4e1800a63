//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`ReflectionAnalyst`]) are implemented by
//! outbound adapters. Driving ports (`*Service`) are implemented by the
//! domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod entry_repository;
mod insight_service;
mod journal_service;
mod reflection_analyst;
mod settings_repository;
mod settings_service;
mod user_admin_service;
mod user_repository;

#[cfg(test)]
pub use entry_repository::MockEntryRepository;
pub use entry_repository::{EntryRepository, EntryRepositoryError};
#[cfg(test)]
pub use insight_service::MockInsightService;
pub use insight_service::{InsightService, InspirationEntry};
#[cfg(test)]
pub use journal_service::MockJournalService;
pub use journal_service::{
    CommunityOverview, JournalService, ReviseEntryRequest, SubmitEntryRequest,
};
#[cfg(test)]
pub use reflection_analyst::MockReflectionAnalyst;
pub use reflection_analyst::{
    NoOpReflectionAnalyst, PastEntry, ReflectionAnalyst, ReflectionAnalystError,
};
#[cfg(test)]
pub use settings_repository::MockSettingsRepository;
pub use settings_repository::{SettingsRepository, SettingsRepositoryError};
#[cfg(test)]
pub use settings_service::MockSettingsService;
pub use settings_service::SettingsService;
#[cfg(test)]
pub use user_admin_service::MockUserAdminService;
pub use user_admin_service::{UserAdminService, UserProfile};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
