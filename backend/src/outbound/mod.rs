//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **store**: the document store and its repository adapters, backed by
//!   memory or a JSON file
//! - **ai**: the HTTP text-analysis collaborator
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod ai;
pub mod store;
