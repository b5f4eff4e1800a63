//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// The backing document could not be written.
        Unavailable { message: String } => "user repository unavailable: {message}",
        /// No user carries the requested identifier.
        NotFound { user_id: String } => "user {user_id} not found",
    }
}

/// Storage for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users in insertion order.
    async fn list(&self) -> Vec<User>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Option<User>;

    /// Persist a new user.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Replace an existing user with the same identifier.
    async fn update(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Remove a user together with every entry they own.
    ///
    /// Returns the number of entries removed. Both removals happen in one
    /// write so no orphaned entries remain.
    async fn delete_with_entries(&self, id: &UserId) -> Result<usize, UserRepositoryError>;
}
