//! Driving port for user selection and administration.

use async_trait::async_trait;

use crate::domain::{DisplayName, Email, Error, User, UserId};

/// Editable user fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Display name.
    pub display_name: DisplayName,
    /// Optional bound address.
    pub email: Option<Email>,
    /// Whether the user may edit their entries.
    pub can_edit: bool,
}

/// User use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdminService: Send + Sync {
    /// Every user.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// One user, or `not_found`.
    async fn find_user(&self, id: &UserId) -> Result<User, Error>;

    /// Whether `id` is the administrator.
    async fn is_administrator(&self, id: &UserId) -> Result<bool, Error>;

    /// Create a user from the admin form.
    async fn create_user(&self, profile: UserProfile) -> Result<User, Error>;

    /// Replace a user's profile.
    async fn update_user(&self, id: &UserId, profile: UserProfile) -> Result<User, Error>;

    /// Delete a non-administrator user and their entries.
    ///
    /// Returns the number of entries removed.
    async fn delete_user(&self, id: &UserId) -> Result<usize, Error>;

    /// Anonymous sign-up creating a profile-only user.
    async fn sign_up(&self, display_name: DisplayName) -> Result<User, Error>;

    /// Check the admin passcode and return the administrator.
    async fn unlock_admin(&self, passcode: &str) -> Result<User, Error>;

    /// Return the administrator, creating it when missing.
    async fn ensure_administrator(&self) -> Result<User, Error>;
}
