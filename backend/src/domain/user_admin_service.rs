//! User administration domain service.
//!
//! Owns the administrator rules: the reserved `Admin` name, the sentinel
//! e-mail address, and the ban on deleting or renaming the administrator.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{UserAdminService, UserProfile, UserRepository, UserRepositoryError};
use crate::domain::{
    DisplayName, Email, Error, FieldErrors, Identity, RESERVED_ADMIN_NAME, User, UserId,
};

const NAME_TAKEN: &str = "That name is already taken.";
const EMAIL_TAKEN: &str = "That email address is already in use.";

/// Administrator sentinel address and unlock passcode.
#[derive(Clone)]
pub struct AdminCredentials {
    email: Email,
    passcode: Zeroizing<String>,
}

impl AdminCredentials {
    /// Bundle the configured credentials.
    pub fn new(email: Email, passcode: impl Into<String>) -> Self {
        Self {
            email,
            passcode: Zeroizing::new(passcode.into()),
        }
    }

    /// Sentinel address identifying the administrator.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    fn passcode_matches(&self, candidate: &str) -> bool {
        let expected = self.passcode.as_bytes();
        let candidate = candidate.as_bytes();
        expected.len() == candidate.len()
            && expected
                .iter()
                .zip(candidate)
                .fold(0_u8, |acc, (left, right)| acc | (left ^ right))
                == 0
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("passcode", &"<redacted>")
            .finish()
    }
}

/// User administration service implementing the driving port.
#[derive(Clone)]
pub struct UserAdminServiceImpl<U> {
    users: Arc<U>,
    admin: AdminCredentials,
}

impl<U> UserAdminServiceImpl<U> {
    /// Create the service.
    pub fn new(users: Arc<U>, admin: AdminCredentials) -> Self {
        Self { users, admin }
    }
}

impl<U> UserAdminServiceImpl<U>
where
    U: UserRepository,
{
    fn map_repository_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Unavailable { message } => {
                Error::service_unavailable(format!("user storage unavailable: {message}"))
            }
            UserRepositoryError::NotFound { .. } => Error::not_found("User not found."),
        }
    }

    fn reserved_name_error() -> Error {
        let mut fields = FieldErrors::default();
        fields.push("name", format!("\"{RESERVED_ADMIN_NAME}\" is a reserved name."));
        Self::field_error(fields)
    }

    fn field_error(fields: FieldErrors) -> Error {
        match fields.into_result() {
            Ok(()) => Error::invalid_request("validation failed"),
            Err(error) => error,
        }
    }

    fn conflict(field: &str, message: &str) -> Error {
        Error::conflict(message).with_details(json!({ "fields": { field: [message] } }))
    }

    /// Reject a display name or e-mail address already held by another user.
    async fn ensure_profile_available(
        &self,
        display_name: &DisplayName,
        email: Option<&Email>,
        except: Option<&UserId>,
    ) -> Result<(), Error> {
        if email == Some(self.admin.email()) {
            return Err(Self::conflict("email", EMAIL_TAKEN));
        }
        let others: Vec<User> = self
            .users
            .list()
            .await
            .into_iter()
            .filter(|user| Some(user.id()) != except)
            .collect();
        if others
            .iter()
            .any(|user| user.display_name().same_as(display_name))
        {
            return Err(Self::conflict("name", NAME_TAKEN));
        }
        if email.is_some_and(|email| others.iter().any(|user| user.email() == Some(email))) {
            return Err(Self::conflict("email", EMAIL_TAKEN));
        }
        Ok(())
    }

    async fn find_administrator(&self) -> Option<User> {
        self.users
            .list()
            .await
            .into_iter()
            .find(|user| user.is_administrator(self.admin.email()))
    }

    fn update_administrator(&self, current: User, profile: UserProfile) -> Result<User, Error> {
        let mut fields = FieldErrors::default();
        if !profile.display_name.is_reserved() {
            fields.push("name", "Cannot rename the Admin user.");
        }
        if profile
            .email
            .as_ref()
            .is_some_and(|email| email != self.admin.email())
        {
            fields.push("email", "The administrator's email address cannot be changed.");
        }
        if !fields.is_empty() {
            return Err(Self::field_error(fields));
        }
        let identity = current.identity().clone();
        Ok(current.with_profile(profile.display_name, identity, profile.can_edit))
    }
}

#[async_trait]
impl<U> UserAdminService for UserAdminServiceImpl<U>
where
    U: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        Ok(self.users.list().await)
    }

    async fn find_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .ok_or_else(|| Error::not_found("User not found."))
    }

    async fn is_administrator(&self, id: &UserId) -> Result<bool, Error> {
        Ok(self
            .users
            .find_by_id(id)
            .await
            .is_some_and(|user| user.is_administrator(self.admin.email())))
    }

    async fn create_user(&self, profile: UserProfile) -> Result<User, Error> {
        if profile.display_name.is_reserved() {
            return Err(Self::reserved_name_error());
        }
        self.ensure_profile_available(&profile.display_name, profile.email.as_ref(), None)
            .await?;

        let user = User::new(
            UserId::random(),
            profile.display_name,
            Identity::from_email(profile.email),
            profile.can_edit,
        );
        self.users
            .insert(&user)
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %user.id(), "user created");
        Ok(user)
    }

    async fn update_user(&self, id: &UserId, profile: UserProfile) -> Result<User, Error> {
        let current = self.find_user(id).await?;
        let updated = if current.is_administrator(self.admin.email()) {
            self.update_administrator(current, profile)?
        } else {
            if profile.display_name.is_reserved() {
                return Err(Self::reserved_name_error());
            }
            self.ensure_profile_available(&profile.display_name, profile.email.as_ref(), Some(id))
                .await?;
            current.with_profile(
                profile.display_name,
                Identity::from_email(profile.email),
                profile.can_edit,
            )
        };

        self.users
            .update(&updated)
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %updated.id(), "user updated");
        Ok(updated)
    }

    async fn delete_user(&self, id: &UserId) -> Result<usize, Error> {
        let target = self.find_user(id).await?;
        if target.is_administrator(self.admin.email()) {
            warn!(user_id = %id, "refused to delete the administrator");
            return Err(Error::forbidden("Cannot delete the Admin user."));
        }
        let removed = self
            .users
            .delete_with_entries(id)
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %id, entries_removed = removed, "user deleted");
        Ok(removed)
    }

    async fn sign_up(&self, display_name: DisplayName) -> Result<User, Error> {
        if display_name.is_reserved() {
            return Err(Self::reserved_name_error());
        }
        self.ensure_profile_available(&display_name, None, None)
            .await?;
        let user = User::new(UserId::random(), display_name, Identity::ProfileOnly, false);
        self.users
            .insert(&user)
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %user.id(), "user signed up");
        Ok(user)
    }

    async fn unlock_admin(&self, passcode: &str) -> Result<User, Error> {
        if !self.admin.passcode_matches(passcode) {
            warn!("admin unlock rejected");
            return Err(Error::unauthorized("Incorrect passcode."));
        }
        self.ensure_administrator().await
    }

    async fn ensure_administrator(&self) -> Result<User, Error> {
        if let Some(admin) = self.find_administrator().await {
            return Ok(admin);
        }
        let display_name = DisplayName::new(RESERVED_ADMIN_NAME)
            .map_err(|err| Error::internal(format!("invalid administrator name: {err}")))?;
        let admin = User::new(
            UserId::random(),
            display_name,
            Identity::from_email(Some(self.admin.email().clone())),
            true,
        );
        self.users
            .insert(&admin)
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %admin.id(), "administrator seeded");
        Ok(admin)
    }
}

#[cfg(test)]
#[path = "user_admin_service_tests.rs"]
mod tests;
