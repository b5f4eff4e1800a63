//! User data model.
//!
//! A user is either bound to an e-mail address ([`Identity::Authenticated`])
//! or is a bare profile created by sign-up or by the administrator
//! ([`Identity::ProfileOnly`]). The administrator is the authenticated user
//! whose address matches the configured sentinel.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// Identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Display name was blank.
    #[error("Name must not be empty.")]
    EmptyDisplayName,
    /// Display name was shorter than the minimum.
    #[error("Name must be at least {min} characters long.")]
    DisplayNameTooShort {
        /// Minimum length.
        min: usize,
    },
    /// Display name was longer than the maximum.
    #[error("Name must be at most {max} characters long.")]
    DisplayNameTooLong {
        /// Maximum length.
        max: usize,
    },
    /// E-mail address was malformed.
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when `id` is empty or not a UUID.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 2;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 32;
/// Display name reserved for the administrator.
pub const RESERVED_ADMIN_NAME: &str = "Admin";

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`]; surrounding whitespace is
    /// trimmed.
    ///
    /// # Errors
    /// Returns [`UserValidationError`] for blank, too short or too long names.
    /// Any printable text is accepted, so `Dr. Who` and `J.R.` are valid.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = display_name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }

        let length = trimmed.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(UserValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// True for the administrator's reserved name, compared case-insensitively.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.0.eq_ignore_ascii_case(RESERVED_ADMIN_NAME)
    }

    /// True when both names are the same ignoring case.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Lower-cased e-mail address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate an address; comparison is case-insensitive so the stored
    /// form is lower-cased.
    ///
    /// # Errors
    /// Returns [`UserValidationError::InvalidEmail`] for malformed input.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// How a user is known to the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Bound to an e-mail address.
    Authenticated {
        /// Verified address.
        email: Email,
    },
    /// Bare profile without an address.
    ProfileOnly,
}

impl Identity {
    /// Build an identity from an optional address.
    #[must_use]
    pub fn from_email(email: Option<Email>) -> Self {
        match email {
            Some(email) => Self::Authenticated { email },
            None => Self::ProfileOnly,
        }
    }

    /// The bound address, if any.
    #[must_use]
    pub fn email(&self) -> Option<&Email> {
        match self {
            Self::Authenticated { email } => Some(email),
            Self::ProfileOnly => None,
        }
    }
}

/// Application user.
///
/// ## Invariants
/// - `id` is a UUID.
/// - `display_name` satisfies [`DisplayName::new`].
///
/// # Examples
/// ```
/// use gratitude::domain::{DisplayName, Email, Identity, User, UserId};
///
/// let admin_email = Email::new("admin@example.com").expect("valid email");
/// let admin = User::new(
///     UserId::random(),
///     DisplayName::new("Admin").expect("valid name"),
///     Identity::from_email(Some(admin_email.clone())),
///     true,
/// );
/// assert!(admin.is_administrator(&admin_email));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    display_name: DisplayName,
    identity: Identity,
    can_edit: bool,
}

impl User {
    /// Build a new [`User`] from validated components.
    #[must_use]
    pub fn new(id: UserId, display_name: DisplayName, identity: Identity, can_edit: bool) -> Self {
        Self {
            id,
            display_name,
            identity,
            can_edit,
        }
    }

    /// Stable user identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name shown in lists and chart legends.
    #[must_use]
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// How the user is known.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Bound e-mail address, if any.
    #[must_use]
    pub fn email(&self) -> Option<&Email> {
        self.identity.email()
    }

    /// Whether the user may edit their own entries.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.can_edit
    }

    /// True when this user holds the administrator sentinel address.
    #[must_use]
    pub fn is_administrator(&self, admin_email: &Email) -> bool {
        self.email() == Some(admin_email)
    }

    /// Replace the mutable profile fields, keeping the identifier.
    #[must_use]
    pub fn with_profile(self, display_name: DisplayName, identity: Identity, can_edit: bool) -> Self {
        Self {
            id: self.id,
            display_name,
            identity,
            can_edit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, alias = "can-edit")]
    can_edit: bool,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            display_name,
            identity,
            can_edit,
        } = value;
        Self {
            id: id.to_string(),
            name: display_name.into(),
            email: identity.email().map(ToString::to_string),
            can_edit,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let email = value.email.map(Email::new).transpose()?;
        Ok(Self::new(
            UserId::new(value.id)?,
            DisplayName::new(value.name)?,
            Identity::from_email(email),
            value.can_edit,
        ))
    }
}
