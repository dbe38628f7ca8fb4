//! User accounts.
//!
//! Accounts are keyed by a UUID and identified to humans by a normalised
//! email address. Password hashes never leave the domain in serialised form.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised when building user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("users must have an email address")]
    EmptyEmail,
    #[error("email address must contain a single '@' with a local part and a domain")]
    MalformedEmail,
    #[error("email address must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its hyphenated string form.
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

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum stored length of an email address.
pub const EMAIL_MAX: usize = 255;
/// Maximum stored length of a user's name.
pub const USER_NAME_MAX: usize = 255;

/// Normalised email address used as the natural key of an account.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`EMAIL_MAX`] characters.
/// - Exactly one `@` separating a non-empty local part and domain.
/// - Stored lower-cased, so `clayton@GMAIL.COM` and `clayton@gmail.com`
///   name the same account.
///
/// # Examples
/// ```
/// use backend::domain::Email;
///
/// let email = Email::new("clayton@GMAIL.COM").expect("valid email");
/// assert_eq!(email.as_ref(), "clayton@gmail.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
            _ => return Err(UserValidationError::MalformedEmail),
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
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

/// Role flags carried by an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoles {
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl UserRoles {
    /// Roles granted to administrative accounts.
    pub const SUPERUSER: Self = Self {
        is_staff: true,
        is_superuser: true,
    };
}

/// Registered account.
///
/// `password_hash` is a PHC string, absent for accounts that cannot log in
/// with a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    name: String,
    password_hash: Option<String>,
    is_active: bool,
    roles: UserRoles,
}

impl User {
    /// Build an active account from validated parts.
    pub fn new(id: UserId, email: Email, name: impl Into<String>) -> Self {
        Self {
            id,
            email,
            name: name.into(),
            password_hash: None,
            is_active: true,
            roles: UserRoles::default(),
        }
    }

    #[must_use]
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    #[must_use]
    pub fn with_roles(mut self, roles: UserRoles) -> Self {
        self.roles = roles;
        self
    }

    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn roles(&self) -> UserRoles {
        self.roles
    }

    pub fn is_staff(&self) -> bool {
        self.roles.is_staff
    }

    pub fn is_superuser(&self) -> bool {
        self.roles.is_superuser
    }
}

/// Validate an optional display name for a new account.
pub fn validate_user_name(name: Option<&str>) -> Result<String, UserValidationError> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.chars().count() > USER_NAME_MAX {
        return Err(UserValidationError::NameTooLong { max: USER_NAME_MAX });
    }
    Ok(name.to_owned())
}
