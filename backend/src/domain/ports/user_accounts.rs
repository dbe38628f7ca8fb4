//! Driving port for account management.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Raw registration payload; the service validates and normalises it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Create a regular account.
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Create an account with the staff and superuser flags set.
    async fn create_superuser(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Fetch the caller's own profile.
    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;
}
