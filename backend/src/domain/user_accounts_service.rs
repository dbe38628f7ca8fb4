//! Account registration, profile lookup and password login.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    LoginService, RegisterUserRequest, UserAccounts, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, Error, LoginCredentials, PASSWORD_MIN, User, UserId, UserRoles, UserValidationError,
    hash_password, validate_user_name, verify_password,
};

/// Account service implementing [`UserAccounts`] and [`LoginService`].
#[derive(Clone)]
pub struct UserAccountsService<R> {
    users: Arc<R>,
}

impl<R> UserAccountsService<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

fn invalid_field(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

fn map_user_validation(err: UserValidationError) -> Error {
    let (field, code) = match err {
        UserValidationError::EmptyEmail => ("email", "required"),
        UserValidationError::MalformedEmail => ("email", "invalid_email"),
        UserValidationError::EmailTooLong { .. } => ("email", "too_long"),
        UserValidationError::NameTooLong { .. } => ("name", "too_long"),
        UserValidationError::EmptyId | UserValidationError::InvalidId => ("id", "invalid_id"),
    };
    invalid_field(field, code, err.to_string())
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

impl<R> UserAccountsService<R>
where
    R: UserRepository,
{
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateEmail { .. } => duplicate_email(),
        }
    }

    async fn create_account(
        &self,
        request: RegisterUserRequest,
        roles: UserRoles,
    ) -> Result<User, Error> {
        let email = Email::new(&request.email).map_err(map_user_validation)?;
        if request.password.chars().count() < PASSWORD_MIN {
            return Err(invalid_field(
                "password",
                "too_short",
                format!("password must be at least {PASSWORD_MIN} characters"),
            ));
        }
        let name = validate_user_name(request.name.as_deref()).map_err(map_user_validation)?;

        if self
            .users
            .find_by_email(&email)
            .await
            .map_err(Self::map_persistence_error)?
            .is_some()
        {
            return Err(duplicate_email());
        }

        let hash = hash_password(&request.password)?;
        let user = User::new(UserId::random(), email, name)
            .with_password_hash(hash)
            .with_roles(roles);
        self.users
            .create(&user)
            .await
            .map_err(Self::map_persistence_error)?;

        info!(
            user_id = %user.id(),
            is_superuser = user.is_superuser(),
            "account created"
        );
        Ok(user)
    }
}

fn duplicate_email() -> Error {
    invalid_field("email", "duplicate_email", "user with this email already exists")
}

#[async_trait]
impl<R> UserAccounts for UserAccountsService<R>
where
    R: UserRepository,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        self.create_account(request, UserRoles::default()).await
    }

    async fn create_superuser(&self, request: RegisterUserRequest) -> Result<User, Error> {
        self.create_account(request, UserRoles::SUPERUSER).await
    }

    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<R> LoginService for UserAccountsService<R>
where
    R: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(invalid_credentials)?;
        if !user.is_active() {
            return Err(invalid_credentials());
        }
        let Some(hash) = user.password_hash() else {
            return Err(invalid_credentials());
        };
        if verify_password(credentials.password(), hash)? {
            Ok(*user.id())
        } else {
            Err(invalid_credentials())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUserRepository;
    use rstest::rstest;

    fn request(email: &str, password: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            email: email.to_owned(),
            password: password.to_owned(),
            name: Some("Test name".to_owned()),
        }
    }

    fn service(repo: MockUserRepository) -> UserAccountsService<MockUserRepository> {
        UserAccountsService::new(Arc::new(repo))
    }

    fn stored_user(email: &str, password: &str) -> User {
        User::new(UserId::random(), Email::new(email).expect("email"), "Cook")
            .with_password_hash(hash_password(password).expect("hash"))
    }

    #[tokio::test]
    async fn register_normalises_email_and_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(1).return_once(|_| Ok(None));
        repo.expect_create()
            .withf(|user| user.email().as_ref() == "clayton@gmail.com")
            .times(1)
            .return_once(|_| Ok(()));

        let user = service(repo)
            .register(request("clayton@GMAIL.COM", "test123"))
            .await
            .expect("registered");

        assert_eq!(user.email().as_ref(), "clayton@gmail.com");
        assert!(!user.is_superuser());
        let hash = user.password_hash().expect("hash stored");
        assert!(verify_password("test123", hash).expect("verify"));
    }

    #[tokio::test]
    async fn create_superuser_sets_role_flags() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().return_once(|_| Ok(None));
        repo.expect_create().return_once(|_| Ok(()));

        let user = service(repo)
            .create_superuser(request("admin@example.com", "test123"))
            .await
            .expect("superuser");

        assert!(user.is_superuser());
        assert!(user.is_staff());
    }

    #[rstest]
    #[case("", "test123", "email")]
    #[case("no-at-sign", "test123", "email")]
    #[case("cook@example.com", "pw", "password")]
    #[tokio::test]
    async fn register_rejects_invalid_payloads(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let err = service(MockUserRepository::new())
            .register(request(email, password))
            .await
            .expect_err("invalid");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["field"], field);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .return_once(|_| Ok(Some(stored_user("cook@example.com", "test123"))));

        let err = service(repo)
            .register(request("cook@example.com", "test123"))
            .await
            .expect_err("duplicate");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["code"], "duplicate_email");
    }

    #[tokio::test]
    async fn connection_failures_are_service_unavailable() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .return_once(|_| Err(UserPersistenceError::connection("refused")));

        let err = service(repo)
            .profile(&UserId::random())
            .await
            .expect_err("unavailable");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[case("test123", true)]
    #[case("wrong-password", false)]
    #[tokio::test]
    async fn authenticate_checks_password(#[case] password: &str, #[case] accepted: bool) {
        let user = stored_user("cook@example.com", "test123");
        let expected_id = *user.id();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().return_once(move |_| Ok(Some(user)));

        let creds = LoginCredentials::try_from_parts("Cook@Example.com", password).expect("creds");
        let result = service(repo).authenticate(&creds).await;

        match result {
            Ok(id) => {
                assert!(accepted);
                assert_eq!(id, expected_id);
            }
            Err(err) => {
                assert!(!accepted);
                assert_eq!(err.code(), ErrorCode::Unauthorized);
            }
        }
    }

    #[tokio::test]
    async fn accounts_without_password_cannot_log_in() {
        let user = User::new(
            UserId::random(),
            Email::new("cook@example.com").expect("email"),
            "",
        );
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().return_once(move |_| Ok(Some(user)));

        let creds =
            LoginCredentials::try_from_parts("cook@example.com", "anything").expect("creds");
        let err = service(repo).authenticate(&creds).await.expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
