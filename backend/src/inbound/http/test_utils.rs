//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::HttpResponse;

use crate::domain::ports::{
    FIXTURE_USER_ID, FixtureAttributesCommand, FixtureAttributesQuery, FixtureLoginService,
    FixtureMediaStore, FixtureRecipesQuery, MockRecipesCommand, MockUserAccounts,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpStatePorts;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Ports backed by fixtures; mocks without expectations fail loudly when
/// a test reaches a port it did not set up.
pub fn fixture_ports() -> HttpStatePorts {
    HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        accounts: Arc::new(MockUserAccounts::new()),
        attributes: Arc::new(FixtureAttributesCommand),
        attributes_query: Arc::new(FixtureAttributesQuery),
        recipes: Arc::new(MockRecipesCommand::new()),
        recipes_query: Arc::new(FixtureRecipesQuery),
        media: Arc::new(FixtureMediaStore),
    }
}

/// The user id [`sign_in`] stores in the session.
pub fn fixture_user() -> UserId {
    UserId::new(FIXTURE_USER_ID).expect("fixture user id")
}

/// Route that stores [`fixture_user`] in the session, letting tests obtain
/// a cookie without going through the login port.
pub async fn sign_in(session: SessionContext) -> Result<HttpResponse, Error> {
    session.persist_user(&fixture_user())?;
    Ok(HttpResponse::Ok().finish())
}

/// Call the `/sign-in` route registered with [`sign_in`] and return the
/// issued session cookie.
pub async fn signed_in_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> actix_web::cookie::Cookie<'static> {
    let res = actix_web::test::call_service(
        app,
        actix_web::test::TestRequest::get().uri("/sign-in").to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie")
}
