//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the application wiring and request helpers they share live here. The app
//! runs the real services over one in-memory store and a temporary media
//! directory.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use backend::Trace;
use backend::domain::{AttributesService, RecipesService, UserAccountsService};
use backend::inbound::http::media::serve_media;
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::inbound::http::{api_services, configure_extractors};
use backend::outbound::media::DirMediaStore;
use backend::outbound::memory::InMemoryStore;
use image::{ImageBuffer, ImageFormat, Rgb};
use serde_json::{Value, json};

pub const BOUNDARY: &str = "integration-upload-boundary";
pub const PASSWORD: &str = "simmering";

/// Ports over a fresh in-memory store and a media directory under `root`.
pub fn memory_ports(media_root: &Path) -> HttpStatePorts {
    let store = Arc::new(InMemoryStore::default());
    let media = Arc::new(DirMediaStore::open(media_root).expect("media dir"));
    let accounts = Arc::new(UserAccountsService::new(store.clone()));
    let attributes = Arc::new(AttributesService::new(store.clone()));
    let recipes = Arc::new(RecipesService::new(store.clone(), store, media.clone()));
    HttpStatePorts {
        login: accounts.clone(),
        accounts,
        attributes: attributes.clone(),
        attributes_query: attributes,
        recipes: recipes.clone(),
        recipes_query: recipes,
        media,
    }
}

/// Initialise the full application the way the server assembles it.
pub async fn init_app(
    media_root: &Path,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(web::Data::new(HttpState::new(memory_ports(media_root))))
            .configure(configure_extractors)
            .wrap(Trace)
            .service(api_services(web::scope("/api/v1")).wrap(session))
            .service(serve_media),
    )
    .await
}

/// Register an account and sign in, returning the session cookie.
pub async fn sign_up(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users/")
            .set_json(json!({ "email": email, "password": PASSWORD, "name": "Cook" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED, "registration of {email}");

    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login of {email}");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Send a request and return the status with the JSON body (`Null` when
/// the body is empty).
pub async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    req: test::TestRequest,
) -> (StatusCode, Value) {
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&body).expect("JSON body"))
}

/// Create a tag or ingredient and return its id.
pub async fn create_attribute(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: &Cookie<'static>,
    collection: &str,
    name: &str,
) -> i64 {
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/{collection}/"))
            .cookie(cookie.clone())
            .set_json(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().expect("attribute id")
}

/// Create a recipe from `payload` and return its id.
pub async fn create_recipe(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: &Cookie<'static>,
    payload: Value,
) -> i64 {
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/recipes/")
            .cookie(cookie.clone())
            .set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().expect("recipe id")
}

/// A small, valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = ImageBuffer::from_pixel(2, 2, Rgb([200_u8, 120, 40]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).expect("encode png");
    buf.into_inner()
}

/// A multipart upload request carrying `bytes` in the `image` field.
pub fn upload_request(recipe_id: i64, filename: &str, bytes: &[u8]) -> test::TestRequest {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    test::TestRequest::post()
        .uri(&format!("/api/v1/recipes/{recipe_id}/upload-image/"))
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}
