//! Serves uploaded media files from the configured [`MediaStore`].
//!
//! [`MediaStore`]: crate::domain::ports::MediaStore

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};
use tracing::debug;

use crate::domain::ports::MediaStoreError;
use crate::domain::{Error, served_content_type};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

fn map_media_error(error: MediaStoreError) -> Error {
    match error {
        MediaStoreError::InvalidPath { .. } => Error::not_found("media not found"),
        MediaStoreError::Io { message } => Error::internal(format!("media store error: {message}")),
    }
}

/// Stream back a stored upload, e.g. `GET /media/uploads/recipe/images/<uuid>.png`.
///
/// Only known raster image types are labelled as such; anything else goes
/// out as `application/octet-stream`, and browsers are told not to sniff.
#[utoipa::path(
    get,
    path = "/media/{path}",
    params(("path" = String, Path, description = "Path returned in a recipe's `image` field")),
    responses(
        (status = 200, description = "File contents"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["media"],
    operation_id = "getMedia",
    security([])
)]
#[get("/media/{path:.*}")]
pub async fn serve_media(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let path = path.into_inner();
    let bytes = state
        .media
        .load(&path)
        .await
        .map_err(map_media_error)?
        .ok_or_else(|| {
            debug!(path = %path, "media file missing");
            Error::not_found("media not found")
        })?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, served_content_type(&path)))
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .insert_header((header::CACHE_CONTROL, "public, max-age=3600"))
        .body(bytes))
}
