//! Recipe image upload handlers.
//!
//! ```text
//! POST /api/v1/recipes/42/upload-image/  (multipart/form-data, field "image")
//! DELETE /api/v1/recipes/42/upload-image/
//! ```

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, post, web};
use futures_util::TryStreamExt;
use serde_json::json;

use crate::domain::ports::RecipeImage;
use crate::domain::{Error, ImageUpload, ImageValidationError, RecipeId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RecipeImageSchema};
use crate::inbound::http::session::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";
/// Largest accepted upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

fn image_error(code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": IMAGE_FIELD,
        "code": code,
    }))
}

fn map_image_validation(err: &ImageValidationError) -> Error {
    let code = match err {
        ImageValidationError::Empty => "required",
        ImageValidationError::NotAnImage => "invalid_image",
        ImageValidationError::TooLarge => "too_large",
    };
    image_error(code, err.to_string())
}

/// Read the `image` field, skipping any others.
async fn read_image_field(payload: &mut Multipart) -> Result<(Option<String>, Vec<u8>), Error> {
    let malformed = |err: actix_multipart::MultipartError| {
        image_error("malformed_multipart", format!("malformed multipart body: {err}"))
    };
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_owned);
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(image_error(
                    "too_large",
                    format!("image must be at most {MAX_IMAGE_BYTES} bytes"),
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok((filename, bytes));
    }
    Err(map_image_validation(&ImageValidationError::Empty))
}

/// Attach an image to one of the caller's recipes, replacing any previous
/// one.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/upload-image/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body(content_type = "multipart/form-data", description = "Form with an `image` file field"),
    responses(
        (status = 200, description = "Image stored", body = RecipeImageSchema),
        (status = 400, description = "Not an image or too large", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "uploadRecipeImage"
)]
#[post("/recipes/{id}/upload-image/")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    mut payload: Multipart,
) -> ApiResult<web::Json<RecipeImage>> {
    let (filename, bytes) = read_image_field(&mut payload).await?;
    let upload = web::block(move || ImageUpload::new(filename.as_deref(), bytes))
        .await
        .map_err(|err| Error::internal(format!("image validation did not complete: {err}")))?
        .map_err(|err| map_image_validation(&err))?;
    let stored = state
        .recipes
        .upload_image(user.id(), RecipeId::new(path.into_inner()), upload)
        .await?;
    Ok(web::Json(stored))
}

/// Detach and remove the image of one of the caller's recipes.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/upload-image/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Image removed (or none was attached)"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipeImage"
)]
#[delete("/recipes/{id}/upload-image/")]
pub async fn delete_image(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .recipes
        .delete_image(user.id(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
