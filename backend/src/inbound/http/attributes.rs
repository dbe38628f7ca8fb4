//! Tag and ingredient API handlers.
//!
//! ```text
//! GET /api/v1/tags/?assigned_only=1
//! POST /api/v1/tags/ {"name":"Vegan"}
//! PATCH /api/v1/tags/7/ {"name":"Vegetarian"}
//! DELETE /api/v1/tags/7/
//! ```
//!
//! Ingredients expose the same surface under `/ingredients/`. Both kinds
//! share the request handling below; the per-route functions only pin the
//! [`AttributeKind`].

use actix_web::{HttpResponse, delete, get, post, route, web};
use serde::{Deserialize, Serialize};

use crate::domain::{AttributeId, AttributeKind, AttributeName, AttributeSummary, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{AttributeSummarySchema, ErrorSchema};
use crate::inbound::http::session::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, attribute_name_error, parse_flag, require};

/// Body for creating or renaming a tag or ingredient.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AttributeRequest {
    #[schema(example = "Vegan")]
    pub name: Option<String>,
}

impl AttributeRequest {
    fn into_name(self) -> Result<AttributeName, Error> {
        let raw = require(self.name, FieldName::new("name"))?;
        AttributeName::new(raw).map_err(|err| attribute_name_error(&err))
    }
}

/// Query string accepted by the list endpoints.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttributeListQuery {
    /// `1` limits the listing to entries attached to one of the caller's
    /// recipes.
    pub assigned_only: Option<String>,
}

async fn list_attributes(
    state: &HttpState,
    kind: AttributeKind,
    user: AuthenticatedUser,
    query: AttributeListQuery,
) -> ApiResult<web::Json<Vec<AttributeSummary>>> {
    let assigned_only = parse_flag(query.assigned_only.as_deref());
    let attributes = state
        .attributes_query
        .list(kind, user.id(), assigned_only)
        .await?;
    Ok(web::Json(
        attributes.iter().map(AttributeSummary::from).collect(),
    ))
}

async fn create_attribute(
    state: &HttpState,
    kind: AttributeKind,
    user: AuthenticatedUser,
    payload: AttributeRequest,
) -> ApiResult<HttpResponse> {
    let name = payload.into_name()?;
    let attribute = state.attributes.create(kind, user.id(), name).await?;
    Ok(HttpResponse::Created().json(AttributeSummary::from(&attribute)))
}

async fn update_attribute(
    state: &HttpState,
    kind: AttributeKind,
    user: AuthenticatedUser,
    id: i64,
    payload: AttributeRequest,
) -> ApiResult<web::Json<AttributeSummary>> {
    let name = payload.into_name()?;
    let attribute = state
        .attributes
        .update(kind, user.id(), AttributeId::new(id), name)
        .await?;
    Ok(web::Json(AttributeSummary::from(&attribute)))
}

async fn delete_attribute(
    state: &HttpState,
    kind: AttributeKind,
    user: AuthenticatedUser,
    id: i64,
) -> ApiResult<HttpResponse> {
    state
        .attributes
        .delete(kind, user.id(), AttributeId::new(id))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List the caller's tags, name descending.
#[utoipa::path(
    get,
    path = "/api/v1/tags/",
    params(AttributeListQuery),
    responses(
        (status = 200, description = "Tags", body = [AttributeSummarySchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
#[get("/tags/")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<AttributeListQuery>,
) -> ApiResult<web::Json<Vec<AttributeSummary>>> {
    list_attributes(&state, AttributeKind::Tag, user, query.into_inner()).await
}

/// Create a tag owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/tags/",
    request_body = AttributeRequest,
    responses(
        (status = 201, description = "Tag created", body = AttributeSummarySchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "createTag"
)]
#[post("/tags/")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<AttributeRequest>,
) -> ApiResult<HttpResponse> {
    create_attribute(&state, AttributeKind::Tag, user, payload.into_inner()).await
}

/// Rename one of the caller's tags.
#[utoipa::path(
    method(patch, put),
    path = "/api/v1/tags/{id}/",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = AttributeRequest,
    responses(
        (status = 200, description = "Tag updated", body = AttributeSummarySchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "updateTag"
)]
#[route("/tags/{id}/", method = "PATCH", method = "PUT")]
pub async fn update_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<AttributeRequest>,
) -> ApiResult<web::Json<AttributeSummary>> {
    update_attribute(
        &state,
        AttributeKind::Tag,
        user,
        path.into_inner(),
        payload.into_inner(),
    )
    .await
}

/// Delete one of the caller's tags and detach it from their recipes.
#[utoipa::path(
    delete,
    path = "/api/v1/tags/{id}/",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "deleteTag"
)]
#[delete("/tags/{id}/")]
pub async fn delete_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    delete_attribute(&state, AttributeKind::Tag, user, path.into_inner()).await
}

/// List the caller's ingredients, name descending.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients/",
    params(AttributeListQuery),
    responses(
        (status = 200, description = "Ingredients", body = [AttributeSummarySchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "listIngredients"
)]
#[get("/ingredients/")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<AttributeListQuery>,
) -> ApiResult<web::Json<Vec<AttributeSummary>>> {
    list_attributes(&state, AttributeKind::Ingredient, user, query.into_inner()).await
}

/// Create an ingredient owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/ingredients/",
    request_body = AttributeRequest,
    responses(
        (status = 201, description = "Ingredient created", body = AttributeSummarySchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "createIngredient"
)]
#[post("/ingredients/")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<AttributeRequest>,
) -> ApiResult<HttpResponse> {
    create_attribute(&state, AttributeKind::Ingredient, user, payload.into_inner()).await
}

/// Rename one of the caller's ingredients.
#[utoipa::path(
    method(patch, put),
    path = "/api/v1/ingredients/{id}/",
    params(("id" = i64, Path, description = "Ingredient id")),
    request_body = AttributeRequest,
    responses(
        (status = 200, description = "Ingredient updated", body = AttributeSummarySchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "updateIngredient"
)]
#[route("/ingredients/{id}/", method = "PATCH", method = "PUT")]
pub async fn update_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<AttributeRequest>,
) -> ApiResult<web::Json<AttributeSummary>> {
    update_attribute(
        &state,
        AttributeKind::Ingredient,
        user,
        path.into_inner(),
        payload.into_inner(),
    )
    .await
}

/// Delete one of the caller's ingredients and detach it from their recipes.
#[utoipa::path(
    delete,
    path = "/api/v1/ingredients/{id}/",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 204, description = "Ingredient deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "deleteIngredient"
)]
#[delete("/ingredients/{id}/")]
pub async fn delete_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    delete_attribute(&state, AttributeKind::Ingredient, user, path.into_inner()).await
}
