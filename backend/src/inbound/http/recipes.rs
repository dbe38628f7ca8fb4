//! Recipe API handlers.
//!
//! ```text
//! GET /api/v1/recipes/?tags=1,2&ingredients=3
//! POST /api/v1/recipes/ {"title":"Soup","time_minutes":20,"price":"5.50","tags":[1]}
//! GET /api/v1/recipes/42/
//! PATCH /api/v1/recipes/42/ {"title":"Better soup"}
//! PUT /api/v1/recipes/42/ {"title":"Soup","time_minutes":25,"price":"6.00"}
//! DELETE /api/v1/recipes/42/
//! ```
//!
//! Listing and create responses reference tags and ingredients by id;
//! retrieve and update responses expand them to `{id, name}`.

use std::collections::BTreeSet;

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    AttributeId, Error, RecipeChanges, RecipeDetails, RecipeDraft, RecipeFilter, RecipeId,
    RecipeTitle, RecipeUpdate, RecipeView, parse_link, parse_time_minutes,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RecipeViewSchema};
use crate::inbound::http::session::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id_list, parse_price, recipe_field_error, require,
};

/// Recipe payload for create, full and partial update.
///
/// Every field is optional at the wire level; create and `PUT` enforce the
/// required ones, `PATCH` applies whatever is present.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecipeRequest {
    #[schema(example = "Sample recipe")]
    pub title: Option<String>,
    #[schema(example = 22)]
    pub time_minutes: Option<i64>,
    /// Decimal given as a JSON string or number.
    #[schema(value_type = Option<String>, example = "5.25")]
    pub price: Option<Value>,
    pub description: Option<String>,
    pub link: Option<String>,
    /// Ids of the caller's tags.
    pub tags: Option<Vec<i64>>,
    /// Ids of the caller's ingredients.
    pub ingredients: Option<Vec<i64>>,
}

fn id_set(ids: Vec<i64>) -> BTreeSet<AttributeId> {
    ids.into_iter().map(AttributeId::new).collect()
}

fn title(raw: String) -> Result<RecipeTitle, Error> {
    RecipeTitle::new(raw).map_err(|err| recipe_field_error(&err))
}

fn time_minutes(raw: i64) -> Result<u32, Error> {
    parse_time_minutes(raw).map_err(|err| recipe_field_error(&err))
}

fn link(raw: Option<String>) -> Result<String, Error> {
    parse_link(raw).map_err(|err| recipe_field_error(&err))
}

impl RecipeRequest {
    /// Build a complete draft, defaulting omitted optional fields.
    pub fn into_draft(self) -> Result<RecipeDraft, Error> {
        let Self {
            title: raw_title,
            time_minutes: raw_minutes,
            price,
            description,
            link: raw_link,
            tags,
            ingredients,
        } = self;
        let details = RecipeDetails {
            title: title(require(raw_title, FieldName::new("title"))?)?,
            time_minutes: time_minutes(require(raw_minutes, FieldName::new("time_minutes"))?)?,
            price: parse_price(&require(price, FieldName::new("price"))?)?,
            description: description.unwrap_or_default(),
            link: link(raw_link)?,
        };
        Ok(RecipeDraft {
            details,
            tags: id_set(tags.unwrap_or_default()),
            ingredients: id_set(ingredients.unwrap_or_default()),
        })
    }

    /// Build a partial change set from the fields present.
    pub fn into_changes(self) -> Result<RecipeChanges, Error> {
        Ok(RecipeChanges {
            title: self.title.map(title).transpose()?,
            time_minutes: self.time_minutes.map(time_minutes).transpose()?,
            price: self.price.as_ref().map(parse_price).transpose()?,
            description: self.description,
            link: self.link.map(|raw| link(Some(raw))).transpose()?,
            tags: self.tags.map(id_set),
            ingredients: self.ingredients.map(id_set),
        })
    }
}

/// Optional listing filters, comma separated ids.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    /// Only recipes referencing any of these tag ids.
    #[param(example = "1,2")]
    pub tags: Option<String>,
    /// Only recipes referencing any of these ingredient ids.
    #[param(example = "3")]
    pub ingredients: Option<String>,
}

impl TryFrom<RecipeListQuery> for RecipeFilter {
    type Error = Error;

    fn try_from(query: RecipeListQuery) -> Result<Self, Self::Error> {
        let parse = |raw: Option<String>, field| {
            raw.map(|raw| parse_id_list(&raw, FieldName::new(field)))
                .transpose()
                .map(Option::unwrap_or_default)
        };
        Ok(Self {
            tags: parse(query.tags, "tags")?,
            ingredients: parse(query.ingredients, "ingredients")?,
        })
    }
}

/// List the caller's recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Recipes in list shape", body = [RecipeViewSchema]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes/")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<web::Json<Vec<RecipeView>>> {
    let filter = RecipeFilter::try_from(query.into_inner())?;
    let recipes = state.recipes_query.list(user.id(), filter).await?;
    Ok(web::Json(recipes))
}

/// Create a recipe owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created (list shape)", body = RecipeViewSchema),
        (status = 400, description = "Invalid request or foreign tag/ingredient ids", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes/")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let recipe = state.recipes.create(user.id(), draft).await?;
    Ok(HttpResponse::Created().json(recipe))
}

/// Retrieve one of the caller's recipes in detail shape.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe in detail shape", body = RecipeViewSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}/")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeView>> {
    let recipe = state
        .recipes_query
        .retrieve(user.id(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(recipe))
}

async fn update_recipe(
    state: &HttpState,
    user: AuthenticatedUser,
    id: i64,
    update: RecipeUpdate,
) -> ApiResult<web::Json<RecipeView>> {
    let recipe = state
        .recipes
        .update(user.id(), RecipeId::new(id), update)
        .await?;
    Ok(web::Json(recipe))
}

/// Change the supplied fields of a recipe; everything else is kept.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated recipe in list shape", body = RecipeViewSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "patchRecipe"
)]
#[patch("/recipes/{id}/")]
pub async fn patch_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeView>> {
    let changes = payload.into_inner().into_changes()?;
    update_recipe(&state, user, path.into_inner(), RecipeUpdate::Partial(changes)).await
}

/// Replace a recipe. Omitted optional fields reset to their defaults.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Replaced recipe in list shape", body = RecipeViewSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "putRecipe"
)]
#[put("/recipes/{id}/")]
pub async fn put_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeView>> {
    let draft = payload.into_inner().into_draft()?;
    update_recipe(&state, user, path.into_inner(), RecipeUpdate::Full(draft)).await
}

/// Delete a recipe together with its stored image.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}/")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .recipes
        .delete(user.id(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
