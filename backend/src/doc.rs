//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer, the schema
//! wrappers for domain types (see `inbound::http::schemas`) and the session
//! cookie security scheme. Swagger UI serves it in debug builds.

use crate::inbound::http::attributes::AttributeRequest;
use crate::inbound::http::recipes::RecipeRequest;
use crate::inbound::http::schemas::{
    AttributeSummarySchema, ErrorCodeSchema, ErrorSchema, RecipeImageSchema, RecipeViewSchema,
};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UserResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the recipe API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe API",
        description = "Ownership-scoped recipes, tags and ingredients with image uploads."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::register,
        crate::inbound::http::users::current_user,
        crate::inbound::http::attributes::list_tags,
        crate::inbound::http::attributes::create_tag,
        crate::inbound::http::attributes::update_tag,
        crate::inbound::http::attributes::delete_tag,
        crate::inbound::http::attributes::list_ingredients,
        crate::inbound::http::attributes::create_ingredient,
        crate::inbound::http::attributes::update_ingredient,
        crate::inbound::http::attributes::delete_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::patch_recipe,
        crate::inbound::http::recipes::put_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipe_images::upload_image,
        crate::inbound::http::recipe_images::delete_image,
        crate::inbound::http::media::serve_media,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        AttributeSummarySchema,
        RecipeViewSchema,
        RecipeImageSchema,
        UserResponse,
        LoginRequest,
        RegisterRequest,
        AttributeRequest,
        RecipeRequest,
    )),
    tags(
        (name = "users", description = "Registration, login and the current profile"),
        (name = "tags", description = "Tags owned by the caller"),
        (name = "ingredients", description = "Ingredients owned by the caller"),
        (name = "recipes", description = "Recipes owned by the caller and their images"),
        (name = "media", description = "Uploaded files"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
