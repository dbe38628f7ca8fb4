//! HTTP inbound adapter exposing REST endpoints.

pub mod attributes;
pub mod error;
pub mod health;
pub mod media;
pub mod recipe_images;
pub mod recipes;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Route extractor failures (bad JSON, query strings, path segments)
/// through the domain error payload.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler));
}

/// Register every `/api/v1` endpoint on `scope`.
pub fn api_services(scope: Scope) -> Scope {
    scope
        .service(users::login)
        .service(users::register)
        .service(users::current_user)
        .service(attributes::list_tags)
        .service(attributes::create_tag)
        .service(attributes::update_tag)
        .service(attributes::delete_tag)
        .service(attributes::list_ingredients)
        .service(attributes::create_ingredient)
        .service(attributes::update_ingredient)
        .service(attributes::delete_ingredient)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::get_recipe)
        .service(recipes::patch_recipe)
        .service(recipes::put_recipe)
        .service(recipes::delete_recipe)
        .service(recipe_images::upload_image)
        .service(recipe_images::delete_image)
}
