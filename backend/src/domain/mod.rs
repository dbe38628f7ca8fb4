//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and
//! persistence adapters, plus the services implementing the driving ports.
//! Types document their invariants and serialisation contracts in their own
//! Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - User, Email, UserId: accounts.
//! - Attribute, AttributeKind: tags and ingredients.
//! - Recipe, RecipeDraft, RecipeUpdate, Price: recipes and their updates.
//! - RecipeShape, RecipeView, shape_recipe: list and detail output.
//! - ImageUpload, generate_path: media attachment.

pub mod attribute;
pub mod attributes_service;
pub mod auth;
pub mod error;
pub mod media;
pub mod ports;
pub mod recipe;
pub mod recipe_shape;
pub mod recipes_service;
pub mod trace_id;
pub mod user;
pub mod user_accounts_service;

pub use self::attribute::{
    ATTRIBUTE_NAME_MAX, Attribute, AttributeId, AttributeKind, AttributeName,
    AttributeValidationError, sort_for_listing,
};
pub use self::attributes_service::AttributesService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, hash_password, verify_password,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::media::{
    ImageUpload, ImageValidationError, MAX_IMAGE_DIMENSION, MediaKind, RECIPE_UPLOAD_PREFIX,
    SERVED_IMAGE_FORMATS, generate_path, generate_random_path, served_content_type,
};
pub use self::recipe::{
    PRICE_MAX_CENTS, Price, RECIPE_LINK_MAX, RECIPE_TITLE_MAX, Recipe, RecipeChanges,
    RecipeDetails, RecipeDraft, RecipeFilter, RecipeId, RecipeTitle, RecipeUpdate,
    RecipeValidationError, TIME_MINUTES_MAX, parse_link, parse_time_minutes,
};
pub use self::recipe_shape::{
    AttributeRefs, AttributeSummary, RecipeShape, RecipeView, shape_recipe,
};
pub use self::recipes_service::RecipesService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EMAIL_MAX, Email, USER_NAME_MAX, User, UserId, UserRoles, UserValidationError,
    validate_user_name,
};
pub use self::user_accounts_service::UserAccountsService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("recipe not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
