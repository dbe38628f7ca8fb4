//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed, fails validation or references records
    /// the caller does not own.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist for this caller.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing service is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "unknown tag ids for this user")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, usually `{"field": .., "code": ..}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::AttributeSummary`].
///
/// Tag or ingredient as returned by the API.
#[derive(ToSchema)]
#[schema(as = crate::domain::AttributeSummary)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AttributeSummarySchema {
    #[schema(example = 7)]
    id: i64,
    #[schema(example = "Vegan")]
    name: String,
}

/// OpenAPI schema for [`crate::domain::RecipeView`].
///
/// `tags` and `ingredients` hold plain ids in listings and create
/// responses, and `{id, name}` objects in detail responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::RecipeView)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RecipeViewSchema {
    #[schema(example = 42)]
    id: i64,
    #[schema(example = "Sample recipe")]
    title: String,
    #[schema(example = 22)]
    time_minutes: u32,
    /// Decimal with two places, serialised as a string.
    #[schema(example = "5.25")]
    price: String,
    description: String,
    link: String,
    /// Media path of the attached image, if any.
    #[schema(example = "uploads/recipe/images/3fa85f64-5717-4562-b3fc-2c963f66afa6.png")]
    image: Option<String>,
    #[schema(value_type = Vec<serde_json::Value>)]
    tags: Vec<serde_json::Value>,
    #[schema(value_type = Vec<serde_json::Value>)]
    ingredients: Vec<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ports::RecipeImage`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::RecipeImage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RecipeImageSchema {
    #[schema(example = 42)]
    id: i64,
    image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_schema_has_expected_name() {
        let schema_json = schema_to_json::<ErrorSchema>();
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("trace_id"));
        assert!(schema_json.contains("details"));
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn recipe_schema_lists_every_field() {
        let schema_json = schema_to_json::<RecipeViewSchema>();
        assert_eq!(RecipeViewSchema::name(), "crate.domain.RecipeView");
        for field in ["title", "time_minutes", "price", "image", "tags", "ingredients"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }
}
