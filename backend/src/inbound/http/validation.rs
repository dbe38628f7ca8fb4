//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` error whose `details` carry
//! the offending `field` and a machine-readable `code`.

use std::collections::BTreeSet;

use serde_json::{Value, json};

use crate::domain::{
    AttributeId, AttributeValidationError, Error, Price, RecipeValidationError,
    UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    Blank,
    TooLong,
    OutOfRange,
    InvalidDecimal,
    MaxDecimalPlaces,
    InvalidEmail,
    InvalidId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::Blank => "blank",
            ErrorCode::TooLong => "too_long",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidDecimal => "invalid_decimal",
            ErrorCode::MaxDecimalPlaces => "max_decimal_places",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidId => "invalid_id",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

/// Unwrap a required payload field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn recipe_field_error(err: &RecipeValidationError) -> Error {
    let code = match err {
        RecipeValidationError::EmptyTitle => ErrorCode::Blank,
        RecipeValidationError::TitleTooLong { .. } | RecipeValidationError::LinkTooLong { .. } => {
            ErrorCode::TooLong
        }
        RecipeValidationError::TimeOutOfRange { .. } | RecipeValidationError::PriceOutOfRange => {
            ErrorCode::OutOfRange
        }
        RecipeValidationError::InvalidPrice => ErrorCode::InvalidDecimal,
        RecipeValidationError::PriceTooPrecise => ErrorCode::MaxDecimalPlaces,
    };
    ValidationError::new(err.field(), err.to_string()).with_code(code)
}

pub(crate) fn attribute_name_error(err: &AttributeValidationError) -> Error {
    let code = match err {
        AttributeValidationError::EmptyName => ErrorCode::Blank,
        AttributeValidationError::NameTooLong { .. } => ErrorCode::TooLong,
    };
    ValidationError::new("name", err.to_string()).with_code(code)
}

pub(crate) fn user_field_error(err: &UserValidationError) -> Error {
    let (field, code) = match err {
        UserValidationError::EmptyEmail => ("email", ErrorCode::Blank),
        UserValidationError::MalformedEmail => ("email", ErrorCode::InvalidEmail),
        UserValidationError::EmailTooLong { .. } => ("email", ErrorCode::TooLong),
        UserValidationError::NameTooLong { .. } => ("name", ErrorCode::TooLong),
        UserValidationError::EmptyId | UserValidationError::InvalidId => {
            ("id", ErrorCode::InvalidId)
        }
    };
    ValidationError::new(field, err.to_string()).with_code(code)
}

/// Parse a price given either as a JSON string or a JSON number.
pub(crate) fn parse_price(value: &Value) -> Result<Price, Error> {
    let parsed = match value {
        Value::String(text) => text.parse(),
        Value::Number(number) => number.to_string().parse(),
        _ => Err(RecipeValidationError::InvalidPrice),
    };
    parsed.map_err(|err| recipe_field_error(&err))
}

/// Parse a comma separated id list such as `tags=1,2`.
///
/// Blank segments are ignored so `tags=` behaves like an absent filter.
pub(crate) fn parse_id_list(raw: &str, field: FieldName) -> Result<BTreeSet<AttributeId>, Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment.parse::<i64>().map(AttributeId::new).map_err(|_| {
                let name = field.as_str();
                ValidationError::new(name, format!("{name} must be a comma separated id list"))
                    .with_value(ErrorCode::InvalidId, segment)
            })
        })
        .collect()
}

/// Interpret Django-style boolean query flags (`1`/`0`, `true`/`false`).
pub(crate) fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|value| value.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes")
    )
}
