//! Recipe attributes: tags and ingredients.
//!
//! Both kinds share one shape (`{id, name, owner}`) and the same ownership
//! rules, so they are modelled as one [`Attribute`] type tagged with an
//! [`AttributeKind`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Maximum length of an attribute name.
pub const ATTRIBUTE_NAME_MAX: usize = 255;

/// Which attribute table an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Tag,
    Ingredient,
}

impl AttributeKind {
    /// Singular noun used in messages and error codes.
    pub fn noun(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Ingredient => "ingredient",
        }
    }

    /// Payload field naming a list of this kind on a recipe.
    pub fn recipe_field(self) -> &'static str {
        match self {
            Self::Tag => "tags",
            Self::Ingredient => "ingredients",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Validation errors for attribute values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Database identifier of a tag or ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(i64);

impl AttributeId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Attribute name.
///
/// ## Invariants
/// - Trimmed, non-empty and at most [`ATTRIBUTE_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributeName(String);

impl AttributeName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AttributeValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AttributeValidationError::EmptyName);
        }
        if trimmed.chars().count() > ATTRIBUTE_NAME_MAX {
            return Err(AttributeValidationError::NameTooLong {
                max: ATTRIBUTE_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for AttributeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AttributeName> for String {
    fn from(value: AttributeName) -> Self {
        value.0
    }
}

impl TryFrom<String> for AttributeName {
    type Error = AttributeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A tag or ingredient owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub id: AttributeId,
    pub kind: AttributeKind,
    pub name: AttributeName,
    pub owner: UserId,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

/// Order attributes the way listings present them: name descending, id
/// descending as a tie-breaker.
pub fn sort_for_listing(attributes: &mut [Attribute]) {
    attributes.sort_by(|a, b| b.name.cmp(&a.name).then(b.id.cmp(&a.id)));
}
