//! Recipe aggregate and its update semantics.
//!
//! A recipe references attributes by id only; ownership of those ids is
//! checked by the recipe service before anything reaches a repository.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{AttributeId, AttributeKind, UserId};

/// Maximum length of a recipe title.
pub const RECIPE_TITLE_MAX: usize = 255;
/// Maximum length of a recipe link.
pub const RECIPE_LINK_MAX: usize = 255;
/// Largest preparation time accepted, bounded by the storage column.
pub const TIME_MINUTES_MAX: u32 = i32::MAX.unsigned_abs();
/// Largest price in cents (five digits, two of them decimals).
pub const PRICE_MAX_CENTS: u32 = 99_999;

/// Validation errors for recipe fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("time_minutes must be between 0 and {max}")]
    TimeOutOfRange { max: u32 },
    #[error("price must be a decimal number")]
    InvalidPrice,
    #[error("price must have at most 2 decimal places")]
    PriceTooPrecise,
    #[error("price must be between 0.00 and 999.99")]
    PriceOutOfRange,
    #[error("link must be at most {max} characters")]
    LinkTooLong { max: usize },
}

impl RecipeValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::TimeOutOfRange { .. } => "time_minutes",
            Self::InvalidPrice | Self::PriceTooPrecise | Self::PriceOutOfRange => "price",
            Self::LinkTooLong { .. } => "link",
        }
    }
}

/// Database identifier of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(i64);

impl RecipeId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Trimmed, non-empty recipe title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct RecipeTitle(String);

impl RecipeTitle {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RecipeValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > RECIPE_TITLE_MAX {
            return Err(RecipeValidationError::TitleTooLong {
                max: RECIPE_TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecipeTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<RecipeTitle> for String {
    fn from(value: RecipeTitle) -> Self {
        value.0
    }
}

/// Price with two decimal places, stored as whole cents.
///
/// Accepts `"5"`, `"5.5"`, `"5.50"` or the JSON numbers `5` / `5.5`;
/// always renders with two decimals.
///
/// # Examples
/// ```
/// use backend::domain::Price;
///
/// let price: Price = "5".parse().expect("valid price");
/// assert_eq!(price.to_string(), "5.00");
/// assert_eq!(price.cents(), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u32);

impl Price {
    pub fn from_cents(cents: u32) -> Result<Self, RecipeValidationError> {
        if cents > PRICE_MAX_CENTS {
            return Err(RecipeValidationError::PriceOutOfRange);
        }
        Ok(Self(cents))
    }

    pub fn cents(self) -> u32 {
        self.0
    }
}

impl FromStr for Price {
    type Err = RecipeValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.starts_with('-') {
            return Err(RecipeValidationError::PriceOutOfRange);
        }
        let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
        let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
            return Err(RecipeValidationError::InvalidPrice);
        }
        if fraction.len() > 2 {
            return Err(RecipeValidationError::PriceTooPrecise);
        }
        let whole = whole.trim_start_matches('0');
        if whole.len() > 3 {
            return Err(RecipeValidationError::PriceOutOfRange);
        }
        let whole: u32 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| RecipeValidationError::InvalidPrice)?
        };
        let fraction: u32 = format!("{fraction:0<2}")
            .parse()
            .map_err(|_| RecipeValidationError::InvalidPrice)?;
        Self::from_cents(whole * 100 + fraction)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPrice {
            Text(String),
            Number(serde_json::Number),
        }

        let raw = match RawPrice::deserialize(deserializer)? {
            RawPrice::Text(text) => text,
            RawPrice::Number(number) => number.to_string(),
        };
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Validate a preparation time.
pub fn parse_time_minutes(raw: i64) -> Result<u32, RecipeValidationError> {
    u32::try_from(raw)
        .ok()
        .filter(|minutes| *minutes <= TIME_MINUTES_MAX)
        .ok_or(RecipeValidationError::TimeOutOfRange {
            max: TIME_MINUTES_MAX,
        })
}

/// Validate an optional link, mapping absence to the empty default.
pub fn parse_link(raw: Option<String>) -> Result<String, RecipeValidationError> {
    let link = raw.map(|value| value.trim().to_owned()).unwrap_or_default();
    if link.chars().count() > RECIPE_LINK_MAX {
        return Err(RecipeValidationError::LinkTooLong {
            max: RECIPE_LINK_MAX,
        });
    }
    Ok(link)
}

/// Scalar recipe fields shared by create and full update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetails {
    pub title: RecipeTitle,
    pub time_minutes: u32,
    pub price: Price,
    pub description: String,
    pub link: String,
}

/// Complete recipe payload: required fields plus optional ones already
/// resolved to their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub details: RecipeDetails,
    pub tags: BTreeSet<AttributeId>,
    pub ingredients: BTreeSet<AttributeId>,
}

impl RecipeDraft {
    /// Attribute ids of `kind` referenced by this draft.
    pub fn attribute_ids(&self, kind: AttributeKind) -> &BTreeSet<AttributeId> {
        match kind {
            AttributeKind::Tag => &self.tags,
            AttributeKind::Ingredient => &self.ingredients,
        }
    }
}

/// Partial update: `None` leaves the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeChanges {
    pub title: Option<RecipeTitle>,
    pub time_minutes: Option<u32>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<BTreeSet<AttributeId>>,
    pub ingredients: Option<BTreeSet<AttributeId>>,
}

/// Update semantics requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeUpdate {
    /// Replace every field; omitted optional fields were already reset to
    /// defaults while building the draft.
    Full(RecipeDraft),
    /// Change only the supplied fields.
    Partial(RecipeChanges),
}

impl RecipeUpdate {
    /// Attribute ids of `kind` this update would attach, if it touches them.
    pub fn attribute_ids(&self, kind: AttributeKind) -> Option<&BTreeSet<AttributeId>> {
        match (self, kind) {
            (Self::Full(draft), kind) => Some(draft.attribute_ids(kind)),
            (Self::Partial(changes), AttributeKind::Tag) => changes.tags.as_ref(),
            (Self::Partial(changes), AttributeKind::Ingredient) => changes.ingredients.as_ref(),
        }
    }
}

/// Stored recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub owner: UserId,
    pub details: RecipeDetails,
    pub image: Option<String>,
    pub tags: BTreeSet<AttributeId>,
    pub ingredients: BTreeSet<AttributeId>,
}

impl Recipe {
    /// Apply an update in place. Association sets are replaced, never merged.
    pub fn apply(&mut self, update: RecipeUpdate) {
        match update {
            RecipeUpdate::Full(draft) => {
                self.details = draft.details;
                self.tags = draft.tags;
                self.ingredients = draft.ingredients;
            }
            RecipeUpdate::Partial(changes) => {
                let RecipeChanges {
                    title,
                    time_minutes,
                    price,
                    description,
                    link,
                    tags,
                    ingredients,
                } = changes;
                if let Some(title) = title {
                    self.details.title = title;
                }
                if let Some(minutes) = time_minutes {
                    self.details.time_minutes = minutes;
                }
                if let Some(price) = price {
                    self.details.price = price;
                }
                if let Some(description) = description {
                    self.details.description = description;
                }
                if let Some(link) = link {
                    self.details.link = link;
                }
                if let Some(tags) = tags {
                    self.tags = tags;
                }
                if let Some(ingredients) = ingredients {
                    self.ingredients = ingredients;
                }
            }
        }
    }
}

/// Optional listing filters; a recipe matches when it references any of the
/// given ids. Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tags: BTreeSet<AttributeId>,
    pub ingredients: BTreeSet<AttributeId>,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let hits = |wanted: &BTreeSet<AttributeId>, present: &BTreeSet<AttributeId>| {
            wanted.is_empty() || !wanted.is_disjoint(present)
        };
        hits(&self.tags, &recipe.tags) && hits(&self.ingredients, &recipe.ingredients)
    }
}
