//! Output shapes for recipes.
//!
//! Listings reference tags and ingredients by id; the detail view expands
//! them into `{id, name}` objects. Both are produced by [`shape_recipe`].

use serde::Serialize;

use super::{Attribute, AttributeId, AttributeKind, Price, Recipe, RecipeId};

/// Which representation a caller receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeShape {
    /// Attribute references are bare ids.
    List,
    /// Attribute references are expanded to `{id, name}`.
    Detail,
}

/// Expanded attribute reference used by the detail shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSummary {
    pub id: AttributeId,
    pub name: String,
}

impl From<&Attribute> for AttributeSummary {
    fn from(attribute: &Attribute) -> Self {
        Self {
            id: attribute.id,
            name: attribute.name.to_string(),
        }
    }
}

/// Attribute references in either shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeRefs {
    Ids(Vec<AttributeId>),
    Expanded(Vec<AttributeSummary>),
}

impl AttributeRefs {
    /// Referenced ids regardless of shape.
    pub fn ids(&self) -> Vec<AttributeId> {
        match self {
            Self::Ids(ids) => ids.clone(),
            Self::Expanded(items) => items.iter().map(|item| item.id).collect(),
        }
    }
}

/// Serialisable recipe representation returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeView {
    pub id: RecipeId,
    pub title: String,
    pub time_minutes: u32,
    pub price: Price,
    pub description: String,
    pub link: String,
    pub image: Option<String>,
    pub tags: AttributeRefs,
    pub ingredients: AttributeRefs,
}

/// Shape `recipe` for output.
///
/// `attributes` supplies the names needed by [`RecipeShape::Detail`]; it is
/// ignored for [`RecipeShape::List`]. Expanded entries follow ascending id
/// order, and ids without a matching attribute are skipped.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use backend::domain::{
///     AttributeId, Price, Recipe, RecipeDetails, RecipeId, RecipeShape, RecipeTitle, UserId,
///     shape_recipe,
/// };
///
/// let recipe = Recipe {
///     id: RecipeId::new(7),
///     owner: UserId::random(),
///     details: RecipeDetails {
///         title: RecipeTitle::new("Soup").unwrap(),
///         time_minutes: 5,
///         price: Price::from_cents(500).unwrap(),
///         description: String::new(),
///         link: String::new(),
///     },
///     image: None,
///     tags: BTreeSet::from([AttributeId::new(1)]),
///     ingredients: BTreeSet::new(),
/// };
/// let json = serde_json::to_value(shape_recipe(&recipe, RecipeShape::List, &[])).unwrap();
/// assert_eq!(json["tags"], serde_json::json!([1]));
/// assert_eq!(json["price"], "5.00");
/// ```
pub fn shape_recipe(recipe: &Recipe, shape: RecipeShape, attributes: &[Attribute]) -> RecipeView {
    let refs = |kind: AttributeKind| {
        let ids = match kind {
            AttributeKind::Tag => &recipe.tags,
            AttributeKind::Ingredient => &recipe.ingredients,
        };
        match shape {
            RecipeShape::List => AttributeRefs::Ids(ids.iter().copied().collect()),
            RecipeShape::Detail => AttributeRefs::Expanded(
                ids.iter()
                    .filter_map(|id| {
                        attributes
                            .iter()
                            .find(|attribute| attribute.kind == kind && attribute.id == *id)
                    })
                    .map(AttributeSummary::from)
                    .collect(),
            ),
        }
    };

    RecipeView {
        id: recipe.id,
        title: recipe.details.title.as_ref().to_owned(),
        time_minutes: recipe.details.time_minutes,
        price: recipe.details.price,
        description: recipe.details.description.clone(),
        link: recipe.details.link.clone(),
        image: recipe.image.clone(),
        tags: refs(AttributeKind::Tag),
        ingredients: refs(AttributeKind::Ingredient),
    }
}
