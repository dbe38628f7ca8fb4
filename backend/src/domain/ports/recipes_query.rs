//! Driving port for recipe reads.

use async_trait::async_trait;

use crate::domain::{Error, RecipeFilter, RecipeId, RecipeView, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesQuery: Send + Sync {
    /// Owner's recipes in the list shape, id descending.
    async fn list(&self, owner: &UserId, filter: RecipeFilter) -> Result<Vec<RecipeView>, Error>;

    /// One recipe in the detail shape. Recipes outside the owner's scope are
    /// reported as not found.
    async fn retrieve(&self, owner: &UserId, id: RecipeId) -> Result<RecipeView, Error>;
}

/// Query over an empty recipe book.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipesQuery;

#[async_trait]
impl RecipesQuery for FixtureRecipesQuery {
    async fn list(&self, _owner: &UserId, _filter: RecipeFilter) -> Result<Vec<RecipeView>, Error> {
        Ok(Vec::new())
    }

    async fn retrieve(&self, _owner: &UserId, _id: RecipeId) -> Result<RecipeView, Error> {
        Err(Error::not_found("recipe not found"))
    }
}
