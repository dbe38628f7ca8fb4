//! Port for recipe persistence.
//!
//! Adapters store the recipe row and its tag/ingredient association sets as
//! one unit: a save either replaces everything or changes nothing.

use async_trait::async_trait;

use crate::domain::{Recipe, RecipeDraft, RecipeFilter, RecipeId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "recipe repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Recipes owned by `owner` that match `filter`, newest id first.
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    /// Fetch one recipe inside the owner's scope.
    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Insert a recipe with its associations.
    async fn create(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// Overwrite a stored recipe, including its image path and association
    /// sets. Returns `Ok(false)` when the recipe no longer exists.
    async fn save(&self, recipe: &Recipe) -> Result<bool, RecipeRepositoryError>;

    /// Delete a recipe and return what was removed.
    async fn delete(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;
}
