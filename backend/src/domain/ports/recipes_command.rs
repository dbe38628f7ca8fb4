//! Driving port for recipe writes and image attachment.
//!
//! Responses are already shaped. Creates and updates come back in the list
//! shape; only retrieval expands attributes.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, ImageUpload, RecipeDraft, RecipeId, RecipeUpdate, RecipeView, UserId};

/// Result of an image upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeImage {
    pub id: RecipeId,
    pub image: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesCommand: Send + Sync {
    /// Create a recipe owned by `owner`.
    ///
    /// Every referenced tag and ingredient must belong to `owner`.
    async fn create(&self, owner: &UserId, draft: RecipeDraft) -> Result<RecipeView, Error>;

    /// Apply a partial or full update.
    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        update: RecipeUpdate,
    ) -> Result<RecipeView, Error>;

    /// Delete a recipe and its stored image.
    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<(), Error>;

    /// Store a validated image and attach it, replacing any previous one.
    async fn upload_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        upload: ImageUpload,
    ) -> Result<RecipeImage, Error>;

    /// Detach and remove the recipe's image; a no-op when none is attached.
    async fn delete_image(&self, owner: &UserId, id: RecipeId) -> Result<(), Error>;
}
