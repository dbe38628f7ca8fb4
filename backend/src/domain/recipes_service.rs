//! Recipe services.
//!
//! Implements the recipe driving ports: owner-scoped reads, writes that only
//! reference the owner's own tags and ingredients, and image attachment
//! backed by a [`MediaStore`].

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::attributes_service::map_attribute_error;
use crate::domain::ports::{
    AttributeRepository, MediaStore, MediaStoreError, RecipeImage, RecipeRepository,
    RecipeRepositoryError, RecipesCommand, RecipesQuery,
};
use crate::domain::{
    Attribute, AttributeId, AttributeKind, Error, ImageUpload, Recipe, RecipeDraft, RecipeFilter,
    RecipeId, RecipeShape, RecipeUpdate, RecipeView, UserId, generate_random_path, shape_recipe,
};

/// Recipe service implementing [`RecipesCommand`] and [`RecipesQuery`].
#[derive(Clone)]
pub struct RecipesService<R, A, M> {
    recipes: Arc<R>,
    attributes: Arc<A>,
    media: Arc<M>,
}

impl<R, A, M> RecipesService<R, A, M> {
    pub fn new(recipes: Arc<R>, attributes: Arc<A>, media: Arc<M>) -> Self {
        Self {
            recipes,
            attributes,
            media,
        }
    }
}

fn recipe_not_found() -> Error {
    Error::not_found("recipe not found")
}

fn map_recipe_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
    }
}

fn map_media_error(error: MediaStoreError) -> Error {
    Error::internal(format!("media store error: {error}"))
}

impl<R, A, M> RecipesService<R, A, M>
where
    R: RecipeRepository,
    A: AttributeRepository,
    M: MediaStore,
{
    /// Load the referenced attributes, failing when any id is unknown to
    /// `owner`. Foreign ids are indistinguishable from missing ones.
    async fn owned_attributes(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        ids: &BTreeSet<AttributeId>,
    ) -> Result<Vec<Attribute>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = self
            .attributes
            .find_many(kind, owner, ids)
            .await
            .map_err(map_attribute_error)?;
        let known: BTreeSet<AttributeId> = found.iter().map(|attribute| attribute.id).collect();
        let missing: Vec<i64> = ids.difference(&known).map(|id| id.get()).collect();
        if !missing.is_empty() {
            return Err(Error::invalid_request(format!(
                "unknown {} ids for this user",
                kind.noun()
            ))
            .with_details(json!({
                "field": kind.recipe_field(),
                "code": format!("unknown_{}", kind.noun()),
                "ids": missing,
            })));
        }
        Ok(found)
    }

    async fn find_owned(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find(owner, id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(recipe_not_found)
    }

    async fn detail_view(&self, recipe: &Recipe) -> Result<RecipeView, Error> {
        let mut attributes = self
            .attributes
            .find_many(AttributeKind::Tag, &recipe.owner, &recipe.tags)
            .await
            .map_err(map_attribute_error)?;
        attributes.extend(
            self.attributes
                .find_many(AttributeKind::Ingredient, &recipe.owner, &recipe.ingredients)
                .await
                .map_err(map_attribute_error)?,
        );
        Ok(shape_recipe(recipe, RecipeShape::Detail, &attributes))
    }

    async fn save_existing(&self, recipe: &Recipe) -> Result<(), Error> {
        let saved = self.recipes.save(recipe).await.map_err(map_recipe_error)?;
        if saved { Ok(()) } else { Err(recipe_not_found()) }
    }

    /// Remove a file that is no longer referenced. Failures only leave an
    /// orphan behind, so they are logged rather than returned.
    async fn discard_file(&self, path: &str) {
        if let Err(err) = self.media.delete(path).await {
            warn!(%path, error = %err, "failed to remove media file");
        }
    }
}

#[async_trait]
impl<R, A, M> RecipesQuery for RecipesService<R, A, M>
where
    R: RecipeRepository,
    A: AttributeRepository,
    M: MediaStore,
{
    async fn list(&self, owner: &UserId, filter: RecipeFilter) -> Result<Vec<RecipeView>, Error> {
        let recipes = self
            .recipes
            .list(owner, &filter)
            .await
            .map_err(map_recipe_error)?;
        Ok(recipes
            .iter()
            .map(|recipe| shape_recipe(recipe, RecipeShape::List, &[]))
            .collect())
    }

    async fn retrieve(&self, owner: &UserId, id: RecipeId) -> Result<RecipeView, Error> {
        let recipe = self.find_owned(owner, id).await?;
        self.detail_view(&recipe).await
    }
}

#[async_trait]
impl<R, A, M> RecipesCommand for RecipesService<R, A, M>
where
    R: RecipeRepository,
    A: AttributeRepository,
    M: MediaStore,
{
    async fn create(&self, owner: &UserId, draft: RecipeDraft) -> Result<RecipeView, Error> {
        for kind in [AttributeKind::Tag, AttributeKind::Ingredient] {
            self.owned_attributes(kind, owner, draft.attribute_ids(kind)).await?;
        }
        let recipe = self
            .recipes
            .create(owner, &draft)
            .await
            .map_err(map_recipe_error)?;
        info!(%owner, recipe_id = %recipe.id, "recipe created");
        Ok(shape_recipe(&recipe, RecipeShape::List, &[]))
    }

    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        update: RecipeUpdate,
    ) -> Result<RecipeView, Error> {
        let mut recipe = self.find_owned(owner, id).await?;
        for kind in [AttributeKind::Tag, AttributeKind::Ingredient] {
            if let Some(ids) = update.attribute_ids(kind) {
                self.owned_attributes(kind, owner, ids).await?;
            }
        }
        let full = matches!(update, RecipeUpdate::Full(_));
        recipe.apply(update);
        self.save_existing(&recipe).await?;
        info!(%owner, recipe_id = %id, full, "recipe updated");
        Ok(shape_recipe(&recipe, RecipeShape::List, &[]))
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<(), Error> {
        let removed = self
            .recipes
            .delete(owner, id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(recipe_not_found)?;
        if let Some(image) = removed.image.as_deref() {
            self.discard_file(image).await;
        }
        info!(%owner, recipe_id = %id, "recipe deleted");
        Ok(())
    }

    async fn upload_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        upload: ImageUpload,
    ) -> Result<RecipeImage, Error> {
        let mut recipe = self.find_owned(owner, id).await?;
        let path = generate_random_path(upload.filename());
        self.media
            .save(&path, upload.bytes())
            .await
            .map_err(map_media_error)?;

        let previous = recipe.image.replace(path.clone());
        if let Err(err) = self.save_existing(&recipe).await {
            self.discard_file(&path).await;
            return Err(err);
        }
        if let Some(previous) = previous.as_deref() {
            self.discard_file(previous).await;
        }

        info!(%owner, recipe_id = %id, image = %path, "recipe image uploaded");
        Ok(RecipeImage {
            id,
            image: Some(path),
        })
    }

    async fn delete_image(&self, owner: &UserId, id: RecipeId) -> Result<(), Error> {
        let mut recipe = self.find_owned(owner, id).await?;
        let Some(previous) = recipe.image.take() else {
            return Ok(());
        };
        self.save_existing(&recipe).await?;
        self.discard_file(&previous).await;
        info!(%owner, recipe_id = %id, "recipe image removed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "recipes_service_tests.rs"]
mod tests;
