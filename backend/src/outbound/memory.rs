//! In-memory repositories used by tests and by servers started without a
//! database.
//!
//! One mutex guards every table, so each write observes and changes a
//! consistent snapshot: a recipe save replaces its row and both association
//! sets under the same lock.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    AttributeRepository, AttributeRepositoryError, RecipeRepository, RecipeRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Attribute, AttributeId, AttributeKind, AttributeName, Email, Recipe, RecipeDraft,
    RecipeFilter, RecipeId, User, UserId,
};

#[derive(Debug)]
struct AttributeTable {
    rows: BTreeMap<AttributeId, Attribute>,
    next_id: i64,
}

impl Default for AttributeTable {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

#[derive(Debug)]
struct Tables {
    users: Vec<User>,
    tags: AttributeTable,
    ingredients: AttributeTable,
    recipes: BTreeMap<RecipeId, Recipe>,
    next_recipe_id: i64,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            tags: AttributeTable::default(),
            ingredients: AttributeTable::default(),
            recipes: BTreeMap::new(),
            next_recipe_id: 1,
        }
    }
}

impl Tables {
    fn attributes(&self, kind: AttributeKind) -> &AttributeTable {
        match kind {
            AttributeKind::Tag => &self.tags,
            AttributeKind::Ingredient => &self.ingredients,
        }
    }

    fn attributes_mut(&mut self, kind: AttributeKind) -> &mut AttributeTable {
        match kind {
            AttributeKind::Tag => &mut self.tags,
            AttributeKind::Ingredient => &mut self.ingredients,
        }
    }
}

fn recipe_refs(recipe: &Recipe, kind: AttributeKind) -> &BTreeSet<AttributeId> {
    match kind {
        AttributeKind::Tag => &recipe.tags,
        AttributeKind::Ingredient => &recipe.ingredients,
    }
}

fn recipe_refs_mut(recipe: &mut Recipe, kind: AttributeKind) -> &mut BTreeSet<AttributeId> {
    match kind {
        AttributeKind::Tag => &mut recipe.tags,
        AttributeKind::Ingredient => &mut recipe.ingredients,
    }
}

const POISONED: &str = "in-memory store lock poisoned";

/// Process-local store implementing the user, attribute and recipe
/// repositories.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use backend::domain::AttributesService;
/// use backend::outbound::memory::InMemoryStore;
///
/// let store = Arc::new(InMemoryStore::default());
/// let _attributes = AttributesService::new(store);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    fn lock<E>(
        &self,
        poisoned: impl FnOnce(&'static str) -> E,
    ) -> Result<MutexGuard<'_, Tables>, E> {
        self.tables.lock().map_err(|_| poisoned(POISONED))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock(UserPersistenceError::query)?;
        if tables.users.iter().any(|existing| existing.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock(UserPersistenceError::query)?;
        Ok(tables.users.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock(UserPersistenceError::query)?;
        Ok(tables.users.iter().find(|user| user.email() == email).cloned())
    }
}

#[async_trait]
impl AttributeRepository for InMemoryStore {
    async fn list(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, AttributeRepositoryError> {
        let tables = self.lock(AttributeRepositoryError::query)?;
        let assigned: BTreeSet<AttributeId> = tables
            .recipes
            .values()
            .filter(|recipe| &recipe.owner == owner)
            .flat_map(|recipe| recipe_refs(recipe, kind).iter().copied())
            .collect();
        Ok(tables
            .attributes(kind)
            .rows
            .values()
            .filter(|attribute| &attribute.owner == owner)
            .filter(|attribute| !assigned_only || assigned.contains(&attribute.id))
            .cloned()
            .collect())
    }

    async fn find_many(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        ids: &BTreeSet<AttributeId>,
    ) -> Result<Vec<Attribute>, AttributeRepositoryError> {
        let tables = self.lock(AttributeRepositoryError::query)?;
        let table = tables.attributes(kind);
        Ok(ids
            .iter()
            .filter_map(|id| table.rows.get(id))
            .filter(|attribute| &attribute.owner == owner)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        name: &AttributeName,
    ) -> Result<Attribute, AttributeRepositoryError> {
        let mut tables = self.lock(AttributeRepositoryError::query)?;
        let table = tables.attributes_mut(kind);
        let attribute = Attribute {
            id: AttributeId::new(table.next_id),
            kind,
            name: name.clone(),
            owner: *owner,
        };
        table.next_id += 1;
        table.rows.insert(attribute.id, attribute.clone());
        Ok(attribute)
    }

    async fn rename(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        id: AttributeId,
        name: &AttributeName,
    ) -> Result<Option<Attribute>, AttributeRepositoryError> {
        let mut tables = self.lock(AttributeRepositoryError::query)?;
        Ok(tables
            .attributes_mut(kind)
            .rows
            .get_mut(&id)
            .filter(|attribute| &attribute.owner == owner)
            .map(|attribute| {
                attribute.name = name.clone();
                attribute.clone()
            }))
    }

    async fn delete(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        id: AttributeId,
    ) -> Result<bool, AttributeRepositoryError> {
        let mut tables = self.lock(AttributeRepositoryError::query)?;
        let table = tables.attributes_mut(kind);
        let owned = table
            .rows
            .get(&id)
            .is_some_and(|attribute| &attribute.owner == owner);
        if !owned {
            return Ok(false);
        }
        table.rows.remove(&id);
        for recipe in tables.recipes.values_mut() {
            recipe_refs_mut(recipe, kind).remove(&id);
        }
        debug!(%kind, attribute_id = %id, "attribute removed from memory store");
        Ok(true)
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let tables = self.lock(RecipeRepositoryError::query)?;
        Ok(tables
            .recipes
            .values()
            .rev()
            .filter(|recipe| &recipe.owner == owner && filter.matches(recipe))
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let tables = self.lock(RecipeRepositoryError::query)?;
        Ok(tables
            .recipes
            .get(&id)
            .filter(|recipe| &recipe.owner == owner)
            .cloned())
    }

    async fn create(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut tables = self.lock(RecipeRepositoryError::query)?;
        let recipe = Recipe {
            id: RecipeId::new(tables.next_recipe_id),
            owner: *owner,
            details: draft.details.clone(),
            image: None,
            tags: draft.tags.clone(),
            ingredients: draft.ingredients.clone(),
        };
        tables.next_recipe_id += 1;
        tables.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn save(&self, recipe: &Recipe) -> Result<bool, RecipeRepositoryError> {
        let mut tables = self.lock(RecipeRepositoryError::query)?;
        match tables.recipes.get_mut(&recipe.id) {
            Some(stored) if stored.owner == recipe.owner => {
                *stored = recipe.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut tables = self.lock(RecipeRepositoryError::query)?;
        let owned = tables
            .recipes
            .get(&id)
            .is_some_and(|recipe| &recipe.owner == owner);
        Ok(if owned { tables.recipes.remove(&id) } else { None })
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
