//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! A recipe is one `recipes` row plus its `recipe_attributes` rows. Writes
//! touching both run inside a single transaction.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    AttributeId, AttributeKind, Price, Recipe, RecipeDetails, RecipeDraft, RecipeFilter, RecipeId,
    RecipeTitle, UserId,
};

use super::diesel_attribute_repository::kind_column;
use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewRecipeRow, RecipeAttributeRow, RecipeChangeset, RecipeRow};
use super::pool::{DbPool, PoolError};
use super::schema::{attributes, recipe_attributes, recipes};

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_basic_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    map_basic_diesel_error(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

fn to_db_int(value: u32, column: &str) -> Result<i32, RecipeRepositoryError> {
    i32::try_from(value)
        .map_err(|_| RecipeRepositoryError::query(format!("{column} out of range: {value}")))
}

fn from_db_int(value: i32, column: &str) -> Result<u32, RecipeRepositoryError> {
    u32::try_from(value)
        .map_err(|_| RecipeRepositoryError::query(format!("stored {column} negative: {value}")))
}

/// Association ids of one recipe, split by kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Associations {
    tags: BTreeSet<AttributeId>,
    ingredients: BTreeSet<AttributeId>,
}

fn group_associations(rows: Vec<(i64, i64, String)>) -> HashMap<i64, Associations> {
    let mut grouped: HashMap<i64, Associations> = HashMap::new();
    for (recipe_id, attribute_id, kind) in rows {
        let entry = grouped.entry(recipe_id).or_default();
        let id = AttributeId::new(attribute_id);
        if kind == kind_column(AttributeKind::Tag) {
            entry.tags.insert(id);
        } else if kind == kind_column(AttributeKind::Ingredient) {
            entry.ingredients.insert(id);
        } else {
            debug!(recipe_id, attribute_id, kind = %kind, "skipping unknown association kind");
        }
    }
    grouped
}

fn association_rows(
    recipe_id: i64,
    tags: &BTreeSet<AttributeId>,
    ingredients: &BTreeSet<AttributeId>,
) -> Vec<RecipeAttributeRow> {
    tags.iter()
        .chain(ingredients)
        .map(|id| RecipeAttributeRow {
            recipe_id,
            attribute_id: id.get(),
        })
        .collect()
}

fn assemble(row: RecipeRow, associations: Associations) -> Result<Recipe, RecipeRepositoryError> {
    let title = RecipeTitle::new(&row.title)
        .map_err(|err| RecipeRepositoryError::query(format!("stored title invalid: {err}")))?;
    let price = Price::from_cents(from_db_int(row.price_cents, "price_cents")?)
        .map_err(|err| RecipeRepositoryError::query(format!("stored price invalid: {err}")))?;
    Ok(Recipe {
        id: RecipeId::new(row.id),
        owner: UserId::from_uuid(row.user_id),
        details: RecipeDetails {
            title,
            time_minutes: from_db_int(row.time_minutes, "time_minutes")?,
            price,
            description: row.description,
            link: row.link,
        },
        image: row.image,
        tags: associations.tags,
        ingredients: associations.ingredients,
    })
}

async fn load_associations(
    conn: &mut AsyncPgConnection,
    recipe_ids: Vec<i64>,
) -> QueryResult<HashMap<i64, Associations>> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i64, i64, String)> = recipe_attributes::table
        .inner_join(attributes::table)
        .filter(recipe_attributes::recipe_id.eq_any(recipe_ids))
        .select((
            recipe_attributes::recipe_id,
            recipe_attributes::attribute_id,
            attributes::kind,
        ))
        .load(conn)
        .await?;
    Ok(group_associations(rows))
}

fn assemble_all(
    rows: Vec<RecipeRow>,
    mut associations: HashMap<i64, Associations>,
) -> Result<Vec<Recipe>, RecipeRepositoryError> {
    rows.into_iter()
        .map(|row| {
            let refs = associations.remove(&row.id).unwrap_or_default();
            assemble(row, refs)
        })
        .collect()
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::user_id.eq(owner.as_uuid()))
            .order(recipes::id.desc())
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let ids = rows.iter().map(|row| row.id).collect();
        let associations = load_associations(&mut conn, ids)
            .await
            .map_err(map_diesel_error)?;

        let mut recipes = assemble_all(rows, associations)?;
        recipes.retain(|recipe| filter.matches(recipe));
        Ok(recipes)
    }

    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(row) = recipes::table
            .filter(recipes::id.eq(id.get()))
            .filter(recipes::user_id.eq(owner.as_uuid()))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };
        let mut associations = load_associations(&mut conn, vec![row.id])
            .await
            .map_err(map_diesel_error)?;
        let refs = associations.remove(&row.id).unwrap_or_default();
        assemble(row, refs).map(Some)
    }

    async fn create(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let details = &draft.details;
        let new_row = NewRecipeRow {
            user_id: *owner.as_uuid(),
            title: details.title.as_ref(),
            time_minutes: to_db_int(details.time_minutes, "time_minutes")?,
            price_cents: to_db_int(details.price.cents(), "price_cents")?,
            description: &details.description,
            link: &details.link,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = conn
            .transaction(|conn| {
                async move {
                    let row: RecipeRow = diesel::insert_into(recipes::table)
                        .values(&new_row)
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let links = association_rows(row.id, &draft.tags, &draft.ingredients);
                    if !links.is_empty() {
                        diesel::insert_into(recipe_attributes::table)
                            .values(&links)
                            .execute(conn)
                            .await?;
                    }
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        assemble(
            row,
            Associations {
                tags: draft.tags.clone(),
                ingredients: draft.ingredients.clone(),
            },
        )
    }

    async fn save(&self, recipe: &Recipe) -> Result<bool, RecipeRepositoryError> {
        let details = &recipe.details;
        let changes = RecipeChangeset {
            title: details.title.as_ref(),
            time_minutes: to_db_int(details.time_minutes, "time_minutes")?,
            price_cents: to_db_int(details.price.cents(), "price_cents")?,
            description: &details.description,
            link: &details.link,
            image: recipe.image.as_deref(),
        };
        let recipe_id = recipe.id.get();
        let owner = *recipe.owner.as_uuid();
        let links = association_rows(recipe_id, &recipe.tags, &recipe.ingredients);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let updated = diesel::update(recipes::table)
                    .filter(recipes::id.eq(recipe_id))
                    .filter(recipes::user_id.eq(owner))
                    .set(&changes)
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Ok(false);
                }
                diesel::delete(recipe_attributes::table)
                    .filter(recipe_attributes::recipe_id.eq(recipe_id))
                    .execute(conn)
                    .await?;
                if !links.is_empty() {
                    diesel::insert_into(recipe_attributes::table)
                        .values(&links)
                        .execute(conn)
                        .await?;
                }
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let owner = *owner.as_uuid();
        let recipe_id = id.get();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = conn
            .transaction(|conn| {
                async move {
                    // Associations cascade with the row, so read them first.
                    let mut associations = load_associations(conn, vec![recipe_id]).await?;
                    let row = diesel::delete(recipes::table)
                        .filter(recipes::id.eq(recipe_id))
                        .filter(recipes::user_id.eq(owner))
                        .returning(RecipeRow::as_returning())
                        .get_result::<RecipeRow>(conn)
                        .await
                        .optional()?;
                    Ok(row.map(|row| {
                        let refs = associations.remove(&recipe_id).unwrap_or_default();
                        (row, refs)
                    }))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        removed
            .map(|(row, refs)| assemble(row, refs))
            .transpose()
    }
}
