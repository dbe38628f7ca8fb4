//! PostgreSQL-backed `AttributeRepository` for tags and ingredients.
//!
//! Both kinds live in the `attributes` table, discriminated by `kind`; every
//! query filters on kind and owner.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{AttributeRepository, AttributeRepositoryError};
use crate::domain::{Attribute, AttributeId, AttributeKind, AttributeName, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AttributeRow, NewAttributeRow};
use super::pool::{DbPool, PoolError};
use super::schema::{attributes, recipe_attributes, recipes};

/// Diesel-backed implementation of the `AttributeRepository` port.
#[derive(Clone)]
pub struct DieselAttributeRepository {
    pool: DbPool,
}

impl DieselAttributeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AttributeRepositoryError {
    map_basic_pool_error(error, AttributeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AttributeRepositoryError {
    map_basic_diesel_error(
        error,
        AttributeRepositoryError::query,
        AttributeRepositoryError::connection,
    )
}

/// Database spelling of an attribute kind.
pub(super) fn kind_column(kind: AttributeKind) -> &'static str {
    kind.noun()
}

fn parse_kind(raw: &str) -> Option<AttributeKind> {
    match raw {
        "tag" => Some(AttributeKind::Tag),
        "ingredient" => Some(AttributeKind::Ingredient),
        _ => None,
    }
}

fn row_to_attribute(row: AttributeRow) -> Result<Attribute, AttributeRepositoryError> {
    let kind = parse_kind(&row.kind).ok_or_else(|| {
        warn!(attribute_id = row.id, kind = %row.kind, "unrecognised attribute kind");
        AttributeRepositoryError::query(format!("unknown attribute kind: {}", row.kind))
    })?;
    let name = AttributeName::new(&row.name).map_err(|err| {
        AttributeRepositoryError::query(format!("stored attribute name invalid: {err}"))
    })?;
    Ok(Attribute {
        id: AttributeId::new(row.id),
        kind,
        name,
        owner: UserId::from_uuid(row.user_id),
    })
}

fn rows_to_attributes(rows: Vec<AttributeRow>) -> Result<Vec<Attribute>, AttributeRepositoryError> {
    rows.into_iter().map(row_to_attribute).collect()
}

#[async_trait]
impl AttributeRepository for DieselAttributeRepository {
    async fn list(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, AttributeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = attributes::table
            .filter(attributes::kind.eq(kind_column(kind)))
            .filter(attributes::user_id.eq(owner.as_uuid()))
            .select(AttributeRow::as_select())
            .into_boxed();
        if assigned_only {
            let assigned = recipe_attributes::table
                .inner_join(recipes::table)
                .filter(recipes::user_id.eq(*owner.as_uuid()))
                .select(recipe_attributes::attribute_id);
            query = query.filter(attributes::id.eq_any(assigned));
        }

        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows_to_attributes(rows)
    }

    async fn find_many(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        ids: &BTreeSet<AttributeId>,
    ) -> Result<Vec<Attribute>, AttributeRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows = attributes::table
            .filter(attributes::kind.eq(kind_column(kind)))
            .filter(attributes::user_id.eq(owner.as_uuid()))
            .filter(attributes::id.eq_any(raw_ids))
            .select(AttributeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_attributes(rows)
    }

    async fn create(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        name: &AttributeName,
    ) -> Result<Attribute, AttributeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(attributes::table)
            .values(&NewAttributeRow {
                kind: kind_column(kind),
                user_id: *owner.as_uuid(),
                name: name.as_ref(),
            })
            .returning(AttributeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_attribute(row)
    }

    async fn rename(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        id: AttributeId,
        name: &AttributeName,
    ) -> Result<Option<Attribute>, AttributeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(attributes::table)
            .filter(attributes::id.eq(id.get()))
            .filter(attributes::kind.eq(kind_column(kind)))
            .filter(attributes::user_id.eq(owner.as_uuid()))
            .set(attributes::name.eq(name.as_ref()))
            .returning(AttributeRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_attribute)
            .transpose()
    }

    async fn delete(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        id: AttributeId,
    ) -> Result<bool, AttributeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Associations go with the row via ON DELETE CASCADE.
        let deleted = diesel::delete(attributes::table)
            .filter(attributes::id.eq(id.get()))
            .filter(attributes::kind.eq(kind_column(kind)))
            .filter(attributes::user_id.eq(owner.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
