//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{attributes, recipe_attributes, recipes, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    #[expect(dead_code, reason = "audit column, not surfaced by the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: Option<&'a str>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

// ---------------------------------------------------------------------------
// Tags and ingredients
// ---------------------------------------------------------------------------

/// Row struct for reading from the attributes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attributes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttributeRow {
    pub id: i64,
    pub kind: String,
    pub user_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attributes)]
pub(crate) struct NewAttributeRow<'a> {
    pub kind: &'a str,
    pub user_id: Uuid,
    pub name: &'a str,
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price_cents: i32,
    pub description: String,
    pub link: String,
    pub image: Option<String>,
}

/// Insertable struct for creating recipe records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub time_minutes: i32,
    pub price_cents: i32,
    pub description: &'a str,
    pub link: &'a str,
}

/// Changeset overwriting every mutable recipe column.
///
/// `treat_none_as_null` so clearing the image writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RecipeChangeset<'a> {
    pub title: &'a str,
    pub time_minutes: i32,
    pub price_cents: i32,
    pub description: &'a str,
    pub link: &'a str,
    pub image: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = recipe_attributes)]
pub(crate) struct RecipeAttributeRow {
    pub recipe_id: i64,
    pub attribute_id: i64,
}
