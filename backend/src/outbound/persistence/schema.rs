//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly; regenerate
//! them with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique and stored normalised.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        name -> Varchar,
        /// PHC string; null for accounts without password login.
        password_hash -> Nullable<Text>,
        is_active -> Bool,
        is_staff -> Bool,
        is_superuser -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tags and ingredients. `kind` is `tag` or `ingredient`.
    attributes (id) {
        id -> Int8,
        kind -> Varchar,
        user_id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    /// Recipes. Prices are stored in cents.
    recipes (id) {
        id -> Int8,
        user_id -> Uuid,
        title -> Varchar,
        time_minutes -> Int4,
        price_cents -> Int4,
        description -> Text,
        link -> Varchar,
        image -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Recipe to tag/ingredient associations.
    recipe_attributes (recipe_id, attribute_id) {
        recipe_id -> Int8,
        attribute_id -> Int8,
    }
}

diesel::joinable!(attributes -> users (user_id));
diesel::joinable!(recipes -> users (user_id));
diesel::joinable!(recipe_attributes -> recipes (recipe_id));
diesel::joinable!(recipe_attributes -> attributes (attribute_id));

diesel::allow_tables_to_appear_in_same_query!(users, attributes, recipes, recipe_attributes);
