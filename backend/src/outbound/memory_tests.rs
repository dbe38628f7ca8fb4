//! Behavioural coverage for the in-memory repositories.

use super::*;
use crate::domain::{Price, RecipeDetails, RecipeTitle};
use rstest::{fixture, rstest};

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::default()
}

fn name(raw: &str) -> AttributeName {
    AttributeName::new(raw).expect("attribute name")
}

fn draft(title: &str, tags: &[i64], ingredients: &[i64]) -> RecipeDraft {
    RecipeDraft {
        details: RecipeDetails {
            title: RecipeTitle::new(title).expect("title"),
            time_minutes: 10,
            price: Price::from_cents(500).expect("price"),
            description: String::new(),
            link: String::new(),
        },
        tags: tags.iter().copied().map(AttributeId::new).collect(),
        ingredients: ingredients.iter().copied().map(AttributeId::new).collect(),
    }
}

fn user(email: &str) -> User {
    User::new(UserId::random(), Email::new(email).expect("email"), "")
}

#[rstest]
#[tokio::test]
async fn users_are_unique_by_email(store: InMemoryStore) {
    let first = user("cook@example.com");
    UserRepository::create(&store, &first).await.expect("first insert");

    let err = UserRepository::create(&store, &user("cook@example.com"))
        .await
        .expect_err("duplicate email");
    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));

    let found = store
        .find_by_email(first.email())
        .await
        .expect("lookup")
        .expect("stored user");
    assert_eq!(found.id(), first.id());
}

#[rstest]
#[tokio::test]
async fn attribute_listing_is_owner_scoped(store: InMemoryStore) {
    let (alice, bob) = (UserId::random(), UserId::random());
    let mine = AttributeRepository::create(&store, AttributeKind::Tag, &alice, &name("Vegan"))
        .await
        .expect("create");
    AttributeRepository::create(&store, AttributeKind::Tag, &bob, &name("Dessert"))
        .await
        .expect("create");
    AttributeRepository::create(&store, AttributeKind::Ingredient, &alice, &name("Salt"))
        .await
        .expect("create");

    let tags = AttributeRepository::list(&store, AttributeKind::Tag, &alice, false)
        .await
        .expect("list");

    assert_eq!(tags, vec![mine]);
}

#[rstest]
#[tokio::test]
async fn tags_and_ingredients_number_independently(store: InMemoryStore) {
    let owner = UserId::random();
    let tag = AttributeRepository::create(&store, AttributeKind::Tag, &owner, &name("Quick"))
        .await
        .expect("tag");
    let ingredient =
        AttributeRepository::create(&store, AttributeKind::Ingredient, &owner, &name("Egg"))
            .await
            .expect("ingredient");

    assert_eq!(tag.id, AttributeId::new(1));
    assert_eq!(ingredient.id, AttributeId::new(1));
}

#[rstest]
#[tokio::test]
async fn find_many_drops_foreign_and_unknown_ids(store: InMemoryStore) {
    let (alice, bob) = (UserId::random(), UserId::random());
    let mine = AttributeRepository::create(&store, AttributeKind::Tag, &alice, &name("Mine"))
        .await
        .expect("create");
    let theirs = AttributeRepository::create(&store, AttributeKind::Tag, &bob, &name("Theirs"))
        .await
        .expect("create");
    let ids = BTreeSet::from([mine.id, theirs.id, AttributeId::new(99)]);

    let found = store
        .find_many(AttributeKind::Tag, &alice, &ids)
        .await
        .expect("find many");

    assert_eq!(found, vec![mine]);
}

#[rstest]
#[tokio::test]
async fn rename_and_delete_ignore_other_owners(store: InMemoryStore) {
    let (alice, bob) = (UserId::random(), UserId::random());
    let tag = AttributeRepository::create(&store, AttributeKind::Tag, &alice, &name("Spicy"))
        .await
        .expect("create");

    let renamed = store
        .rename(AttributeKind::Tag, &bob, tag.id, &name("Mild"))
        .await
        .expect("rename");
    let deleted = AttributeRepository::delete(&store, AttributeKind::Tag, &bob, tag.id)
        .await
        .expect("delete");

    assert!(renamed.is_none());
    assert!(!deleted);
}

#[rstest]
#[tokio::test]
async fn assigned_only_lists_attributes_used_by_recipes(store: InMemoryStore) {
    let owner = UserId::random();
    let used =
        AttributeRepository::create(&store, AttributeKind::Ingredient, &owner, &name("Flour"))
            .await
        .expect("create");
    AttributeRepository::create(&store, AttributeKind::Ingredient, &owner, &name("Yeast"))
        .await
        .expect("create");
    RecipeRepository::create(&store, &owner, &draft("Bread", &[], &[used.id.get()]))
        .await
        .expect("recipe");

    let listed = AttributeRepository::list(&store, AttributeKind::Ingredient, &owner, true)
        .await
        .expect("list");

    assert_eq!(listed, vec![used]);
}

#[rstest]
#[tokio::test]
async fn deleting_an_attribute_detaches_it_from_recipes(store: InMemoryStore) {
    let owner = UserId::random();
    let tag = AttributeRepository::create(&store, AttributeKind::Tag, &owner, &name("Quick"))
        .await
        .expect("create");
    let recipe = RecipeRepository::create(&store, &owner, &draft("Toast", &[tag.id.get()], &[]))
        .await
        .expect("recipe");

    AttributeRepository::delete(&store, AttributeKind::Tag, &owner, tag.id)
        .await
        .expect("delete");

    let stored = store
        .find(&owner, recipe.id)
        .await
        .expect("find")
        .expect("recipe still present");
    assert!(stored.tags.is_empty());
}

#[rstest]
#[tokio::test]
async fn recipes_list_newest_first_and_honour_filters(store: InMemoryStore) {
    let owner = UserId::random();
    let soup = RecipeRepository::create(&store, &owner, &draft("Soup", &[1], &[]))
        .await
        .expect("soup");
    let stew = RecipeRepository::create(&store, &owner, &draft("Stew", &[2], &[]))
        .await
        .expect("stew");
    RecipeRepository::create(&store, &UserId::random(), &draft("Other", &[1], &[]))
        .await
        .expect("other");

    let all = RecipeRepository::list(&store, &owner, &RecipeFilter::default())
        .await
        .expect("list");
    let filtered = RecipeRepository::list(
        &store,
        &owner,
        &RecipeFilter {
            tags: BTreeSet::from([AttributeId::new(1)]),
            ingredients: BTreeSet::new(),
        },
    )
    .await
    .expect("filtered list");

    assert_eq!(
        all.iter().map(|recipe| recipe.id).collect::<Vec<_>>(),
        vec![stew.id, soup.id]
    );
    assert_eq!(filtered, vec![soup]);
}

#[rstest]
#[tokio::test]
async fn save_replaces_the_whole_record(store: InMemoryStore) {
    let owner = UserId::random();
    let mut recipe = RecipeRepository::create(&store, &owner, &draft("Soup", &[1, 2], &[3]))
        .await
        .expect("create");
    recipe.image = Some("uploads/recipe/images/a.png".to_owned());
    recipe.tags = BTreeSet::from([AttributeId::new(2)]);

    assert!(store.save(&recipe).await.expect("save"));
    let stored = store
        .find(&owner, recipe.id)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(stored, recipe);
}

#[rstest]
#[tokio::test]
async fn foreign_recipes_are_invisible(store: InMemoryStore) {
    let (alice, bob) = (UserId::random(), UserId::random());
    let recipe = RecipeRepository::create(&store, &alice, &draft("Soup", &[], &[]))
        .await
        .expect("create");

    assert!(store.find(&bob, recipe.id).await.expect("find").is_none());
    assert!(
        RecipeRepository::delete(&store, &bob, recipe.id)
            .await
            .expect("delete")
            .is_none()
    );
    let removed = RecipeRepository::delete(&store, &alice, recipe.id)
        .await
        .expect("delete");
    assert_eq!(removed, Some(recipe));
}
