//! Tests for recipe HTTP handlers.

use super::*;
use crate::domain::ports::{MockRecipesCommand, MockRecipesQuery};
use crate::domain::{AttributeRefs, AttributeSummary, Price};
use crate::inbound::http::configure_extractors;
use crate::inbound::http::test_utils::{
    fixture_ports, fixture_user, sign_in, signed_in_cookie, test_session_middleware,
};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

fn view(id: i64, title: &str, tags: AttributeRefs) -> RecipeView {
    RecipeView {
        id: RecipeId::new(id),
        title: title.to_owned(),
        time_minutes: 10,
        price: Price::from_cents(550).expect("fixture price"),
        description: String::new(),
        link: String::new(),
        image: None,
        tags,
        ingredients: AttributeRefs::Ids(Vec::new()),
    }
}

fn test_app(
    command: MockRecipesCommand,
    query: MockRecipesQuery,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let mut ports = fixture_ports();
    ports.recipes = Arc::new(command);
    ports.recipes_query = Arc::new(query);
    App::new()
        .app_data(web::Data::new(HttpState::new(ports)))
        .configure(configure_extractors)
        .wrap(test_session_middleware())
        .route("/sign-in", web::get().to(sign_in))
        .service(
            web::scope("/api/v1")
                .service(list_recipes)
                .service(create_recipe)
                .service(get_recipe)
                .service(patch_recipe)
                .service(put_recipe)
                .service(delete_recipe),
        )
}

#[rstest]
fn drafts_default_optional_fields() {
    let request: RecipeRequest = serde_json::from_value(json!({
        "title": "Soup",
        "time_minutes": 5,
        "price": 5.5
    }))
    .expect("payload");

    let draft = request.into_draft().expect("valid draft");

    assert_eq!(draft.details.title.as_ref(), "Soup");
    assert_eq!(draft.details.price.cents(), 550);
    assert_eq!(draft.details.description, "");
    assert_eq!(draft.details.link, "");
    assert!(draft.tags.is_empty());
    assert!(draft.ingredients.is_empty());
}

#[rstest]
#[case(json!({"time_minutes": 5, "price": "1"}), "title", "missing_field")]
#[case(json!({"title": "Soup", "price": "1"}), "time_minutes", "missing_field")]
#[case(json!({"title": "Soup", "time_minutes": 5}), "price", "missing_field")]
#[case(json!({"title": " ", "time_minutes": 5, "price": "1"}), "title", "blank")]
#[case(json!({"title": "Soup", "time_minutes": -1, "price": "1"}), "time_minutes", "out_of_range")]
#[case(json!({"title": "Soup", "time_minutes": 5, "price": "1.001"}), "price", "max_decimal_places")]
fn drafts_report_the_offending_field(
    #[case] payload: serde_json::Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let request: RecipeRequest = serde_json::from_value(payload).expect("payload");
    let error = request.into_draft().expect_err("invalid draft");
    let details = error.details().expect("details");
    assert_eq!(details["field"], field);
    assert_eq!(details["code"], code);
}

#[rstest]
fn changes_only_carry_present_fields() {
    let request: RecipeRequest =
        serde_json::from_value(json!({"title": "New", "tags": [2, 1, 2]})).expect("payload");

    let changes = request.into_changes().expect("valid changes");

    assert_eq!(changes.title, Some(RecipeTitle::new("New").expect("title")));
    assert_eq!(changes.time_minutes, None);
    assert_eq!(changes.price, None);
    assert_eq!(changes.description, None);
    assert_eq!(
        changes.tags,
        Some(BTreeSet::from([AttributeId::new(1), AttributeId::new(2)]))
    );
    assert_eq!(changes.ingredients, None);
}

#[actix_web::test]
async fn list_passes_parsed_filters() {
    let mut query = MockRecipesQuery::new();
    query
        .expect_list()
        .withf(|owner, filter| {
            *owner == fixture_user()
                && filter.tags == BTreeSet::from([AttributeId::new(1), AttributeId::new(2)])
                && filter.ingredients.is_empty()
        })
        .times(1)
        .return_once(|_, _| {
            Ok(vec![
                view(2, "Newer", AttributeRefs::Ids(vec![AttributeId::new(1)])),
                view(1, "Older", AttributeRefs::Ids(vec![AttributeId::new(2)])),
            ])
        });
    let app = actix_test::init_service(test_app(MockRecipesCommand::new(), query)).await;
    let cookie = signed_in_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes/?tags=1,2")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = actix_test::read_body_json(res).await;
    assert_eq!(body[0]["id"], 2);
    assert_eq!(body[0]["tags"], json!([1]));
    assert_eq!(body[0]["price"], "5.50");
    assert_eq!(body[1]["title"], "Older");
}

#[actix_web::test]
async fn malformed_filters_are_bad_requests() {
    let app = actix_test::init_service(test_app(
        MockRecipesCommand::new(),
        MockRecipesQuery::new(),
    ))
    .await;
    let cookie = signed_in_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes/?ingredients=salt")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "ingredients");
}

#[rstest]
#[case(actix_test::TestRequest::get().uri("/api/v1/recipes/"))]
#[case(actix_test::TestRequest::get().uri("/api/v1/recipes/1/"))]
#[case(actix_test::TestRequest::delete().uri("/api/v1/recipes/1/"))]
#[case(actix_test::TestRequest::post().uri("/api/v1/recipes/").set_json(json!({})))]
#[actix_web::test]
async fn anonymous_callers_are_unauthorised(#[case] request: actix_test::TestRequest) {
    let app = actix_test::init_service(test_app(
        MockRecipesCommand::new(),
        MockRecipesQuery::new(),
    ))
    .await;
    let res = actix_test::call_service(&app, request.to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_returns_created_list_shape() {
    let mut command = MockRecipesCommand::new();
    command
        .expect_create()
        .withf(|owner, draft| {
            *owner == fixture_user()
                && draft.details.title.as_ref() == "Soup"
                && draft.tags == BTreeSet::from([AttributeId::new(1)])
        })
        .times(1)
        .return_once(|_, _| Ok(view(7, "Soup", AttributeRefs::Ids(vec![AttributeId::new(1)]))));
    let app = actix_test::init_service(test_app(command, MockRecipesQuery::new())).await;
    let cookie = signed_in_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes/")
            .cookie(cookie)
            .set_json(json!({
                "title": "Soup",
                "time_minutes": 10,
                "price": "5.50",
                "tags": [1]
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = actix_test::read_body_json(res).await;
    assert_eq!(body["id"], 7);
    assert_eq!(body["tags"], json!([1]));
}

#[actix_web::test]
async fn foreign_tags_surface_as_bad_request() {
    let mut command = MockRecipesCommand::new();
    command.expect_create().return_once(|_, _| {
        Err(Error::invalid_request("unknown tag ids for this user")
            .with_details(json!({"field": "tags", "code": "unknown_tag", "ids": [99]})))
    });
    let app = actix_test::init_service(test_app(command, MockRecipesQuery::new())).await;
    let cookie = signed_in_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes/")
            .cookie(cookie)
            .set_json(json!({"title": "Soup", "time_minutes": 10, "price": 5, "tags": [99]}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "unknown_tag");
}

#[actix_web::test]
async fn retrieve_returns_detail_shape() {
    let mut query = MockRecipesQuery::new();
    query
        .expect_retrieve()
        .withf(|_, id| *id == RecipeId::new(3))
        .times(1)
        .return_once(|_, _| {
            Ok(view(
                3,
                "Soup",
                AttributeRefs::Expanded(vec![AttributeSummary {
                    id: AttributeId::new(1),
                    name: "Vegan".to_owned(),
                }]),
            ))
        });
    let app = actix_test::init_service(test_app(MockRecipesCommand::new(), query)).await;
    let cookie = signed_in_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes/3/")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = actix_test::read_body_json(res).await;
    assert_eq!(body["tags"], json!([{"id": 1, "name": "Vegan"}]));
}

#[actix_web::test]
async fn non_numeric_ids_are_not_found() {
    let app = actix_test::init_service(test_app(
        MockRecipesCommand::new(),
        MockRecipesQuery::new(),
    ))
    .await;
    let cookie = signed_in_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes/soup/")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn patch_sends_a_partial_update() {
    let mut command = MockRecipesCommand::new();
    command
        .expect_update()
        .withf(|_, id, update| {
            *id == RecipeId::new(4)
                && matches!(update, RecipeUpdate::Partial(changes)
                    if changes.title == Some(RecipeTitle::new("New title").expect("title"))
                        && changes.price.is_none())
        })
        .times(1)
        .return_once(|_, _, _| Ok(view(4, "New title", AttributeRefs::Expanded(Vec::new()))));
    let app = actix_test::init_service(test_app(command, MockRecipesQuery::new())).await;
    let cookie = signed_in_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/recipes/4/")
            .cookie(cookie)
            .set_json(json!({"title": "New title"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn put_sends_a_full_update_with_defaults() {
    let mut command = MockRecipesCommand::new();
    command
        .expect_update()
        .withf(|_, _, update| {
            matches!(update, RecipeUpdate::Full(draft)
                if draft.details.description.is_empty()
                    && draft.tags.is_empty()
                    && draft.details.time_minutes == 25)
        })
        .times(1)
        .return_once(|_, _, _| Ok(view(4, "Soup", AttributeRefs::Expanded(Vec::new()))));
    let app = actix_test::init_service(test_app(command, MockRecipesQuery::new())).await;
    let cookie = signed_in_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/recipes/4/")
            .cookie(cookie)
            .set_json(json!({"title": "Soup", "time_minutes": 25, "price": "6.00"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn put_without_required_fields_is_rejected() {
    let app = actix_test::init_service(test_app(
        MockRecipesCommand::new(),
        MockRecipesQuery::new(),
    ))
    .await;
    let cookie = signed_in_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/recipes/4/")
            .cookie(cookie)
            .set_json(json!({"title": "Soup"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn delete_returns_no_content() {
    let mut command = MockRecipesCommand::new();
    command
        .expect_delete()
        .withf(|owner, id| *owner == fixture_user() && *id == RecipeId::new(8))
        .times(1)
        .return_once(|_, _| Ok(()));
    let app = actix_test::init_service(test_app(command, MockRecipesQuery::new())).await;
    let cookie = signed_in_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/recipes/8/")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}
