use crate::helpers::{
    add_ingredient, add_recipe, get_session, sample_recipe, TestApp,
};
use recipe_api::routes::recipe::AttributeResponse;
use reqwest::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_without_credentials(app: &mut TestApp) {
    assert_eq!(
        app.get_ingredients(&[], None).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.post_ingredient(&json!({"name": "Kale"}), None)
            .await
            .status(),
        StatusCode::UNAUTHORIZED
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_list_own_ingredients_in_creation_order(app: &mut TestApp) {
    let token = get_session(app).await;
    let other_token = get_session(app).await;

    let kale = add_ingredient(app, &token, "Kale").await;
    let salt = add_ingredient(app, &token, "Salt").await;
    let _vinegar = add_ingredient(app, &other_token, "Vinegar").await;
    let apple = add_ingredient(app, &token, "Apple").await;

    let response = app.get_ingredients(&[], Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Vec<AttributeResponse>>().await.unwrap(),
        vec![
            AttributeResponse { id: kale, name: "Kale".to_owned() },
            AttributeResponse { id: salt, name: "Salt".to_owned() },
            AttributeResponse { id: apple, name: "Apple".to_owned() },
        ]
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_empty_name(app: &mut TestApp) {
    let token = get_session(app).await;

    let response = app
        .post_ingredient(&json!({"name": ""}), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let ingredients = app
        .get_ingredients(&[], Some(&token))
        .await
        .json::<Vec<AttributeResponse>>()
        .await
        .unwrap();
    assert!(ingredients.is_empty());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_filter_ingredients_assigned_to_recipes(app: &mut TestApp) {
    let token = get_session(app).await;
    let eggs = add_ingredient(app, &token, "Eggs").await;
    let _cheese = add_ingredient(app, &token, "Cheese").await;

    let mut recipe = sample_recipe("Eggs benedict");
    recipe["ingredients"] = json!([eggs]);
    add_recipe(app, &token, &recipe).await;

    let mut recipe = sample_recipe("Coriander eggs on toast");
    recipe["ingredients"] = json!([eggs]);
    add_recipe(app, &token, &recipe).await;

    let ingredients = app
        .get_ingredients(&[("assigned_only", "1")], Some(&token))
        .await
        .json::<Vec<AttributeResponse>>()
        .await
        .unwrap();
    assert_eq!(
        ingredients,
        vec![AttributeResponse { id: eggs, name: "Eggs".to_owned() }]
    );
}
