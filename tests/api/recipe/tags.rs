use crate::helpers::{
    add_recipe, add_tag, get_json_response_body, get_session, sample_recipe,
    TestApp,
};
use recipe_api::{routes::recipe::AttributeResponse, ErrorResponse};
use reqwest::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_without_credentials(app: &mut TestApp) {
    assert_eq!(
        app.get_tags(&[], None).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.post_tag(&json!({"name": "Vegan"}), None).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_list_tags_by_name_descending(app: &mut TestApp) {
    let token = get_session(app).await;
    let dessert = add_tag(app, &token, "Dessert").await;
    let vegan = add_tag(app, &token, "Vegan").await;
    let breakfast = add_tag(app, &token, "Breakfast").await;

    let response = app.get_tags(&[], Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let tags = response.json::<Vec<AttributeResponse>>().await.unwrap();
    let expected = vec![
        AttributeResponse { id: vegan, name: "Vegan".to_owned() },
        AttributeResponse { id: dessert, name: "Dessert".to_owned() },
        AttributeResponse { id: breakfast, name: "Breakfast".to_owned() },
    ];
    assert_eq!(tags, expected);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_only_list_own_tags(app: &mut TestApp) {
    let token = get_session(app).await;
    let other_token = get_session(app).await;

    let tag = add_tag(app, &token, "Comfort Food").await;
    let _other = add_tag(app, &other_token, "Fruity").await;

    let tags = app
        .get_tags(&[], Some(&token))
        .await
        .json::<Vec<AttributeResponse>>()
        .await
        .unwrap();
    assert_eq!(
        tags,
        vec![AttributeResponse { id: tag, name: "Comfort Food".to_owned() }]
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_201_for_valid_tag(app: &mut TestApp) {
    let token = get_session(app).await;

    let schema = json!({
      "$schema": "http://json-schema.org/draft-04/schema#",
      "type": "object",
      "properties": {
        "id": { "type": "integer" },
        "name": { "type": "string", "minLength": 1, "maxLength": 255 }
      },
      "required": ["id", "name"]
    });

    let response = app.post_tag(&json!({"name": "Test tag"}), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response_body = get_json_response_body(response).await;
    assert!(
        jsonschema::is_valid(&schema, &response_body),
        "response does not match schema"
    );
    assert_eq!(response_body.get("name").unwrap(), "Test tag");

    let tags = app
        .get_tags(&[], Some(&token))
        .await
        .json::<Vec<AttributeResponse>>()
        .await
        .unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(json!(tags[0].id), response_body["id"]);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_invalid_name(app: &mut TestApp) {
    let token = get_session(app).await;

    let test_cases = [
        ("".to_owned(), "Name cannot be empty"),
        ("a".repeat(256), "Max name length is 255 characters"),
    ];

    for (name, error_message) in test_cases.iter() {
        let response = app.post_tag(&json!({"name": name}), Some(&token)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<ErrorResponse>().await.unwrap().error,
            error_message.to_string()
        );
    }

    let tags = app
        .get_tags(&[], Some(&token))
        .await
        .json::<Vec<AttributeResponse>>()
        .await
        .unwrap();
    assert!(tags.is_empty(), "Invalid tags should not be persisted");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_422_if_malformed_input(app: &mut TestApp) {
    let token = get_session(app).await;

    for body in [json!({}), json!({"name": 42}), json!({"nam": "Vegan"})] {
        let response = app.post_tag(&body, Some(&token)).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "Failed for input: {body}"
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_filter_tags_assigned_to_recipes(app: &mut TestApp) {
    let token = get_session(app).await;
    let breakfast = add_tag(app, &token, "Breakfast").await;
    let _lunch = add_tag(app, &token, "Lunch").await;

    let mut recipe = sample_recipe("Green eggs on toast");
    recipe["tags"] = json!([breakfast]);
    add_recipe(app, &token, &recipe).await;

    let mut recipe = sample_recipe("Porridge");
    recipe["tags"] = json!([breakfast]);
    add_recipe(app, &token, &recipe).await;

    let tags = app
        .get_tags(&[("assigned_only", "1")], Some(&token))
        .await
        .json::<Vec<AttributeResponse>>()
        .await
        .unwrap();
    assert_eq!(
        tags,
        vec![AttributeResponse { id: breakfast, name: "Breakfast".to_owned() }],
        "Assigned tags should be listed once"
    );

    let all = app
        .get_tags(&[("assigned_only", "0")], Some(&token))
        .await
        .json::<Vec<AttributeResponse>>()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_invalid_assigned_only(app: &mut TestApp) {
    let token = get_session(app).await;

    let response = app
        .get_tags(&[("assigned_only", "maybe")], Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
