use crate::helpers::{
    create_user, get_json_response_body, get_random_email, TestApp,
    DEFAULT_PASSWORD,
};
use recipe_api::{utils::constants::JWT_COOKIE_NAME, ErrorResponse};
use reqwest::{header::WWW_AUTHENTICATE, StatusCode};
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_200_and_token_for_valid_credentials(app: &mut TestApp) {
    let email = get_random_email();
    create_user(app, &email, DEFAULT_PASSWORD).await;

    let schema = json!({
      "$schema": "http://json-schema.org/draft-04/schema#",
      "type": "object",
      "properties": {
        "token": {
          "type": "string",
          "minLength": 1
        }
      },
      "required": ["token"]
    });

    let response = app
        .post_token(&json!({
            "email": email,
            "password": DEFAULT_PASSWORD
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let auth_cookie = response
        .cookies()
        .find(|cookie| cookie.name() == JWT_COOKIE_NAME)
        .expect("No auth cookie found");
    assert!(!auth_cookie.value().is_empty());

    let response_body = get_json_response_body(response).await;
    assert!(
        jsonschema::is_valid(&schema, &response_body),
        "response does not match schema"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_accept_email_in_any_case(app: &mut TestApp) {
    let email = get_random_email();
    create_user(app, &email, DEFAULT_PASSWORD).await;

    let response = app
        .post_token(&json!({
            "email": email.to_uppercase(),
            "password": DEFAULT_PASSWORD
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_for_bad_credentials(app: &mut TestApp) {
    let email = get_random_email();
    create_user(app, &email, DEFAULT_PASSWORD).await;

    let test_cases = [
        json!({"email": email, "password": "wrongpass123"}),
        json!({"email": get_random_email(), "password": DEFAULT_PASSWORD}),
    ];

    for body in test_cases.iter() {
        let response = app.post_token(body).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "Should fail with HTTP401 for input: {body}"
        );
        assert!(response.headers().contains_key(WWW_AUTHENTICATE));
        assert!(
            response.cookies().all(|c| c.name() != JWT_COOKIE_NAME),
            "No token should be issued for input: {body}"
        );
        assert_eq!(
            response.json::<ErrorResponse>().await.unwrap().error,
            "Invalid credentials"
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_blank_password(app: &mut TestApp) {
    let email = get_random_email();
    create_user(app, &email, DEFAULT_PASSWORD).await;

    let response = app
        .post_token(&json!({"email": email, "password": ""}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_422_if_malformed_input(app: &mut TestApp) {
    let test_cases = [
        json!({"email": get_random_email()}),
        json!({"password": DEFAULT_PASSWORD}),
    ];

    for body in test_cases.iter() {
        let response = app.post_token(body).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "Failed for input: {body}"
        );
    }
}
