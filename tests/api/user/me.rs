use crate::helpers::{
    create_user, get_random_email, get_session, get_token, TestApp,
    DEFAULT_PASSWORD,
};
use recipe_api::{routes::user::UserResponse, ErrorResponse};
use reqwest::{header::WWW_AUTHENTICATE, StatusCode};
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_without_credentials(app: &mut TestApp) {
    let response = app.get_me(None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(WWW_AUTHENTICATE)
            .expect("401 should carry WWW-Authenticate")
            .to_str()
            .unwrap(),
        "Token"
    );
    assert_eq!(
        response.json::<ErrorResponse>().await.unwrap().error,
        "Authentication credentials were not provided"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_for_invalid_token(app: &mut TestApp) {
    for token in ["not-a-jwt", "eyJhbGciOiJIUzI1NiJ9.e30.invalid"] {
        let response = app.get_me(Some(token)).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "Should reject token: {token}"
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_profile_for_authenticated_user(app: &mut TestApp) {
    let email = get_random_email();
    create_user(app, &email, DEFAULT_PASSWORD).await;
    let token = get_token(app, &email, DEFAULT_PASSWORD).await;

    let response = app.get_me(Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<UserResponse>().await.unwrap(),
        UserResponse {
            email,
            name: "Test User".to_owned(),
        }
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_authenticate_with_cookie(app: &mut TestApp) {
    let _token = get_session(app).await;

    let response = app.get_me(None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_update_name_and_password(app: &mut TestApp) {
    let email = get_random_email();
    create_user(app, &email, DEFAULT_PASSWORD).await;
    let token = get_token(app, &email, DEFAULT_PASSWORD).await;

    let response = app
        .patch_me(
            &json!({"name": "Updated Name", "password": "newpassword123"}),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<UserResponse>().await.unwrap().name,
        "Updated Name"
    );

    let old_login = app
        .post_token(&json!({"email": email, "password": DEFAULT_PASSWORD}))
        .await;
    assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);

    let _token = get_token(app, &email, "newpassword123").await;
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_reject_short_password_update(app: &mut TestApp) {
    let token = get_session(app).await;

    let response = app
        .patch_me(&json!({"password": "short"}), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_keep_both_concurrent_updates(app: &mut TestApp) {
    let app = &*app;

    for round in 0..3 {
        let email = get_random_email();
        create_user(app, &email, DEFAULT_PASSWORD).await;
        let token = get_token(app, &email, DEFAULT_PASSWORD).await;

        let name = format!("Renamed {round}");
        let name_body = json!({ "name": name });
        let password_body = json!({"password": "newpassword123"});
        let (renamed, repassworded) = tokio::join!(
            app.patch_me(&name_body, Some(&token)),
            app.patch_me(&password_body, Some(&token)),
        );
        assert_eq!(renamed.status(), StatusCode::OK);
        assert_eq!(repassworded.status(), StatusCode::OK);

        let profile = app
            .get_me(Some(&token))
            .await
            .json::<UserResponse>()
            .await
            .unwrap();
        assert_eq!(profile.name, name, "Name update was lost in round {round}");

        let old_login = app
            .post_token(&json!({"email": email, "password": DEFAULT_PASSWORD}))
            .await;
        assert_eq!(
            old_login.status(),
            StatusCode::UNAUTHORIZED,
            "Password update was lost in round {round}"
        );
        let _token = get_token(app, &email, "newpassword123").await;
    }
}
