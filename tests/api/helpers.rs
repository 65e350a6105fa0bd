use recipe_api::{
    app_state::{AppState, RecipeStoreType, UserStoreType},
    services::data_stores::{HashmapRecipeStore, HashmapUserStore},
    utils::constants::{test, AUTH_SCHEME},
    Application,
};
use reqwest::{cookie::Jar, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use test_context::AsyncTestContext;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const DEFAULT_PASSWORD: &str = "password123";

pub struct TestApp {
    pub address: String,
    pub cookie_jar: Arc<Jar>,
    pub http_client: reqwest::Client,
    pub user_store: UserStoreType,
    pub recipe_store: RecipeStoreType,
}

impl TestApp {
    pub async fn new() -> Self {
        let user_store: UserStoreType =
            Arc::new(RwLock::new(HashmapUserStore::default()));
        let recipe_store: RecipeStoreType =
            Arc::new(RwLock::new(HashmapRecipeStore::default()));

        let app_state = AppState::new(user_store.clone(), recipe_store.clone());

        let app = Application::build(app_state, test::APP_ADDRESS)
            .await
            .expect("Failed to build app");
        let address = format!("http://{}", app.address.clone());

        #[allow(clippy::let_underscore_future)]
        let _ = tokio::spawn(app.run());

        let cookie_jar = Arc::new(Jar::default());
        let http_client = reqwest::Client::builder()
            .cookie_provider(cookie_jar.clone())
            .build()
            .unwrap();

        Self {
            address,
            cookie_jar,
            http_client,
            user_store,
            recipe_store,
        }
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, format!("{}{}", &self.address, path));
        match token {
            Some(token) => builder.header(
                reqwest::header::AUTHORIZATION,
                format!("{AUTH_SCHEME} {token}"),
            ),
            None => builder,
        }
    }

    pub async fn post_create_user<Body>(&self, body: &Body) -> Response
    where
        Body: serde::Serialize,
    {
        self.request(Method::POST, "/user/create/", None)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_token<Body>(&self, body: &Body) -> Response
    where
        Body: serde::Serialize,
    {
        self.request(Method::POST, "/user/token/", None)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_me(&self, token: Option<&str>) -> Response {
        self.request(Method::GET, "/user/me/", token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch_me<Body>(&self, body: &Body, token: Option<&str>) -> Response
    where
        Body: serde::Serialize,
    {
        self.request(Method::PATCH, "/user/me/", token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_tags(
        &self,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> Response {
        self.request(Method::GET, "/recipe/tags/", token)
            .query(query)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_tag<Body>(&self, body: &Body, token: Option<&str>) -> Response
    where
        Body: serde::Serialize,
    {
        self.request(Method::POST, "/recipe/tags/", token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_ingredients(
        &self,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> Response {
        self.request(Method::GET, "/recipe/ingredients/", token)
            .query(query)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_ingredient<Body>(
        &self,
        body: &Body,
        token: Option<&str>,
    ) -> Response
    where
        Body: serde::Serialize,
    {
        self.request(Method::POST, "/recipe/ingredients/", token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_recipes(
        &self,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> Response {
        self.request(Method::GET, "/recipe/recipes/", token)
            .query(query)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_recipe<Body>(&self, body: &Body, token: Option<&str>) -> Response
    where
        Body: serde::Serialize,
    {
        self.request(Method::POST, "/recipe/recipes/", token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_recipe(&self, id: i64, token: Option<&str>) -> Response {
        self.request(Method::GET, &format!("/recipe/recipes/{id}/"), token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_recipe<Body>(
        &self,
        id: i64,
        body: &Body,
        token: Option<&str>,
    ) -> Response
    where
        Body: serde::Serialize,
    {
        self.request(Method::PUT, &format!("/recipe/recipes/{id}/"), token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch_recipe<Body>(
        &self,
        id: i64,
        body: &Body,
        token: Option<&str>,
    ) -> Response
    where
        Body: serde::Serialize,
    {
        self.request(Method::PATCH, &format!("/recipe/recipes/{id}/"), token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_recipe(&self, id: i64, token: Option<&str>) -> Response {
        self.request(Method::DELETE, &format!("/recipe/recipes/{id}/"), token)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

impl AsyncTestContext for TestApp {
    async fn setup() -> TestApp {
        TestApp::new().await
    }

    async fn teardown(self) {}
}

pub fn get_random_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}

pub async fn create_user(app: &TestApp, email: &str, password: &str) {
    assert_eq!(
        app.post_create_user(&serde_json::json!({
            "email": email,
            "password": password,
            "name": "Test User"
        }))
        .await
        .status(),
        StatusCode::CREATED,
        "Failed to create user {email}"
    );
}

pub async fn get_token(app: &TestApp, email: &str, password: &str) -> String {
    let response = app
        .post_token(&serde_json::json!({
            "email": email,
            "password": password
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK, "Failed to get token");

    get_json_response_body(response)
        .await
        .get("token")
        .expect("No token in response")
        .as_str()
        .expect("Token should be a string")
        .to_owned()
}

/// Creates a fresh user and returns their token.
pub async fn get_session(app: &TestApp) -> String {
    let email = get_random_email();
    create_user(app, &email, DEFAULT_PASSWORD).await;
    get_token(app, &email, DEFAULT_PASSWORD).await
}

pub async fn add_tag(app: &TestApp, token: &str, name: &str) -> i64 {
    let response = app
        .post_tag(&serde_json::json!({ "name": name }), Some(token))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED, "Failed to add tag {name}");
    read_id(response).await
}

pub async fn add_ingredient(app: &TestApp, token: &str, name: &str) -> i64 {
    let response = app
        .post_ingredient(&serde_json::json!({ "name": name }), Some(token))
        .await;
    assert_eq!(
        response.status(),
        StatusCode::CREATED,
        "Failed to add ingredient {name}"
    );
    read_id(response).await
}

pub async fn add_recipe(app: &TestApp, token: &str, body: &Value) -> i64 {
    let response = app.post_recipe(body, Some(token)).await;
    assert_eq!(
        response.status(),
        StatusCode::CREATED,
        "Failed to add recipe {body}"
    );
    read_id(response).await
}

pub fn sample_recipe(title: &str) -> Value {
    serde_json::json!({
        "title": title,
        "time_minutes": 22,
        "price": "5.25",
        "link": "https://example.com/recipe.pdf"
    })
}

pub async fn read_id(response: Response) -> i64 {
    get_json_response_body(response)
        .await
        .get("id")
        .expect("No id in response")
        .as_i64()
        .expect("id should be an integer")
}

pub async fn get_json_response_body(response: Response) -> Value {
    let body: Value = response
        .json()
        .await
        .expect("failed to parse response body JSON");
    body
}
