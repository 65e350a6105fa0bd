use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    serve::Serve,
    Json, Router,
};

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::error::Error;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

use domain::{AuthAPIError, RecipeAPIError};
pub mod routes;
use crate::utils::{constants::AUTH_SCHEME, tracing::*};
use routes::{
    recipe::{
        create_ingredient, create_recipe, create_tag, delete_recipe,
        get_recipe, list_ingredients, list_recipes, list_tags,
        partial_update_recipe, update_recipe,
    },
    user::{create_token, create_user, get_me, update_me},
};
pub mod app_state;
pub mod domain;
pub mod services;
use app_state::AppState;
pub mod utils;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn unauthorized(message: String) -> Response {
    let mut response =
        (StatusCode::UNAUTHORIZED, Json(ErrorResponse { error: message }))
            .into_response();
    response
        .headers_mut()
        .insert(WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_SCHEME));
    response
}

impl IntoResponse for AuthAPIError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AuthAPIError::UserAlreadyExists => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::CONFLICT, "User already exists".to_string())
            }
            AuthAPIError::ValidationError(e) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, e.as_ref().to_owned())
            }
            AuthAPIError::IncorrectCredentials
            | AuthAPIError::MissingToken
            | AuthAPIError::InvalidToken => {
                log_error_chain(&self, Level::DEBUG);
                return unauthorized(self.to_string());
            }
            AuthAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
        });
        (status, body).into_response()
    }
}

impl IntoResponse for RecipeAPIError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            RecipeAPIError::AuthenticationError(auth_error) => {
                return auth_error.into_response();
            }
            RecipeAPIError::NotFound => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            RecipeAPIError::ValidationError(ref e) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, e.as_ref().to_owned())
            }
            RecipeAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
        });
        (status, body).into_response()
    }
}

fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n-----------------------------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

pub struct Application {
    server: Serve<Router, Router>,
    pub address: String,
}

impl Application {
    pub async fn build(
        app_state: AppState,
        address: &str,
    ) -> Result<Self, Box<dyn Error>> {
        let allowed_origins = [
            "http://localhost:3000".parse()?,
            "http://127.0.0.1:3000".parse()?,
        ];

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_credentials(true)
            .allow_origin(allowed_origins);

        let router = Router::new()
            .route("/user/create/", post(create_user))
            .route("/user/token/", post(create_token))
            .route("/user/me/", get(get_me).patch(update_me))
            .route("/recipe/tags/", get(list_tags).post(create_tag))
            .route(
                "/recipe/ingredients/",
                get(list_ingredients).post(create_ingredient),
            )
            .route("/recipe/recipes/", get(list_recipes).post(create_recipe))
            .route(
                "/recipe/recipes/:id/",
                get(get_recipe)
                    .put(update_recipe)
                    .patch(partial_update_recipe)
                    .delete(delete_recipe),
            )
            .with_state(app_state)
            .layer(cors)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            );

        let listener = tokio::net::TcpListener::bind(address).await?;
        let address = listener.local_addr()?.to_string();
        let server = axum::serve(listener, router);

        Ok(Application { server, address })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", &self.address);
        self.server.with_graceful_shutdown(shutdown_signal()).await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

pub async fn get_postgres_pool(
    url: &Secret<String>,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(utils::constants::prod::MAX_DB_CONNECTIONS)
        .connect(url.expose_secret())
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
