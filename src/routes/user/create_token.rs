use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{AuthAPIError, Email, UserStoreError, ValidationError},
    utils::auth::{create_auth_cookie, generate_auth_token},
};

#[tracing::instrument(name = "Create token route handler", skip_all)]
pub async fn create_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<TokenRequest>,
) -> Result<(StatusCode, CookieJar, Json<TokenResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(request.email))?;
    if request.password.expose_secret().is_empty() {
        return Err(ValidationError::new(
            "Password cannot be empty".to_owned(),
        )
        .into());
    }

    let user = state
        .user_store
        .read()
        .await
        .validate_user(&email, &request.password)
        .await
        .map_err(|e| match e {
            UserStoreError::InvalidCredentials
            | UserStoreError::UserNotFound => {
                AuthAPIError::IncorrectCredentials
            }
            e => AuthAPIError::UnexpectedError(eyre!(e)),
        })?;

    let token = generate_auth_token(&user.id)
        .map_err(AuthAPIError::UnexpectedError)?;
    let updated_jar = jar.add(create_auth_cookie(&token));

    let response = Json(TokenResponse {
        token: token.expose_secret().to_owned(),
    });

    Ok((StatusCode::OK, updated_jar, response))
}

#[derive(Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: Secret<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
