use axum::{extract::State, http::StatusCode, Json};
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{AuthAPIError, Password, User, UserName, UserStoreError},
};

#[tracing::instrument(name = "Create user route handler", skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthAPIError> {
    let password = Password::parse(request.password)?;
    let name = UserName::parse(request.name)?;

    let user = User::create_user(
        Some(Secret::new(request.email)),
        password.as_ref().to_owned(),
    )
    .await?
    .with_name(name);
    let response = UserResponse::from(&user);

    state
        .user_store
        .write()
        .await
        .add_user(user)
        .await
        .map_err(|e| match e {
            UserStoreError::UserAlreadyExists => {
                AuthAPIError::UserAlreadyExists
            }
            e => AuthAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: Secret<String>,
    #[serde(default)]
    pub name: String,
}

/// Public view of an account. Never includes the password hash.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.as_ref().expose_secret().to_owned(),
            name: user.name.as_ref().to_owned(),
        }
    }
}
