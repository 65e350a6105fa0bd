use axum::{extract::State, http::StatusCode, Json};
use color_eyre::eyre::eyre;
use secrecy::Secret;
use serde::Deserialize;

use super::UserResponse;
use crate::{
    app_state::AppState,
    domain::{
        AuthAPIError, Password, UserName, UserPasswordHash, UserStoreError,
    },
    utils::auth::AuthenticatedUser,
};

#[tracing::instrument(name = "Get profile route handler", skip_all)]
pub async fn get_me(
    AuthenticatedUser(user): AuthenticatedUser,
) -> (StatusCode, Json<UserResponse>) {
    (StatusCode::OK, Json(UserResponse::from(&user)))
}

#[tracing::instrument(name = "Update profile route handler", skip_all)]
pub async fn update_me(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<UpdateMeRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthAPIError> {
    let name = request.name.map(UserName::parse).transpose()?;

    // Hashing is slow, so it happens before the store is locked.
    let hash = match request.password {
        Some(password) => {
            let password = Password::parse(password)?;
            let hash = UserPasswordHash::compute(password.as_ref().to_owned())
                .await
                .map_err(AuthAPIError::UnexpectedError)?;
            Some(hash)
        }
        None => None,
    };

    // Re-read under the write lock so concurrent updates to other fields
    // are not overwritten with the copy loaded during authentication.
    let mut user_store = state.user_store.write().await;
    let mut current =
        user_store.get_user_by_id(&user.id).await.map_err(|e| match e {
            UserStoreError::UserNotFound => AuthAPIError::InvalidToken,
            e => AuthAPIError::UnexpectedError(eyre!(e)),
        })?;

    if let Some(name) = name {
        current = current.with_name(name);
    }
    if let Some(hash) = hash {
        current = current.with_password_hash(hash);
    }

    user_store
        .update_user(&current)
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    Ok((StatusCode::OK, Json(UserResponse::from(&current))))
}

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub password: Option<Secret<String>>,
}
