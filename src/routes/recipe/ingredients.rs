use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::{AttributeListQuery, AttributeRequest, AttributeResponse};
use crate::{
    app_state::AppState,
    domain::{AttributeName, RecipeAPIError},
    utils::auth::AuthenticatedUser,
};

#[tracing::instrument(name = "List ingredients route handler", skip_all)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<AttributeListQuery>,
) -> Result<(StatusCode, Json<Vec<AttributeResponse>>), RecipeAPIError> {
    let assigned_only = query.assigned_only()?;

    let ingredients = state
        .recipe_store
        .read()
        .await
        .get_ingredients(&user.id, assigned_only)
        .await?;

    let response = ingredients
        .into_iter()
        .map(AttributeResponse::from)
        .collect();
    Ok((StatusCode::OK, Json(response)))
}

#[tracing::instrument(name = "Create ingredient route handler", skip_all)]
pub async fn create_ingredient(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<AttributeRequest>,
) -> Result<(StatusCode, Json<AttributeResponse>), RecipeAPIError> {
    let name = AttributeName::parse(request.name)?;

    let ingredient = state
        .recipe_store
        .write()
        .await
        .add_ingredient(&user.id, &name)
        .await?;

    Ok((StatusCode::CREATED, Json(AttributeResponse::from(ingredient))))
}
