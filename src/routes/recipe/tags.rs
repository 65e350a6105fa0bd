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

#[tracing::instrument(name = "List tags route handler", skip_all)]
pub async fn list_tags(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<AttributeListQuery>,
) -> Result<(StatusCode, Json<Vec<AttributeResponse>>), RecipeAPIError> {
    let assigned_only = query.assigned_only()?;

    let tags = state
        .recipe_store
        .read()
        .await
        .get_tags(&user.id, assigned_only)
        .await?;

    let response = tags.into_iter().map(AttributeResponse::from).collect();
    Ok((StatusCode::OK, Json(response)))
}

#[tracing::instrument(name = "Create tag route handler", skip_all)]
pub async fn create_tag(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<AttributeRequest>,
) -> Result<(StatusCode, Json<AttributeResponse>), RecipeAPIError> {
    let name = AttributeName::parse(request.name)?;

    let tag = state
        .recipe_store
        .write()
        .await
        .add_tag(&user.id, &name)
        .await?;

    Ok((StatusCode::CREATED, Json(AttributeResponse::from(tag))))
}
