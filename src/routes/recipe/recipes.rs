use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AttributeResponse;
use crate::{
    app_state::AppState,
    domain::{
        Price, Recipe, RecipeAPIError, RecipeDraft, RecipeFilter, RecipeLink,
        RecipeTitle, TimeMinutes, ValidationError,
    },
    utils::auth::AuthenticatedUser,
};

#[tracing::instrument(name = "List recipes route handler", skip_all)]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<RecipeListQuery>,
) -> Result<(StatusCode, Json<Vec<RecipeResponse>>), RecipeAPIError> {
    let filter = query.to_filter()?;

    let recipes = state
        .recipe_store
        .read()
        .await
        .get_recipes(&user.id, &filter)
        .await?;

    let response = recipes.into_iter().map(RecipeResponse::from).collect();
    Ok((StatusCode::OK, Json(response)))
}

#[tracing::instrument(name = "Create recipe route handler", skip_all)]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), RecipeAPIError> {
    let draft = RecipeDraft::try_from(request)?;

    let recipe = state
        .recipe_store
        .write()
        .await
        .add_recipe(&user.id, draft)
        .await?;

    Ok((StatusCode::CREATED, Json(RecipeResponse::from(recipe))))
}

#[tracing::instrument(name = "Get recipe route handler", skip_all)]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(recipe_id): Path<i64>,
) -> Result<(StatusCode, Json<RecipeDetailResponse>), RecipeAPIError> {
    let store = state.recipe_store.read().await;

    let recipe = store.get_recipe(&user.id, recipe_id).await?;
    let tags = store
        .get_tags(&user.id, false)
        .await?
        .into_iter()
        .filter(|tag| recipe.tags.contains(&tag.id))
        .map(AttributeResponse::from);
    let ingredients = store
        .get_ingredients(&user.id, false)
        .await?
        .into_iter()
        .filter(|ingredient| recipe.ingredients.contains(&ingredient.id))
        .map(AttributeResponse::from);

    let mut tags: Vec<AttributeResponse> = tags.collect();
    tags.sort_by_key(|tag| tag.id);

    let response = RecipeDetailResponse {
        id: recipe.id,
        title: recipe.title.as_ref().to_owned(),
        time_minutes: recipe.time_minutes.value_of(),
        price: *recipe.price.as_ref(),
        link: recipe.link.as_ref().to_owned(),
        tags,
        ingredients: ingredients.collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

#[tracing::instrument(name = "Update recipe route handler", skip_all)]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(recipe_id): Path<i64>,
    Json(request): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), RecipeAPIError> {
    let draft = RecipeDraft::try_from(request)?;

    let recipe = state
        .recipe_store
        .write()
        .await
        .update_recipe(&user.id, recipe_id, draft)
        .await?;

    Ok((StatusCode::OK, Json(RecipeResponse::from(recipe))))
}

#[tracing::instrument(name = "Partial update recipe route handler", skip_all)]
pub async fn partial_update_recipe(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(recipe_id): Path<i64>,
    Json(request): Json<PartialRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), RecipeAPIError> {
    let mut store = state.recipe_store.write().await;

    let existing = store.get_recipe(&user.id, recipe_id).await?;
    let draft = request.apply_to(RecipeDraft::from(existing))?;
    let recipe = store.update_recipe(&user.id, recipe_id, draft).await?;

    Ok((StatusCode::OK, Json(RecipeResponse::from(recipe))))
}

#[tracing::instrument(name = "Delete recipe route handler", skip_all)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode, RecipeAPIError> {
    state
        .recipe_store
        .write()
        .await
        .delete_recipe(&user.id, recipe_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Body of create and full update. Omitted links and link lists are
/// cleared on a full update.
#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub tags: Vec<i64>,
    #[serde(default)]
    pub ingredients: Vec<i64>,
}

impl TryFrom<RecipeRequest> for RecipeDraft {
    type Error = ValidationError;

    fn try_from(request: RecipeRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: RecipeTitle::parse(request.title)?,
            time_minutes: TimeMinutes::parse(request.time_minutes)?,
            price: Price::parse(request.price)?,
            link: RecipeLink::parse(request.link)?,
            tags: request.tags,
            ingredients: request.ingredients,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialRecipeRequest {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<i64>>,
}

impl PartialRecipeRequest {
    pub fn apply_to(
        self,
        mut draft: RecipeDraft,
    ) -> Result<RecipeDraft, ValidationError> {
        if let Some(title) = self.title {
            draft.title = RecipeTitle::parse(title)?;
        }
        if let Some(minutes) = self.time_minutes {
            draft.time_minutes = TimeMinutes::parse(minutes)?;
        }
        if let Some(price) = self.price {
            draft.price = Price::parse(price)?;
        }
        if let Some(link) = self.link {
            draft.link = RecipeLink::parse(link)?;
        }
        if let Some(tags) = self.tags {
            draft.tags = tags;
        }
        if let Some(ingredients) = self.ingredients {
            draft.ingredients = ingredients;
        }
        Ok(draft)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

impl RecipeListQuery {
    pub fn to_filter(&self) -> Result<RecipeFilter, ValidationError> {
        Ok(RecipeFilter {
            tags: parse_ids(self.tags.as_deref(), "tags")?,
            ingredients: parse_ids(self.ingredients.as_deref(), "ingredients")?,
        })
    }
}

/// Parses a comma separated id list such as `1,2,3`. A missing or blank
/// list disables the filter.
fn parse_ids(
    raw: Option<&str>,
    field: &str,
) -> Result<Option<Vec<i64>>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<i64>().map_err(|_| {
                ValidationError::new(format!("Invalid ID in {field}: {id}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((!ids.is_empty()).then_some(ids))
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<i64>,
    pub ingredients: Vec<i64>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.as_ref().to_owned(),
            time_minutes: recipe.time_minutes.value_of(),
            price: *recipe.price.as_ref(),
            link: recipe.link.as_ref().to_owned(),
            tags: recipe.tags,
            ingredients: recipe.ingredients,
        }
    }
}

/// Recipe with its tags and ingredients expanded.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetailResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<AttributeResponse>,
    pub ingredients: Vec<AttributeResponse>,
}
