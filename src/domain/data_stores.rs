use super::{
    AttributeName, Email, Ingredient, Recipe, RecipeDraft, Tag, User, UserId,
};
use color_eyre::eyre::Report;
use secrecy::Secret;
use thiserror::Error;

#[async_trait::async_trait]
pub trait UserStore {
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError>;
    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError>;
    async fn get_user_by_id(
        &self,
        id: &UserId,
    ) -> Result<User, UserStoreError>;
    /// Replaces the stored row that has `user.id`.
    async fn update_user(&mut self, user: &User)
        -> Result<(), UserStoreError>;
    /// Returns the active user whose password matches `password`.
    async fn validate_user(
        &self,
        email: &Email,
        password: &Secret<String>,
    ) -> Result<User, UserStoreError>;
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UserAlreadyExists, Self::UserAlreadyExists)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::InvalidCredentials, Self::InvalidCredentials)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Narrows a recipe listing. A recipe passes a list filter when it is
/// linked to at least one of the listed ids; `None` disables the filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<i64>>,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        fn any_of(wanted: &Option<Vec<i64>>, linked: &[i64]) -> bool {
            match wanted {
                Some(ids) => ids.iter().any(|id| linked.contains(id)),
                None => true,
            }
        }

        any_of(&self.tags, &recipe.tags)
            && any_of(&self.ingredients, &recipe.ingredients)
    }
}

/// Tags, ingredients and recipes. Every operation is scoped to the
/// owning user: rows of other users are invisible, never an error.
#[async_trait::async_trait]
pub trait RecipeStore {
    async fn add_tag(
        &mut self,
        user_id: &UserId,
        name: &AttributeName,
    ) -> Result<Tag, RecipeStoreError>;
    /// Ordered by name, descending, comparing code points (so case
    /// sensitive: "apple" sorts above "Banana").
    async fn get_tags(
        &self,
        user_id: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Tag>, RecipeStoreError>;

    async fn add_ingredient(
        &mut self,
        user_id: &UserId,
        name: &AttributeName,
    ) -> Result<Ingredient, RecipeStoreError>;
    /// Ordered by id.
    async fn get_ingredients(
        &self,
        user_id: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, RecipeStoreError>;

    async fn add_recipe(
        &mut self,
        user_id: &UserId,
        draft: RecipeDraft,
    ) -> Result<Recipe, RecipeStoreError>;
    /// Ordered by id.
    async fn get_recipes(
        &self,
        user_id: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeStoreError>;
    async fn get_recipe(
        &self,
        user_id: &UserId,
        recipe_id: i64,
    ) -> Result<Recipe, RecipeStoreError>;
    async fn update_recipe(
        &mut self,
        user_id: &UserId,
        recipe_id: i64,
        draft: RecipeDraft,
    ) -> Result<Recipe, RecipeStoreError>;
    async fn delete_recipe(
        &mut self,
        user_id: &UserId,
        recipe_id: i64,
    ) -> Result<(), RecipeStoreError>;
}

#[derive(Debug, Error)]
pub enum RecipeStoreError {
    #[error("Recipe not found")]
    RecipeNotFound,
    #[error("Unknown tag: {0}")]
    UnknownTag(i64),
    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(i64),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for RecipeStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::RecipeNotFound, Self::RecipeNotFound) => true,
            (Self::UnknownTag(a), Self::UnknownTag(b)) => a == b,
            (Self::UnknownIngredient(a), Self::UnknownIngredient(b)) => {
                a == b
            }
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}
