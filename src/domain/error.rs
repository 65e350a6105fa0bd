use color_eyre::eyre::Report;
use thiserror::Error;

use super::RecipeStoreError;

#[derive(Debug, Error)]
pub enum AuthAPIError {
    #[error("Invalid credentials")]
    IncorrectCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Authentication credentials were not provided")]
    MissingToken,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("Validation error")]
    ValidationError(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum RecipeAPIError {
    #[error("Authentication error")]
    AuthenticationError(#[from] AuthAPIError),
    #[error("Not found")]
    NotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
    #[error("Validation error")]
    ValidationError(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: String) -> Self {
        Self(message)
    }

    pub fn as_ref(&self) -> &String {
        &self.0
    }
}

/// Failure modes of the model-level user factory.
#[derive(Debug, Error)]
pub enum UserCreationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to hash password")]
    UnexpectedError(#[source] Report),
}

impl From<UserCreationError> for AuthAPIError {
    fn from(e: UserCreationError) -> Self {
        match e {
            UserCreationError::Validation(e) => Self::ValidationError(e),
            UserCreationError::UnexpectedError(report) => {
                Self::UnexpectedError(report)
            }
        }
    }
}

impl From<RecipeStoreError> for RecipeAPIError {
    fn from(e: RecipeStoreError) -> Self {
        match e {
            RecipeStoreError::RecipeNotFound => Self::NotFound,
            RecipeStoreError::UnknownTag(id) => Self::ValidationError(
                ValidationError::new(format!("Invalid tag ID: {id}")),
            ),
            RecipeStoreError::UnknownIngredient(id) => Self::ValidationError(
                ValidationError::new(format!("Invalid ingredient ID: {id}")),
            ),
            RecipeStoreError::UnexpectedError(report) => {
                Self::UnexpectedError(report)
            }
        }
    }
}
