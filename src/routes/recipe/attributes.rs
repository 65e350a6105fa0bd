use serde::{Deserialize, Serialize};

use crate::domain::{Ingredient, Tag, ValidationError};

#[derive(Debug, Deserialize)]
pub struct AttributeRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeResponse {
    pub id: i64,
    pub name: String,
}

impl From<Tag> for AttributeResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.as_ref().to_owned(),
        }
    }
}

impl From<Ingredient> for AttributeResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.as_ref().to_owned(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AttributeListQuery {
    pub assigned_only: Option<String>,
}

impl AttributeListQuery {
    /// `assigned_only=1` (or `true`) keeps only rows linked to a recipe.
    pub fn assigned_only(&self) -> Result<bool, ValidationError> {
        match self.assigned_only.as_deref().map(str::trim) {
            None | Some("") | Some("0") => Ok(false),
            Some("1") => Ok(true),
            Some(flag) if flag.eq_ignore_ascii_case("false") => Ok(false),
            Some(flag) if flag.eq_ignore_ascii_case("true") => Ok(true),
            Some(flag) => Err(ValidationError::new(format!(
                "Invalid value for assigned_only: {flag}"
            ))),
        }
    }
}
