use rust_decimal::Decimal;
use serde::Serialize;

use super::{UserId, ValidationError};

pub const MAX_TITLE_CHARS: usize = 255;
pub const MAX_LINK_CHARS: usize = 255;
/// Prices are stored as NUMERIC(5, 2).
pub const PRICE_MAX_DIGITS: u32 = 5;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: i64,
    pub user_id: UserId,
    pub title: RecipeTitle,
    pub time_minutes: TimeMinutes,
    pub price: Price,
    pub link: RecipeLink,
    pub tags: Vec<i64>,
    pub ingredients: Vec<i64>,
}

impl std::fmt::Display for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.title.fmt(f)
    }
}

/// Validated fields of a recipe that has not been given an id yet.
/// Used for both creation and full replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub title: RecipeTitle,
    pub time_minutes: TimeMinutes,
    pub price: Price,
    pub link: RecipeLink,
    pub tags: Vec<i64>,
    pub ingredients: Vec<i64>,
}

impl RecipeDraft {
    pub fn into_recipe(self, id: i64, user_id: UserId) -> Recipe {
        Recipe {
            id,
            user_id,
            title: self.title,
            time_minutes: self.time_minutes,
            price: self.price,
            link: self.link,
            tags: dedup(self.tags),
            ingredients: dedup(self.ingredients),
        }
    }
}

impl From<Recipe> for RecipeDraft {
    fn from(recipe: Recipe) -> Self {
        Self {
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags: recipe.tags,
            ingredients: recipe.ingredients,
        }
    }
}

/// Sorted, without duplicates.
pub fn dedup(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeTitle(String);

impl RecipeTitle {
    pub fn parse(title: String) -> Result<Self, ValidationError> {
        match title.chars().count() {
            0 => Err(ValidationError::new(
                "Title cannot be empty".to_owned(),
            )),
            x if x > MAX_TITLE_CHARS => Err(ValidationError::new(format!(
                "Max title length is {} characters",
                MAX_TITLE_CHARS
            ))),
            _ => Ok(Self(title)),
        }
    }
}

impl AsRef<String> for RecipeTitle {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

impl std::fmt::Display for RecipeTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeMinutes(i32);

impl TimeMinutes {
    pub fn parse(minutes: i32) -> Result<Self, ValidationError> {
        if minutes < 0 {
            return Err(ValidationError::new(
                "Time in minutes cannot be negative".to_owned(),
            ));
        }
        Ok(Self(minutes))
    }

    pub fn value_of(&self) -> i32 {
        self.0
    }
}

/// Non-negative amount with at most 5 digits, 2 of them after the point.
/// Always held at scale 2 so it renders as e.g. `"5.00"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Price(Decimal);

impl Price {
    pub fn parse(amount: Decimal) -> Result<Self, ValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::new(
                "Price cannot be negative".to_owned(),
            ));
        }

        if amount.normalize().scale() > PRICE_DECIMAL_PLACES {
            return Err(ValidationError::new(format!(
                "Ensure that there are no more than {} decimal places",
                PRICE_DECIMAL_PLACES
            )));
        }

        let limit =
            Decimal::from(10_i64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES));
        if amount >= limit {
            return Err(ValidationError::new(format!(
                "Ensure that there are no more than {} digits in total",
                PRICE_MAX_DIGITS
            )));
        }

        let mut amount = amount.abs();
        amount.rescale(PRICE_DECIMAL_PLACES);
        Ok(Self(amount))
    }
}

impl AsRef<Decimal> for Price {
    fn as_ref(&self) -> &Decimal {
        &self.0
    }
}

/// Optional external link to the recipe; empty when unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeLink(String);

impl RecipeLink {
    pub fn parse(link: String) -> Result<Self, ValidationError> {
        if link.chars().count() > MAX_LINK_CHARS {
            return Err(ValidationError::new(format!(
                "Max link length is {} characters",
                MAX_LINK_CHARS
            )));
        }
        Ok(Self(link))
    }
}

impl AsRef<String> for RecipeLink {
    fn as_ref(&self) -> &String {
        &self.0
    }
}
