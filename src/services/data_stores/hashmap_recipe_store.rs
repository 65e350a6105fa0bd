use std::collections::HashSet;

use crate::domain::{
    AttributeName, Ingredient, Recipe, RecipeDraft, RecipeFilter, RecipeStore,
    RecipeStoreError, Tag, UserId,
};

/// Rows are kept in insertion order, so vectors are already sorted by id.
#[derive(Default)]
pub struct HashmapRecipeStore {
    tags: Vec<Tag>,
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
    last_id: i64,
}

impl HashmapRecipeStore {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn owned_recipes<'a>(
        &'a self,
        user_id: &'a UserId,
    ) -> impl Iterator<Item = &'a Recipe> + 'a {
        self.recipes.iter().filter(move |r| &r.user_id == user_id)
    }

    fn check_links(
        &self,
        user_id: &UserId,
        draft: &RecipeDraft,
    ) -> Result<(), RecipeStoreError> {
        for tag_id in &draft.tags {
            if !self
                .tags
                .iter()
                .any(|t| &t.user_id == user_id && t.id == *tag_id)
            {
                return Err(RecipeStoreError::UnknownTag(*tag_id));
            }
        }
        for ingredient_id in &draft.ingredients {
            if !self
                .ingredients
                .iter()
                .any(|i| &i.user_id == user_id && i.id == *ingredient_id)
            {
                return Err(RecipeStoreError::UnknownIngredient(
                    *ingredient_id,
                ));
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecipeStore for HashmapRecipeStore {
    async fn add_tag(
        &mut self,
        user_id: &UserId,
        name: &AttributeName,
    ) -> Result<Tag, RecipeStoreError> {
        let tag = Tag {
            id: self.next_id(),
            user_id: *user_id,
            name: name.clone(),
        };
        self.tags.push(tag.clone());
        Ok(tag)
    }

    async fn get_tags(
        &self,
        user_id: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Tag>, RecipeStoreError> {
        let assigned: HashSet<i64> = self
            .owned_recipes(user_id)
            .flat_map(|r| r.tags.iter().copied())
            .collect();

        let mut tags: Vec<Tag> = self
            .tags
            .iter()
            .filter(|t| &t.user_id == user_id)
            .filter(|t| !assigned_only || assigned.contains(&t.id))
            .cloned()
            .collect();
        tags.sort_by(|a, b| b.name.as_ref().cmp(a.name.as_ref()));
        Ok(tags)
    }

    async fn add_ingredient(
        &mut self,
        user_id: &UserId,
        name: &AttributeName,
    ) -> Result<Ingredient, RecipeStoreError> {
        let ingredient = Ingredient {
            id: self.next_id(),
            user_id: *user_id,
            name: name.clone(),
        };
        self.ingredients.push(ingredient.clone());
        Ok(ingredient)
    }

    async fn get_ingredients(
        &self,
        user_id: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, RecipeStoreError> {
        let assigned: HashSet<i64> = self
            .owned_recipes(user_id)
            .flat_map(|r| r.ingredients.iter().copied())
            .collect();

        Ok(self
            .ingredients
            .iter()
            .filter(|i| &i.user_id == user_id)
            .filter(|i| !assigned_only || assigned.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn add_recipe(
        &mut self,
        user_id: &UserId,
        draft: RecipeDraft,
    ) -> Result<Recipe, RecipeStoreError> {
        self.check_links(user_id, &draft)?;
        let id = self.next_id();
        let recipe = draft.into_recipe(id, *user_id);
        self.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn get_recipes(
        &self,
        user_id: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeStoreError> {
        Ok(self
            .owned_recipes(user_id)
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn get_recipe(
        &self,
        user_id: &UserId,
        recipe_id: i64,
    ) -> Result<Recipe, RecipeStoreError> {
        self.owned_recipes(user_id)
            .find(|r| r.id == recipe_id)
            .cloned()
            .ok_or(RecipeStoreError::RecipeNotFound)
    }

    async fn update_recipe(
        &mut self,
        user_id: &UserId,
        recipe_id: i64,
        draft: RecipeDraft,
    ) -> Result<Recipe, RecipeStoreError> {
        self.check_links(user_id, &draft)?;
        let position = self
            .recipes
            .iter()
            .position(|r| &r.user_id == user_id && r.id == recipe_id)
            .ok_or(RecipeStoreError::RecipeNotFound)?;

        let recipe = draft.into_recipe(recipe_id, *user_id);
        self.recipes[position] = recipe.clone();
        Ok(recipe)
    }

    async fn delete_recipe(
        &mut self,
        user_id: &UserId,
        recipe_id: i64,
    ) -> Result<(), RecipeStoreError> {
        let before = self.recipes.len();
        self.recipes
            .retain(|r| !(&r.user_id == user_id && r.id == recipe_id));

        if self.recipes.len() == before {
            return Err(RecipeStoreError::RecipeNotFound);
        }
        Ok(())
    }
}
