use std::collections::HashMap;

use color_eyre::eyre::eyre;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{
    AttributeName, Ingredient, Price, Recipe, RecipeDraft, RecipeFilter,
    RecipeLink, RecipeStore, RecipeStoreError, RecipeTitle, Tag, TimeMinutes,
    UserId,
};

pub struct PostgresRecipeStore {
    pool: PgPool,
}

impl PostgresRecipeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unexpected<E>(e: E) -> RecipeStoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    RecipeStoreError::UnexpectedError(eyre!(e))
}

#[derive(sqlx::FromRow)]
struct AttributeRow {
    id: i64,
    user_id: uuid::Uuid,
    name: String,
}

impl AttributeRow {
    fn into_parts(
        self,
    ) -> Result<(i64, UserId, AttributeName), RecipeStoreError> {
        let name = AttributeName::parse(self.name).map_err(unexpected)?;
        Ok((self.id, UserId::new(self.user_id), name))
    }
}

#[derive(sqlx::FromRow)]
struct RecipeRow {
    id: i64,
    user_id: uuid::Uuid,
    title: String,
    time_minutes: i32,
    price: Decimal,
    link: String,
}

impl RecipeRow {
    fn into_recipe(
        self,
        tags: Vec<i64>,
        ingredients: Vec<i64>,
    ) -> Result<Recipe, RecipeStoreError> {
        Ok(Recipe {
            id: self.id,
            user_id: UserId::new(self.user_id),
            title: RecipeTitle::parse(self.title).map_err(unexpected)?,
            time_minutes: TimeMinutes::parse(self.time_minutes)
                .map_err(unexpected)?,
            price: Price::parse(self.price).map_err(unexpected)?,
            link: RecipeLink::parse(self.link).map_err(unexpected)?,
            tags,
            ingredients,
        })
    }
}

/// `(recipe_id, linked_id)` pairs grouped by recipe, each group sorted.
fn group_links(rows: Vec<(i64, i64)>) -> HashMap<i64, Vec<i64>> {
    let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
    for (recipe_id, linked_id) in rows {
        grouped.entry(recipe_id).or_default().push(linked_id);
    }
    for ids in grouped.values_mut() {
        ids.sort_unstable();
    }
    grouped
}

impl PostgresRecipeStore {
    #[tracing::instrument(name = "Checking recipe links in PostgreSQL", skip_all)]
    async fn check_links(
        &self,
        user_id: &UserId,
        draft: &RecipeDraft,
    ) -> Result<(), RecipeStoreError> {
        let owned_tags: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM tags WHERE user_id = $1 AND id = ANY($2)",
        )
        .bind(user_id.as_ref())
        .bind(&draft.tags)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        if let Some(missing) =
            draft.tags.iter().find(|id| !owned_tags.contains(id))
        {
            return Err(RecipeStoreError::UnknownTag(*missing));
        }

        let owned_ingredients: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM ingredients WHERE user_id = $1 AND id = ANY($2)",
        )
        .bind(user_id.as_ref())
        .bind(&draft.ingredients)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        if let Some(missing) = draft
            .ingredients
            .iter()
            .find(|id| !owned_ingredients.contains(id))
        {
            return Err(RecipeStoreError::UnknownIngredient(*missing));
        }

        Ok(())
    }

    async fn replace_links(
        tx: &mut Transaction<'_, Postgres>,
        recipe: &Recipe,
    ) -> Result<(), RecipeStoreError> {
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(recipe.id)
            .execute(&mut **tx)
            .await
            .map_err(unexpected)?;
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe.id)
            .execute(&mut **tx)
            .await
            .map_err(unexpected)?;

        sqlx::query(
            r#"
            INSERT INTO recipe_tags (recipe_id, tag_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(recipe.id)
        .bind(&recipe.tags)
        .execute(&mut **tx)
        .await
        .map_err(unexpected)?;
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(recipe.id)
        .bind(&recipe.ingredients)
        .execute(&mut **tx)
        .await
        .map_err(unexpected)?;

        Ok(())
    }

    async fn load_recipes(
        &self,
        rows: Vec<RecipeRow>,
    ) -> Result<Vec<Recipe>, RecipeStoreError> {
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

        let mut tags = group_links(
            sqlx::query_as(
                "SELECT recipe_id, tag_id FROM recipe_tags WHERE recipe_id = ANY($1)",
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?,
        );
        let mut ingredients = group_links(
            sqlx::query_as(
                "SELECT recipe_id, ingredient_id FROM recipe_ingredients WHERE recipe_id = ANY($1)",
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?,
        );

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row.into_recipe(
                    tags.remove(&id).unwrap_or_default(),
                    ingredients.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl RecipeStore for PostgresRecipeStore {
    #[tracing::instrument(name = "Adding tag to PostgreSQL", skip_all)]
    async fn add_tag(
        &mut self,
        user_id: &UserId,
        name: &AttributeName,
    ) -> Result<Tag, RecipeStoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO tags (user_id, name) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id.as_ref())
        .bind(name.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(Tag {
            id,
            user_id: *user_id,
            name: name.clone(),
        })
    }

    #[tracing::instrument(name = "Getting tags from PostgreSQL", skip_all)]
    async fn get_tags(
        &self,
        user_id: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Tag>, RecipeStoreError> {
        let rows: Vec<AttributeRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, name
            FROM tags
            WHERE user_id = $1
              AND (NOT $2 OR EXISTS (
                  SELECT 1 FROM recipe_tags WHERE recipe_tags.tag_id = tags.id
              ))
            ORDER BY name COLLATE "C" DESC
            "#,
        )
        .bind(user_id.as_ref())
        .bind(assigned_only)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        rows.into_iter()
            .map(|row| {
                let (id, user_id, name) = row.into_parts()?;
                Ok(Tag { id, user_id, name })
            })
            .collect()
    }

    #[tracing::instrument(name = "Adding ingredient to PostgreSQL", skip_all)]
    async fn add_ingredient(
        &mut self,
        user_id: &UserId,
        name: &AttributeName,
    ) -> Result<Ingredient, RecipeStoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO ingredients (user_id, name) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id.as_ref())
        .bind(name.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(Ingredient {
            id,
            user_id: *user_id,
            name: name.clone(),
        })
    }

    #[tracing::instrument(name = "Getting ingredients from PostgreSQL", skip_all)]
    async fn get_ingredients(
        &self,
        user_id: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, RecipeStoreError> {
        let rows: Vec<AttributeRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, name
            FROM ingredients
            WHERE user_id = $1
              AND (NOT $2 OR EXISTS (
                  SELECT 1 FROM recipe_ingredients
                  WHERE recipe_ingredients.ingredient_id = ingredients.id
              ))
            ORDER BY id
            "#,
        )
        .bind(user_id.as_ref())
        .bind(assigned_only)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        rows.into_iter()
            .map(|row| {
                let (id, user_id, name) = row.into_parts()?;
                Ok(Ingredient { id, user_id, name })
            })
            .collect()
    }

    #[tracing::instrument(name = "Adding recipe to PostgreSQL", skip_all)]
    async fn add_recipe(
        &mut self,
        user_id: &UserId,
        draft: RecipeDraft,
    ) -> Result<Recipe, RecipeStoreError> {
        self.check_links(user_id, &draft).await?;

        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO recipes (user_id, title, time_minutes, price, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user_id.as_ref())
        .bind(draft.title.as_ref())
        .bind(draft.time_minutes.value_of())
        .bind(draft.price.as_ref())
        .bind(draft.link.as_ref())
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        let recipe = draft.into_recipe(id, *user_id);
        Self::replace_links(&mut tx, &recipe).await?;
        tx.commit().await.map_err(unexpected)?;

        Ok(recipe)
    }

    #[tracing::instrument(name = "Getting recipes from PostgreSQL", skip_all)]
    async fn get_recipes(
        &self,
        user_id: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeStoreError> {
        let rows: Vec<RecipeRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, time_minutes, price, link
            FROM recipes
            WHERE user_id = $1
              AND ($2::BIGINT[] IS NULL OR EXISTS (
                  SELECT 1 FROM recipe_tags
                  WHERE recipe_tags.recipe_id = recipes.id
                    AND recipe_tags.tag_id = ANY($2)
              ))
              AND ($3::BIGINT[] IS NULL OR EXISTS (
                  SELECT 1 FROM recipe_ingredients
                  WHERE recipe_ingredients.recipe_id = recipes.id
                    AND recipe_ingredients.ingredient_id = ANY($3)
              ))
            ORDER BY id
            "#,
        )
        .bind(user_id.as_ref())
        .bind(&filter.tags)
        .bind(&filter.ingredients)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        self.load_recipes(rows).await
    }

    #[tracing::instrument(name = "Getting recipe from PostgreSQL", skip_all)]
    async fn get_recipe(
        &self,
        user_id: &UserId,
        recipe_id: i64,
    ) -> Result<Recipe, RecipeStoreError> {
        let row: RecipeRow = sqlx::query_as(
            r#"
            SELECT id, user_id, title, time_minutes, price, link
            FROM recipes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(recipe_id)
        .bind(user_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => RecipeStoreError::RecipeNotFound,
            e => unexpected(e),
        })?;

        self.load_recipes(vec![row])
            .await?
            .pop()
            .ok_or(RecipeStoreError::RecipeNotFound)
    }

    #[tracing::instrument(name = "Updating recipe in PostgreSQL", skip_all)]
    async fn update_recipe(
        &mut self,
        user_id: &UserId,
        recipe_id: i64,
        draft: RecipeDraft,
    ) -> Result<Recipe, RecipeStoreError> {
        self.check_links(user_id, &draft).await?;

        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let result = sqlx::query(
            r#"
            UPDATE recipes
            SET title = $3, time_minutes = $4, price = $5, link = $6
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(recipe_id)
        .bind(user_id.as_ref())
        .bind(draft.title.as_ref())
        .bind(draft.time_minutes.value_of())
        .bind(draft.price.as_ref())
        .bind(draft.link.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(RecipeStoreError::RecipeNotFound);
        }

        let recipe = draft.into_recipe(recipe_id, *user_id);
        Self::replace_links(&mut tx, &recipe).await?;
        tx.commit().await.map_err(unexpected)?;

        Ok(recipe)
    }

    #[tracing::instrument(name = "Deleting recipe from PostgreSQL", skip_all)]
    async fn delete_recipe(
        &mut self,
        user_id: &UserId,
        recipe_id: i64,
    ) -> Result<(), RecipeStoreError> {
        let result =
            sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
                .bind(recipe_id)
                .bind(user_id.as_ref())
                .execute(&self.pool)
                .await
                .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(RecipeStoreError::RecipeNotFound);
        }

        Ok(())
    }
}
