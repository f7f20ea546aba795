// ABOUTME: Database operations for recipes (user-created and system seed content)
// ABOUTME: Handles CRUD plus the filtered/ordered reads the suggestion engine uses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// Owner id used for seeded system recipes
pub const SYSTEM_OWNER: &str = "system";

/// Column list shared by every recipe SELECT
const RECIPE_COLUMNS: &str = "id, user_id, title, ingredients, instructions, prep_time, \
     cook_time, servings, calories, protein, carbs, fat, image_url, tags, is_public, \
     created_at, updated_at";

/// A recipe with macros, tags, and visibility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: i64,
    /// User who owns the recipe (`system` for seed content)
    pub user_id: String,
    /// Display title
    pub title: String,
    /// Ingredient list (stored as JSON array)
    pub ingredients: Vec<String>,
    /// Preparation instructions
    pub instructions: String,
    /// Preparation time in minutes
    pub prep_time: Option<i64>,
    /// Cooking time in minutes
    pub cook_time: Option<i64>,
    /// Number of servings
    pub servings: Option<i64>,
    /// Calories per serving (kcal)
    pub calories: Option<i64>,
    /// Protein per serving (grams)
    pub protein: Option<i64>,
    /// Carbohydrates per serving (grams)
    pub carbs: Option<i64>,
    /// Fat per serving (grams)
    pub fat: Option<i64>,
    /// Optional image URL
    pub image_url: Option<String>,
    /// Free-text tags for filtering (stored as JSON array)
    pub tags: Vec<String>,
    /// Whether the recipe is visible to all users
    pub is_public: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    /// Display title
    pub title: String,
    /// Ingredient list
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Preparation instructions
    pub instructions: String,
    /// Preparation time in minutes
    pub prep_time: Option<i64>,
    /// Cooking time in minutes
    pub cook_time: Option<i64>,
    /// Number of servings
    pub servings: Option<i64>,
    /// Calories per serving (kcal)
    pub calories: Option<i64>,
    /// Protein per serving (grams)
    pub protein: Option<i64>,
    /// Carbohydrates per serving (grams)
    pub carbs: Option<i64>,
    /// Fat per serving (grams)
    pub fat: Option<i64>,
    /// Optional image URL
    pub image_url: Option<String>,
    /// Free-text tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the recipe is visible to all users
    #[serde(default)]
    pub is_public: bool,
}

/// Request to update an existing recipe (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    /// New title (if provided)
    pub title: Option<String>,
    /// New ingredient list (if provided)
    pub ingredients: Option<Vec<String>>,
    /// New instructions (if provided)
    pub instructions: Option<String>,
    /// New preparation time (if provided)
    pub prep_time: Option<i64>,
    /// New cooking time (if provided)
    pub cook_time: Option<i64>,
    /// New servings count (if provided)
    pub servings: Option<i64>,
    /// New calories (if provided)
    pub calories: Option<i64>,
    /// New protein (if provided)
    pub protein: Option<i64>,
    /// New carbs (if provided)
    pub carbs: Option<i64>,
    /// New fat (if provided)
    pub fat: Option<i64>,
    /// New image URL (if provided)
    pub image_url: Option<String>,
    /// New tags (if provided)
    pub tags: Option<Vec<String>>,
    /// New visibility (if provided)
    pub is_public: Option<bool>,
}

/// Filter options for listing public recipes
#[derive(Debug, Clone, Default)]
pub struct ListRecipesFilter {
    /// Case-insensitive title substring
    pub search: Option<String>,
    /// Tag the recipe must carry
    pub category: Option<String>,
}

/// Recipe database operations manager
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new recipe in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(&self, user_id: &str, request: &CreateRecipeRequest) -> AppResult<Recipe> {
        let now = Utc::now();
        let ingredients_json = serde_json::to_string(&request.ingredients)?;
        let tags_json = serde_json::to_string(&request.tags)?;

        let result = sqlx::query(
            r"
            INSERT INTO recipes (
                user_id, title, ingredients, instructions, prep_time, cook_time,
                servings, calories, protein, carbs, fat, image_url, tags, is_public,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            ",
        )
        .bind(user_id)
        .bind(&request.title)
        .bind(&ingredients_json)
        .bind(&request.instructions)
        .bind(request.prep_time)
        .bind(request.cook_time)
        .bind(request.servings)
        .bind(request.calories)
        .bind(request.protein)
        .bind(request.carbs)
        .bind(request.fat)
        .bind(&request.image_url)
        .bind(&tags_json)
        .bind(i64::from(request.is_public))
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;

        Ok(Recipe {
            id: result.last_insert_rowid(),
            user_id: user_id.to_owned(),
            title: request.title.clone(),
            ingredients: request.ingredients.clone(),
            instructions: request.instructions.clone(),
            prep_time: request.prep_time,
            cook_time: request.cook_time,
            servings: request.servings,
            calories: request.calories,
            protein: request.protein,
            carbs: request.carbs,
            fat: request.fat,
            image_url: request.image_url.clone(),
            tags: request.tags.clone(),
            is_public: request.is_public,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a recipe by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        let query = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    /// List public recipes, newest first, with optional search/category filters
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_public(&self, filter: &ListRecipesFilter) -> AppResult<Vec<Recipe>> {
        let mut conditions = vec!["is_public = 1".to_owned()];
        let mut binds: Vec<String> = Vec::new();

        if let Some(search) = &filter.search {
            binds.push(format!("%{search}%"));
            conditions.push(format!("title LIKE ${}", binds.len()));
        }
        if let Some(category) = &filter.category {
            binds.push(category.clone());
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM json_each(recipes.tags) WHERE json_each.value = ${})",
                binds.len()
            ));
        }

        let query = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE {} ORDER BY created_at DESC",
            conditions.join(" AND ")
        );

        let mut q = sqlx::query(&query);
        for bind in &binds {
            q = q.bind(bind);
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// List a user's own recipes, newest first, with optional title search
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_for_user(&self, user_id: &str, search: Option<&str>) -> AppResult<Vec<Recipe>> {
        let rows = if let Some(search) = search {
            let pattern = format!("%{search}%");
            let query = format!(
                "SELECT {RECIPE_COLUMNS} FROM recipes \
                 WHERE user_id = $1 AND title LIKE $2 ORDER BY created_at DESC"
            );
            sqlx::query(&query)
                .bind(user_id)
                .bind(&pattern)
                .fetch_all(&self.pool)
                .await
        } else {
            let query = format!(
                "SELECT {RECIPE_COLUMNS} FROM recipes \
                 WHERE user_id = $1 ORDER BY created_at DESC"
            );
            sqlx::query(&query).bind(user_id).fetch_all(&self.pool).await
        }
        .map_err(|e| AppError::database(format!("Failed to list user recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Get a user's three most recent recipes, topped up with public
    /// recipes from other users when the user has fewer than three
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn recent_for_user(&self, user_id: &str) -> AppResult<Vec<Recipe>> {
        let query = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT 3"
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recent recipes: {e}")))?;

        let mut recipes: Vec<Recipe> = rows
            .iter()
            .map(row_to_recipe)
            .collect::<AppResult<Vec<_>>>()?;

        if recipes.len() < 3 {
            let needed = 3 - recipes.len();
            let query = format!(
                "SELECT {RECIPE_COLUMNS} FROM recipes \
                 WHERE is_public = 1 AND user_id != $1 \
                 ORDER BY created_at DESC LIMIT $2"
            );
            let rows = sqlx::query(&query)
                .bind(user_id)
                .bind(needed as i64)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to list recent recipes: {e}")))?;

            for row in &rows {
                recipes.push(row_to_recipe(row)?);
            }
        }

        Ok(recipes)
    }

    /// Public recipes carrying any of the given tags, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn public_with_any_tag(&self, tags: &[String], limit: i64) -> AppResult<Vec<Recipe>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<String> = (1..=tags.len()).map(|i| format!("${i}")).collect();
        let query = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes \
             WHERE is_public = 1 AND EXISTS ( \
                 SELECT 1 FROM json_each(recipes.tags) WHERE json_each.value IN ({}) \
             ) \
             ORDER BY created_at DESC LIMIT ${}",
            placeholders.join(", "),
            tags.len() + 1
        );

        let mut q = sqlx::query(&query);
        for tag in tags {
            q = q.bind(tag);
        }
        q = q.bind(limit);

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to query recipes by tag: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Public recipes ordered by ascending calories (rows without a
    /// calorie value sort last)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn public_by_calories_asc(&self, limit: i64) -> AppResult<Vec<Recipe>> {
        let query = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes \
             WHERE is_public = 1 \
             ORDER BY calories IS NULL, calories ASC LIMIT $1"
        );
        let rows = sqlx::query(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to query recipes by calories: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Public recipes ordered by descending protein (rows without a
    /// protein value sort last)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn public_by_protein_desc(&self, limit: i64) -> AppResult<Vec<Recipe>> {
        let query = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes \
             WHERE is_public = 1 \
             ORDER BY protein IS NULL, protein DESC LIMIT $1"
        );
        let rows = sqlx::query(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to query recipes by protein: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Public recipes in random order
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn random_public(&self, limit: i64) -> AppResult<Vec<Recipe>> {
        let query = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes \
             WHERE is_public = 1 ORDER BY RANDOM() LIMIT $1"
        );
        let rows = sqlx::query(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to query random recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Update an existing recipe
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update(
        &self,
        recipe_id: i64,
        request: &UpdateRecipeRequest,
    ) -> AppResult<Option<Recipe>> {
        let existing = self.get(recipe_id).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let now = Utc::now();
        let title = request.title.as_ref().unwrap_or(&existing.title);
        let ingredients = request.ingredients.as_ref().unwrap_or(&existing.ingredients);
        let instructions = request
            .instructions
            .as_ref()
            .unwrap_or(&existing.instructions);
        let tags = request.tags.as_ref().unwrap_or(&existing.tags);
        let image_url = request.image_url.clone().or(existing.image_url);
        let ingredients_json = serde_json::to_string(ingredients)?;
        let tags_json = serde_json::to_string(tags)?;

        sqlx::query(
            r"
            UPDATE recipes SET
                title = $1, ingredients = $2, instructions = $3, prep_time = $4,
                cook_time = $5, servings = $6, calories = $7, protein = $8,
                carbs = $9, fat = $10, image_url = $11, tags = $12, is_public = $13,
                updated_at = $14
            WHERE id = $15
            ",
        )
        .bind(title)
        .bind(&ingredients_json)
        .bind(instructions)
        .bind(request.prep_time.or(existing.prep_time))
        .bind(request.cook_time.or(existing.cook_time))
        .bind(request.servings.or(existing.servings))
        .bind(request.calories.or(existing.calories))
        .bind(request.protein.or(existing.protein))
        .bind(request.carbs.or(existing.carbs))
        .bind(request.fat.or(existing.fat))
        .bind(&image_url)
        .bind(&tags_json)
        .bind(i64::from(request.is_public.unwrap_or(existing.is_public)))
        .bind(now.to_rfc3339())
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        self.get(recipe_id).await
    }

    /// Delete a recipe
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, recipe_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Count recipes owned by a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn count_for_user(&self, user_id: &str) -> AppResult<u32> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM recipes WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        let count: i64 = row.get("count");
        Ok(count as u32)
    }
}

/// Convert a database row to a `Recipe`
fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let ingredients_json: String = row.get("ingredients");
    let tags_json: String = row.get("tags");
    let is_public: i64 = row.get("is_public");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    let ingredients: Vec<String> = serde_json::from_str(&ingredients_json)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json)?;

    Ok(Recipe {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        ingredients,
        instructions: row.get("instructions"),
        prep_time: row.get("prep_time"),
        cook_time: row.get("cook_time"),
        servings: row.get("servings"),
        calories: row.get("calories"),
        protein: row.get("protein"),
        carbs: row.get("carbs"),
        fat: row.get("fat"),
        image_url: row.get("image_url"),
        tags,
        is_public: is_public == 1,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}
