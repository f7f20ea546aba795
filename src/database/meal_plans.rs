// ABOUTME: Database operations for the live meal calendar and saved meal plans
// ABOUTME: Live entries are unique per (user, date, meal type); saved plans accumulate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// A live calendar entry: at most one per (user, date, meal type)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanEntry {
    /// Unique identifier
    pub id: i64,
    /// Owning user
    pub user_id: String,
    /// Calendar day
    pub date: NaiveDate,
    /// Meal type (`breakfast`, `lunch`, `dinner`, `snack`, ...)
    pub meal_type: String,
    /// Assigned recipe, if any
    pub recipe_id: Option<i64>,
    /// Free-text name when no recipe is referenced (or the recipe title)
    pub custom_meal_name: Option<String>,
    /// Calories snapshot at assignment time (kcal)
    pub calories: Option<i64>,
    /// Protein snapshot (grams)
    pub protein: Option<i64>,
    /// Carbohydrates snapshot (grams)
    pub carbs: Option<i64>,
    /// Fat snapshot (grams)
    pub fat: Option<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create or replace a live calendar entry for one slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertMealPlanRequest {
    /// Calendar day
    pub date: NaiveDate,
    /// Meal type for the slot
    pub meal_type: String,
    /// Assigned recipe, if any
    pub recipe_id: Option<i64>,
    /// Free-text name
    pub custom_meal_name: Option<String>,
    /// Calories snapshot (kcal)
    pub calories: Option<i64>,
    /// Protein snapshot (grams)
    pub protein: Option<i64>,
    /// Carbohydrates snapshot (grams)
    pub carbs: Option<i64>,
    /// Fat snapshot (grams)
    pub fat: Option<i64>,
}

/// A named, durable snapshot of a meal plan over a date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMealPlan {
    /// Unique identifier
    pub id: i64,
    /// Owning user
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// First day covered (inclusive)
    pub start_date: NaiveDate,
    /// Last day covered (inclusive)
    pub end_date: NaiveDate,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// One slot assignment within a saved meal plan
///
/// Entries carry their own macro snapshot so they remain displayable
/// even after the referenced recipe has been deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMealPlanEntry {
    /// Unique identifier
    pub id: i64,
    /// Parent saved plan
    pub saved_meal_plan_id: i64,
    /// Calendar day
    pub date: NaiveDate,
    /// Meal type for the slot
    pub meal_type: String,
    /// Assigned recipe, if any (may dangle after recipe deletion)
    pub recipe_id: Option<i64>,
    /// Free-text name
    pub custom_meal_name: Option<String>,
    /// Calories snapshot (kcal)
    pub calories: Option<i64>,
    /// Protein snapshot (grams)
    pub protein: Option<i64>,
    /// Carbohydrates snapshot (grams)
    pub carbs: Option<i64>,
    /// Fat snapshot (grams)
    pub fat: Option<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to add one entry to a saved meal plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSavedEntry {
    /// Calendar day
    pub date: NaiveDate,
    /// Meal type for the slot
    pub meal_type: String,
    /// Assigned recipe, if any
    pub recipe_id: Option<i64>,
    /// Free-text name
    pub custom_meal_name: Option<String>,
    /// Calories snapshot (kcal)
    pub calories: Option<i64>,
    /// Protein snapshot (grams)
    pub protein: Option<i64>,
    /// Carbohydrates snapshot (grams)
    pub carbs: Option<i64>,
    /// Fat snapshot (grams)
    pub fat: Option<i64>,
}

/// Meal plan database operations manager
pub struct MealPlansManager {
    pool: SqlitePool,
}

impl MealPlansManager {
    /// Create a new meal plans manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ============================================
    // Live calendar
    // ============================================

    /// List a user's live entries within an inclusive date range
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_for_range(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<MealPlanEntry>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, date, meal_type, recipe_id, custom_meal_name,
                   calories, protein, carbs, fat, created_at, updated_at
            FROM meal_plans
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date, meal_type
            ",
        )
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list meal plans: {e}")))?;

        rows.iter().map(row_to_entry).collect()
    }

    /// Get a live entry by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, entry_id: i64) -> AppResult<Option<MealPlanEntry>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, date, meal_type, recipe_id, custom_meal_name,
                   calories, protein, carbs, fat, created_at, updated_at
            FROM meal_plans
            WHERE id = $1
            ",
        )
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get meal plan: {e}")))?;

        row.map(|r| row_to_entry(&r)).transpose()
    }

    /// Create or replace the live entry for one (user, date, meal type)
    /// slot; a second write to the same slot updates the existing row
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn upsert(
        &self,
        user_id: &str,
        request: &UpsertMealPlanRequest,
    ) -> AppResult<MealPlanEntry> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO meal_plans (
                user_id, date, meal_type, recipe_id, custom_meal_name,
                calories, protein, carbs, fat, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            ON CONFLICT(user_id, date, meal_type) DO UPDATE SET
                recipe_id = excluded.recipe_id,
                custom_meal_name = excluded.custom_meal_name,
                calories = excluded.calories,
                protein = excluded.protein,
                carbs = excluded.carbs,
                fat = excluded.fat,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_id)
        .bind(request.date)
        .bind(&request.meal_type)
        .bind(request.recipe_id)
        .bind(&request.custom_meal_name)
        .bind(request.calories)
        .bind(request.protein)
        .bind(request.carbs)
        .bind(request.fat)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert meal plan: {e}")))?;

        let row = sqlx::query(
            r"
            SELECT id, user_id, date, meal_type, recipe_id, custom_meal_name,
                   calories, protein, carbs, fat, created_at, updated_at
            FROM meal_plans
            WHERE user_id = $1 AND date = $2 AND meal_type = $3
            ",
        )
        .bind(user_id)
        .bind(request.date)
        .bind(&request.meal_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to read back meal plan: {e}")))?;

        row_to_entry(&row)
    }

    /// Delete a live entry
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, entry_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1")
            .bind(entry_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete meal plan: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all live entries for a user within an inclusive date range
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete_range(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r"
            DELETE FROM meal_plans
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ",
        )
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to clear meal plans: {e}")))?;

        Ok(result.rows_affected())
    }

    // ============================================
    // Saved plans
    // ============================================

    /// List a user's saved plans, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_saved(&self, user_id: &str) -> AppResult<Vec<SavedMealPlan>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, name, description, start_date, end_date,
                   created_at, updated_at
            FROM saved_meal_plans
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list saved plans: {e}")))?;

        rows.iter().map(row_to_saved_plan).collect()
    }

    /// Get a saved plan by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_saved(&self, plan_id: i64) -> AppResult<Option<SavedMealPlan>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, name, description, start_date, end_date,
                   created_at, updated_at
            FROM saved_meal_plans
            WHERE id = $1
            ",
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get saved plan: {e}")))?;

        row.map(|r| row_to_saved_plan(&r)).transpose()
    }

    /// Create a new saved plan (plans accumulate; there is no upsert)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create_saved(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<SavedMealPlan> {
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO saved_meal_plans (
                user_id, name, description, start_date, end_date,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $6)
            ",
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(start_date)
        .bind(end_date)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create saved plan: {e}")))?;

        Ok(SavedMealPlan {
            id: result.last_insert_rowid(),
            user_id: user_id.to_owned(),
            name: name.to_owned(),
            description: description.map(str::to_owned),
            start_date,
            end_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// List the entries of a saved plan, ordered by date then meal type
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn saved_entries(&self, plan_id: i64) -> AppResult<Vec<SavedMealPlanEntry>> {
        let rows = sqlx::query(
            r"
            SELECT id, saved_meal_plan_id, date, meal_type, recipe_id,
                   custom_meal_name, calories, protein, carbs, fat,
                   created_at, updated_at
            FROM saved_meal_plan_entries
            WHERE saved_meal_plan_id = $1
            ORDER BY date, meal_type
            ",
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list saved entries: {e}")))?;

        rows.iter().map(row_to_saved_entry).collect()
    }

    /// Add one entry to a saved plan
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create_saved_entry(
        &self,
        plan_id: i64,
        entry: &NewSavedEntry,
    ) -> AppResult<SavedMealPlanEntry> {
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO saved_meal_plan_entries (
                saved_meal_plan_id, date, meal_type, recipe_id, custom_meal_name,
                calories, protein, carbs, fat, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            ",
        )
        .bind(plan_id)
        .bind(entry.date)
        .bind(&entry.meal_type)
        .bind(entry.recipe_id)
        .bind(&entry.custom_meal_name)
        .bind(entry.calories)
        .bind(entry.protein)
        .bind(entry.carbs)
        .bind(entry.fat)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create saved entry: {e}")))?;

        Ok(SavedMealPlanEntry {
            id: result.last_insert_rowid(),
            saved_meal_plan_id: plan_id,
            date: entry.date,
            meal_type: entry.meal_type.clone(),
            recipe_id: entry.recipe_id,
            custom_meal_name: entry.custom_meal_name.clone(),
            calories: entry.calories,
            protein: entry.protein,
            carbs: entry.carbs,
            fat: entry.fat,
            created_at: now,
            updated_at: now,
        })
    }

    /// Delete a saved plan and its entries (entries first)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete_saved(&self, plan_id: i64) -> AppResult<bool> {
        sqlx::query("DELETE FROM saved_meal_plan_entries WHERE saved_meal_plan_id = $1")
            .bind(plan_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete saved entries: {e}")))?;

        let result = sqlx::query("DELETE FROM saved_meal_plans WHERE id = $1")
            .bind(plan_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete saved plan: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a live `MealPlanEntry`
fn row_to_entry(row: &SqliteRow) -> AppResult<MealPlanEntry> {
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Ok(MealPlanEntry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        date: row.get("date"),
        meal_type: row.get("meal_type"),
        recipe_id: row.get("recipe_id"),
        custom_meal_name: row.get("custom_meal_name"),
        calories: row.get("calories"),
        protein: row.get("protein"),
        carbs: row.get("carbs"),
        fat: row.get("fat"),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}

/// Convert a database row to a `SavedMealPlan`
fn row_to_saved_plan(row: &SqliteRow) -> AppResult<SavedMealPlan> {
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Ok(SavedMealPlan {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}

/// Convert a database row to a `SavedMealPlanEntry`
fn row_to_saved_entry(row: &SqliteRow) -> AppResult<SavedMealPlanEntry> {
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Ok(SavedMealPlanEntry {
        id: row.get("id"),
        saved_meal_plan_id: row.get("saved_meal_plan_id"),
        date: row.get("date"),
        meal_type: row.get("meal_type"),
        recipe_id: row.get("recipe_id"),
        custom_meal_name: row.get("custom_meal_name"),
        calories: row.get("calories"),
        protein: row.get("protein"),
        carbs: row.get("carbs"),
        fat: row.get("fat"),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}
