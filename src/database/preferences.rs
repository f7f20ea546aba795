// ABOUTME: Database operations for per-user dietary preferences
// ABOUTME: One row per user; legacy restriction/goal encodings are stored verbatim
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// A user's dietary preferences
///
/// `dietary_restrictions` and `goals` are stored in their original wire
/// shape: restrictions arrive either as an array of names or as a map of
/// name to boolean; goals arrive as a plain string or a JSON array of
/// strings. Normalization into a canonical form happens in the planner,
/// not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Unique identifier
    pub id: i64,
    /// Owning user (at most one row per user)
    pub user_id: String,
    /// Dietary restrictions in either legacy encoding
    pub dietary_restrictions: Option<serde_json::Value>,
    /// Goals as a plain string or a JSON-encoded array of strings
    pub goals: Option<String>,
    /// Activity level (e.g. `sedentary`, `active`)
    pub activity_level: Option<String>,
    /// Number of meals per day
    pub meal_frequency: i64,
    /// Number of snacks per day
    pub snacks_per_day: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create or replace a user's preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertPreferencesRequest {
    /// Dietary restrictions (array of names or map of name to boolean)
    pub dietary_restrictions: Option<serde_json::Value>,
    /// Goals (plain string or array of strings)
    pub goals: Option<serde_json::Value>,
    /// Activity level
    pub activity_level: Option<String>,
    /// Number of meals per day (defaults to 3)
    pub meal_frequency: Option<i64>,
    /// Number of snacks per day (defaults to 1)
    pub snacks_per_day: Option<i64>,
}

/// User preference database operations manager
pub struct PreferencesManager {
    pool: SqlitePool,
}

impl PreferencesManager {
    /// Create a new preferences manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user's preferences, if any exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, user_id: &str) -> AppResult<Option<UserPreferences>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, dietary_restrictions, goals, activity_level,
                   meal_frequency, snacks_per_day, created_at, updated_at
            FROM user_preferences
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get preferences: {e}")))?;

        row.map(|r| row_to_preferences(&r)).transpose()
    }

    /// Create or replace a user's preferences (one row per user)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn upsert(
        &self,
        user_id: &str,
        request: &UpsertPreferencesRequest,
    ) -> AppResult<UserPreferences> {
        let now = Utc::now().to_rfc3339();
        let restrictions_text = request
            .dietary_restrictions
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let goals_text = request.goals.as_ref().map(goals_to_text).transpose()?;
        let meal_frequency = request.meal_frequency.unwrap_or(3);
        let snacks_per_day = request.snacks_per_day.unwrap_or(1);

        let existing = self.get(user_id).await?;
        if existing.is_some() {
            sqlx::query(
                r"
                UPDATE user_preferences SET
                    dietary_restrictions = $1, goals = $2, activity_level = $3,
                    meal_frequency = $4, snacks_per_day = $5, updated_at = $6
                WHERE user_id = $7
                ",
            )
            .bind(&restrictions_text)
            .bind(&goals_text)
            .bind(&request.activity_level)
            .bind(meal_frequency)
            .bind(snacks_per_day)
            .bind(&now)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update preferences: {e}")))?;
        } else {
            sqlx::query(
                r"
                INSERT INTO user_preferences (
                    user_id, dietary_restrictions, goals, activity_level,
                    meal_frequency, snacks_per_day, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
                ",
            )
            .bind(user_id)
            .bind(&restrictions_text)
            .bind(&goals_text)
            .bind(&request.activity_level)
            .bind(meal_frequency)
            .bind(snacks_per_day)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create preferences: {e}")))?;
        }

        self.get(user_id).await?.ok_or_else(|| {
            AppError::internal(format!("Preferences missing after upsert for user {user_id}"))
        })
    }
}

/// Serialize the goals field the way the legacy clients send it: a plain
/// string is stored verbatim, anything else as JSON text
fn goals_to_text(value: &serde_json::Value) -> Result<String, serde_json::Error> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        other => serde_json::to_string(other),
    }
}

/// Convert a database row to `UserPreferences`
fn row_to_preferences(row: &SqliteRow) -> AppResult<UserPreferences> {
    let restrictions_text: Option<String> = row.get("dietary_restrictions");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    // A malformed restrictions column is treated as absent rather than
    // failing the read; the planner recovers the same way.
    let dietary_restrictions =
        restrictions_text.and_then(|text| serde_json::from_str(&text).ok());

    Ok(UserPreferences {
        id: row.get("id"),
        user_id: row.get("user_id"),
        dietary_restrictions,
        goals: row.get("goals"),
        activity_level: row.get("activity_level"),
        meal_frequency: row.get("meal_frequency"),
        snacks_per_day: row.get("snacks_per_day"),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}
