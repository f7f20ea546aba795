// ABOUTME: Database management for the NutriPlan server
// ABOUTME: Owns the SQLite pool, schema migration, and per-domain managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! # Database Management
//!
//! This module provides database functionality for the NutriPlan server.
//! It owns the connection pool, creates the schema, and hands out the
//! per-domain managers (recipes, preferences, meal plans) that the rest
//! of the application works through.

pub mod meal_plans;
pub mod preferences;
pub mod recipes;

use crate::errors::{AppError, AppResult};
use sqlx::{Pool, Sqlite, SqlitePool};

use meal_plans::MealPlansManager;
use preferences::PreferencesManager;
use recipes::RecipesManager;

/// Database manager for recipe, preference, and meal plan storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or the
    /// schema cannot be created.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
            && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Wrap an existing pool (tests create their own in-memory pools)
    #[must_use]
    pub const fn from_pool(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Recipe store operations
    #[must_use]
    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.pool.clone())
    }

    /// User preference store operations
    #[must_use]
    pub fn preferences(&self) -> PreferencesManager {
        PreferencesManager::new(self.pool.clone())
    }

    /// Live calendar and saved meal plan operations
    #[must_use]
    pub fn meal_plans(&self) -> MealPlansManager {
        MealPlansManager::new(self.pool.clone())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any schema statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                ingredients TEXT NOT NULL DEFAULT '[]',
                instructions TEXT NOT NULL,
                prep_time INTEGER,
                cook_time INTEGER,
                servings INTEGER,
                calories INTEGER,
                protein INTEGER,
                carbs INTEGER,
                fat INTEGER,
                image_url TEXT,
                tags TEXT NOT NULL DEFAULT '[]',
                is_public INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS recipe_user_id_idx ON recipes(user_id)",
            r"
            CREATE TABLE IF NOT EXISTS user_preferences (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL UNIQUE,
                dietary_restrictions TEXT,
                goals TEXT,
                activity_level TEXT,
                meal_frequency INTEGER NOT NULL DEFAULT 3,
                snacks_per_day INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS meal_plans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                meal_type TEXT NOT NULL,
                recipe_id INTEGER,
                custom_meal_name TEXT,
                calories INTEGER,
                protein INTEGER,
                carbs INTEGER,
                fat INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(user_id, date, meal_type)
            )
            ",
            "CREATE INDEX IF NOT EXISTS meal_plan_user_id_idx ON meal_plans(user_id)",
            "CREATE INDEX IF NOT EXISTS meal_plan_date_idx ON meal_plans(date)",
            r"
            CREATE TABLE IF NOT EXISTS saved_meal_plans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS saved_meal_plan_user_id_idx ON saved_meal_plans(user_id)",
            r"
            CREATE TABLE IF NOT EXISTS saved_meal_plan_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                saved_meal_plan_id INTEGER NOT NULL
                    REFERENCES saved_meal_plans(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                meal_type TEXT NOT NULL,
                recipe_id INTEGER,
                custom_meal_name TEXT,
                calories INTEGER,
                protein INTEGER,
                carbs INTEGER,
                fat INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS saved_meal_plan_entry_plan_id_idx ON saved_meal_plan_entries(saved_meal_plan_id)",
            "CREATE INDEX IF NOT EXISTS saved_meal_plan_entry_date_idx ON saved_meal_plan_entries(date)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }

        Ok(())
    }
}
